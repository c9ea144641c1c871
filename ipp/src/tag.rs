//!
//! Delimiter and value tag tables
//!
use std::fmt;

use enum_primitive_derive::Primitive;
use num_traits::FromPrimitive;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::parser::IppParseError;

/// group delimiter tags, occupying 0x00..=0x0f
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Primitive, Debug, Copy, Clone, PartialEq, Hash, Eq)]
pub enum DelimiterTag {
    OperationAttributes = 0x01,
    JobAttributes = 0x02,
    EndOfAttributes = 0x03,
    PrinterAttributes = 0x04,
    UnsupportedAttributes = 0x05,
    SubscriptionAttributes = 0x06,
    EventNotificationAttributes = 0x07,
    ResourceAttributes = 0x08,
    DocumentAttributes = 0x09,
    SystemAttributes = 0x0A,
}

impl DelimiterTag {
    /// Resolve a wire byte to a known delimiter
    pub fn of(tag: u8) -> Result<DelimiterTag, IppParseError> {
        DelimiterTag::from_u8(tag).ok_or(IppParseError::UnrecognizedTag(tag))
    }

    /// Check whether a byte falls into the delimiter range without resolving it
    pub fn is_valid(tag: u8) -> bool {
        tag <= 0x0f
    }
}

impl fmt::Display for DelimiterTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            DelimiterTag::OperationAttributes => "operation-attributes-tag",
            DelimiterTag::JobAttributes => "job-attributes-tag",
            DelimiterTag::EndOfAttributes => "end-of-attributes-tag",
            DelimiterTag::PrinterAttributes => "printer-attributes-tag",
            DelimiterTag::UnsupportedAttributes => "unsupported-attributes-tag",
            DelimiterTag::SubscriptionAttributes => "subscription-attributes-tag",
            DelimiterTag::EventNotificationAttributes => "event-notification-attributes-tag",
            DelimiterTag::ResourceAttributes => "resource-attributes-tag",
            DelimiterTag::DocumentAttributes => "document-attributes-tag",
            DelimiterTag::SystemAttributes => "system-attributes-tag",
        };
        f.write_str(name)
    }
}

/// IPP value tags. Every byte in 0x10..=0xff resolves to a tag; codes without an
/// assigned syntax are kept in the variant of their range.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ValueTag {
    Unsupported,
    Default,
    Unknown,
    NoValue,
    NotSettable,
    DeleteAttribute,
    AdminDefine,
    /// unassigned out-of-band code, 0x17..=0x1f
    OutOfBand(u8),
    GenericInteger,
    Integer,
    Boolean,
    Enum,
    /// unassigned integer code, 0x24..=0x2f
    IntegerType(u8),
    OctetStringUnspecified,
    DateTime,
    Resolution,
    RangeOfInteger,
    BegCollection,
    TextWithLanguage,
    NameWithLanguage,
    EndCollection,
    /// unassigned octet-string code, 0x38..=0x3f
    OctetStringType(u8),
    TextWithoutLanguage,
    NameWithoutLanguage,
    Keyword,
    Uri,
    UriScheme,
    Charset,
    NaturalLanguage,
    MimeMediaType,
    MemberAttrName,
    /// unassigned character-string code, 0x40, 0x43 and 0x4b..=0x5f
    CharacterStringType(u8),
    /// 0x60..=0xff
    Reserved(u8),
}

impl ValueTag {
    /// Resolve a wire byte to a value tag, delimiter bytes are rejected
    pub fn of(tag: u8) -> Result<ValueTag, IppParseError> {
        let value_tag = match tag {
            0x00..=0x0f => return Err(IppParseError::UnrecognizedTag(tag)),
            0x10 => ValueTag::Unsupported,
            0x11 => ValueTag::Default,
            0x12 => ValueTag::Unknown,
            0x13 => ValueTag::NoValue,
            0x15 => ValueTag::NotSettable,
            0x16 => ValueTag::DeleteAttribute,
            0x17 => ValueTag::AdminDefine,
            0x14 | 0x18..=0x1f => ValueTag::OutOfBand(tag),
            0x20 => ValueTag::GenericInteger,
            0x21 => ValueTag::Integer,
            0x22 => ValueTag::Boolean,
            0x23 => ValueTag::Enum,
            0x24..=0x2f => ValueTag::IntegerType(tag),
            0x30 => ValueTag::OctetStringUnspecified,
            0x31 => ValueTag::DateTime,
            0x32 => ValueTag::Resolution,
            0x33 => ValueTag::RangeOfInteger,
            0x34 => ValueTag::BegCollection,
            0x35 => ValueTag::TextWithLanguage,
            0x36 => ValueTag::NameWithLanguage,
            0x37 => ValueTag::EndCollection,
            0x38..=0x3f => ValueTag::OctetStringType(tag),
            0x41 => ValueTag::TextWithoutLanguage,
            0x42 => ValueTag::NameWithoutLanguage,
            0x44 => ValueTag::Keyword,
            0x45 => ValueTag::Uri,
            0x46 => ValueTag::UriScheme,
            0x47 => ValueTag::Charset,
            0x48 => ValueTag::NaturalLanguage,
            0x49 => ValueTag::MimeMediaType,
            0x4a => ValueTag::MemberAttrName,
            0x40 | 0x43 | 0x4b..=0x5f => ValueTag::CharacterStringType(tag),
            0x60..=0xff => ValueTag::Reserved(tag),
        };
        Ok(value_tag)
    }

    /// Wire byte of this tag
    pub fn code(&self) -> u8 {
        match *self {
            ValueTag::Unsupported => 0x10,
            ValueTag::Default => 0x11,
            ValueTag::Unknown => 0x12,
            ValueTag::NoValue => 0x13,
            ValueTag::NotSettable => 0x15,
            ValueTag::DeleteAttribute => 0x16,
            ValueTag::AdminDefine => 0x17,
            ValueTag::GenericInteger => 0x20,
            ValueTag::Integer => 0x21,
            ValueTag::Boolean => 0x22,
            ValueTag::Enum => 0x23,
            ValueTag::OctetStringUnspecified => 0x30,
            ValueTag::DateTime => 0x31,
            ValueTag::Resolution => 0x32,
            ValueTag::RangeOfInteger => 0x33,
            ValueTag::BegCollection => 0x34,
            ValueTag::TextWithLanguage => 0x35,
            ValueTag::NameWithLanguage => 0x36,
            ValueTag::EndCollection => 0x37,
            ValueTag::TextWithoutLanguage => 0x41,
            ValueTag::NameWithoutLanguage => 0x42,
            ValueTag::Keyword => 0x44,
            ValueTag::Uri => 0x45,
            ValueTag::UriScheme => 0x46,
            ValueTag::Charset => 0x47,
            ValueTag::NaturalLanguage => 0x48,
            ValueTag::MimeMediaType => 0x49,
            ValueTag::MemberAttrName => 0x4a,
            ValueTag::OutOfBand(tag)
            | ValueTag::IntegerType(tag)
            | ValueTag::OctetStringType(tag)
            | ValueTag::CharacterStringType(tag)
            | ValueTag::Reserved(tag) => tag,
        }
    }

    /// Out-of-band values carry no data, 0x10..=0x1f
    pub fn is_out_of_band(&self) -> bool {
        (0x10..=0x1f).contains(&self.code())
    }

    /// Integer syntaxes, 0x20..=0x2f
    pub fn is_integer_value(&self) -> bool {
        (0x20..=0x2f).contains(&self.code())
    }

    /// Octet-string syntaxes, 0x30..=0x3f
    pub fn is_octet_string_value(&self) -> bool {
        (0x30..=0x3f).contains(&self.code())
    }

    /// Character-string syntaxes, 0x40..=0x5f
    pub fn is_character_string_value(&self) -> bool {
        (0x40..=0x5f).contains(&self.code())
    }

    pub fn is_reserved(&self) -> bool {
        self.code() >= 0x60
    }
}

impl From<ValueTag> for u8 {
    fn from(tag: ValueTag) -> u8 {
        tag.code()
    }
}

impl fmt::Display for ValueTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ValueTag::Unsupported => "unsupported",
            ValueTag::Default => "default",
            ValueTag::Unknown => "unknown",
            ValueTag::NoValue => "no-value",
            ValueTag::NotSettable => "not-settable",
            ValueTag::DeleteAttribute => "delete-attribute",
            ValueTag::AdminDefine => "admin-define",
            ValueTag::GenericInteger => "integer-type",
            ValueTag::Integer => "integer",
            ValueTag::Boolean => "boolean",
            ValueTag::Enum => "enum",
            ValueTag::OctetStringUnspecified => "octetString",
            ValueTag::DateTime => "dateTime",
            ValueTag::Resolution => "resolution",
            ValueTag::RangeOfInteger => "rangeOfInteger",
            ValueTag::BegCollection => "begCollection",
            ValueTag::TextWithLanguage => "textWithLanguage",
            ValueTag::NameWithLanguage => "nameWithLanguage",
            ValueTag::EndCollection => "endCollection",
            ValueTag::TextWithoutLanguage => "textWithoutLanguage",
            ValueTag::NameWithoutLanguage => "nameWithoutLanguage",
            ValueTag::Keyword => "keyword",
            ValueTag::Uri => "uri",
            ValueTag::UriScheme => "uriScheme",
            ValueTag::Charset => "charset",
            ValueTag::NaturalLanguage => "naturalLanguage",
            ValueTag::MimeMediaType => "mimeMediaType",
            ValueTag::MemberAttrName => "memberAttrName",
            ValueTag::OutOfBand(tag)
            | ValueTag::IntegerType(tag)
            | ValueTag::OctetStringType(tag)
            | ValueTag::CharacterStringType(tag)
            | ValueTag::Reserved(tag) => return write!(f, "tag-{tag:#04x}"),
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimiter_of() {
        assert_eq!(DelimiterTag::of(0x01).unwrap(), DelimiterTag::OperationAttributes);
        assert_eq!(DelimiterTag::of(0x03).unwrap(), DelimiterTag::EndOfAttributes);
        assert!(matches!(DelimiterTag::of(0x00), Err(IppParseError::UnrecognizedTag(0x00))));
        assert!(matches!(DelimiterTag::of(0x0f), Err(IppParseError::UnrecognizedTag(0x0f))));
        assert!(matches!(DelimiterTag::of(0x21), Err(IppParseError::UnrecognizedTag(0x21))));
    }

    #[test]
    fn test_delimiter_range() {
        assert!((0x00..=0x0f).all(DelimiterTag::is_valid));
        assert!((0x10..=0xff).all(|b| !DelimiterTag::is_valid(b)));
    }

    #[test]
    fn test_integer_range() {
        for b in 0x20..=0x2f {
            let tag = ValueTag::of(b).unwrap();
            assert!(tag.is_integer_value(), "{b:#x}");
            assert!(!tag.is_character_string_value());
        }
    }

    #[test]
    fn test_character_string_range() {
        for b in 0x40..=0x4f {
            let tag = ValueTag::of(b).unwrap();
            assert!(tag.is_character_string_value(), "{b:#x}");
            assert!(!tag.is_integer_value());
        }
    }

    #[test]
    fn test_value_tag_codes_are_stable() {
        for b in 0x10..=0xff {
            assert_eq!(ValueTag::of(b).unwrap().code(), b);
        }
        assert!(ValueTag::of(0x0f).is_err());
        assert!(ValueTag::of(0x13).unwrap().is_out_of_band());
        assert!(ValueTag::of(0x37).unwrap().is_octet_string_value());
        assert!(ValueTag::of(0x7f).unwrap().is_reserved());
    }

    #[test]
    fn test_structural_tags() {
        assert_eq!(ValueTag::Integer.code(), 0x21);
        assert_eq!(ValueTag::Boolean.code(), 0x22);
        assert_eq!(ValueTag::Enum.code(), 0x23);
        assert_eq!(ValueTag::TextWithoutLanguage.code(), 0x41);
        assert_eq!(ValueTag::NameWithoutLanguage.code(), 0x42);
        assert_eq!(ValueTag::Keyword.code(), 0x44);
        assert_eq!(ValueTag::Uri.code(), 0x45);
        assert_eq!(ValueTag::Charset.code(), 0x47);
        assert_eq!(ValueTag::Keyword.to_string(), "keyword");
    }
}
