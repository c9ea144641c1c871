//!
//! IPP message parser
//!
use bytes::Bytes;
use log::trace;

use crate::{
    attribute::{AdditionalValue, IppAttribute, IppAttributeGroup, IppAttributes},
    reader::IppReader,
    request::IppRequestResponse,
    tag::{DelimiterTag, ValueTag},
};

/// Parse error enum
#[derive(Debug, thiserror::Error)]
pub enum IppParseError {
    #[error("Truncated message: {needed} bytes needed, {remaining} remaining")]
    TruncatedMessage { needed: usize, remaining: usize },

    #[error("Unrecognized tag: {0:#04x}")]
    UnrecognizedTag(u8),

    #[error("Invalid value length {len} for tag {tag:#04x}")]
    InvalidValue { tag: u8, len: usize },

    #[error("Attribute name is not valid UTF-8: {0}")]
    InvalidName(String),

    #[error("Length {len} of {name} does not fit the 16-bit length field")]
    ValueTooLong { name: String, len: usize },
}

/// IPP parser over an in-memory message
pub struct IppParser {
    reader: IppReader,
}

impl IppParser {
    /// Create IPP parser from IppReader
    pub fn new<T>(reader: T) -> IppParser
    where
        T: Into<IppReader>,
    {
        IppParser { reader: reader.into() }
    }

    /// Parse one attribute together with the additional values following it
    pub fn parse_attribute(&mut self) -> Result<IppAttribute, IppParseError> {
        let tag = ValueTag::of(self.reader.read_tag()?)?;
        let name = self.reader.read_name()?;
        let value = self.reader.read_value()?;

        trace!("Value tag: {tag}: {name}: {} bytes", value.len());

        let mut additional_values = Vec::new();

        while let Some(head) = self.reader.peek_unit() {
            if DelimiterTag::is_valid(head.tag) || !head.is_additional_value() {
                break;
            }
            self.reader.commit_unit(head);
            let value = self.reader.read_value()?;
            trace!("Additional value for {name}: {} bytes", value.len());
            additional_values.push(AdditionalValue::new(ValueTag::of(head.tag)?, value));
        }

        Ok(IppAttribute::from_parts(tag, name, value, additional_values))
    }

    /// Parse a begin tag and the attributes up to the next delimiter
    pub fn parse_group(&mut self) -> Result<IppAttributeGroup, IppParseError> {
        let tag = self.reader.read_tag()?;
        trace!("Delimiter tag: {tag:0x}");

        let mut group = IppAttributeGroup::new(DelimiterTag::of(tag)?);

        while !DelimiterTag::is_valid(self.reader.peek_tag()?) {
            let attribute = self.parse_attribute()?;
            group.attributes_mut().push(attribute);
        }

        Ok(group)
    }

    fn parse_attributes(&mut self) -> Result<IppAttributes, IppParseError> {
        let mut attributes = IppAttributes::new();

        while self.reader.peek_tag()? != DelimiterTag::EndOfAttributes as u8 {
            let group = self.parse_group()?;
            attributes.groups_mut().push(group);
        }
        self.reader.read_tag()?;

        Ok(attributes)
    }

    /// Parse IPP message, everything after the end-of-attributes tag becomes the payload
    pub fn parse(mut self) -> Result<IppRequestResponse, IppParseError> {
        let header = self.reader.read_header()?;
        trace!("IPP header: {header:?}");

        let attributes = self.parse_attributes()?;

        Ok(IppRequestResponse {
            header,
            attributes,
            payload: self.reader.into_payload(),
        })
    }
}

impl From<Bytes> for IppParser {
    fn from(b: Bytes) -> Self {
        IppParser::new(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::IppVersion, value::IppValue};

    fn parse(data: &[u8]) -> Result<IppRequestResponse, IppParseError> {
        IppParser::new(Bytes::copy_from_slice(data)).parse()
    }

    #[test]
    fn test_parse_no_attributes() {
        let res = parse(&[1, 1, 0, 0, 0, 0, 0, 0, 3]).unwrap();
        assert!(res.attributes.groups().is_empty());
        assert!(res.payload.is_empty());
    }

    #[test]
    fn test_parse_short_envelope() {
        for len in 0..9 {
            let data = [2, 0, 0, 0, 0, 0, 0, 1, 3];
            let result = parse(&data[..len]);
            assert!(
                matches!(result, Err(IppParseError::TruncatedMessage { .. })),
                "length {len}"
            );
        }
    }

    #[test]
    fn test_parse_single_value() {
        let data = &[
            1, 1, 0, 0, 0, 0, 0, 0, 4, 0x21, 0x00, 0x04, b't', b'e', b's', b't', 0x00, 0x04, 0x12, 0x34, 0x56, 0x78, 3,
        ];
        let res = parse(data).unwrap();
        let attr = res
            .attributes
            .groups_of(DelimiterTag::PrinterAttributes)
            .next()
            .unwrap()
            .get("test")
            .unwrap();
        assert_eq!(attr.ipp_value().unwrap(), IppValue::Integer(0x1234_5678));
        assert!(!attr.is_multi_value());
    }

    #[test]
    fn test_parse_multi_value() {
        let data = &[
            1, 1, 0, 0, 0, 0, 0, 0, 4, 0x21, 0x00, 0x04, b't', b'e', b's', b't', 0x00, 0x04, 0x12, 0x34, 0x56, 0x78,
            0x21, 0x00, 0x00, 0x00, 0x04, 0x77, 0x65, 0x43, 0x21, 0x44, 0x00, 0x01, b'k', 0x00, 0x01, b'v', 3,
        ];
        let res = parse(data).unwrap();
        let group = res.attributes.groups_of(DelimiterTag::PrinterAttributes).next().unwrap();
        assert_eq!(group.attributes().len(), 2);

        let attr = group.get("test").unwrap();
        assert_eq!(
            attr.ipp_values().unwrap(),
            vec![IppValue::Integer(0x1234_5678), IppValue::Integer(0x7765_4321)]
        );
        assert_eq!(group.get("k").unwrap().string_value(), "v");
    }

    #[test]
    fn test_parse_empty_groups() {
        let data = &[2, 0, 0, 1, 0, 0, 0, 9, 1, 2, 4, 0x44, 0, 1, b'a', 0, 0, 5, 3];
        let res = parse(data).unwrap();
        let tags = res.attributes.groups().iter().map(|g| g.tag()).collect::<Vec<_>>();
        assert_eq!(
            tags,
            vec![
                DelimiterTag::OperationAttributes,
                DelimiterTag::JobAttributes,
                DelimiterTag::PrinterAttributes,
                DelimiterTag::UnsupportedAttributes
            ]
        );
        assert_eq!(res.attributes.len(), 1);
        assert!(res.attributes.get("a").unwrap().value().is_empty());
    }

    #[test]
    fn test_parse_with_payload() {
        let data = vec![
            1, 1, 0, 0, 0, 0, 0, 0, 4, 0x21, 0x00, 0x04, b't', b'e', b's', b't', 0x00, 0x04, 0x12, 0x34, 0x56, 0x78, 3,
            0, 0, b'f', b'o', b'o',
        ];

        let res = parse(&data).unwrap();
        assert_eq!(res.header.version, IppVersion::v1_1());
        assert_eq!(res.payload.as_ref(), &[0, 0, b'f', b'o', b'o']);
    }

    #[test]
    fn test_parse_truncated_attribute() {
        let data = &[1, 1, 0, 0, 0, 0, 0, 0, 1, 0x44, 0x00, 0x04, b't', b'e'];
        assert!(matches!(parse(data), Err(IppParseError::TruncatedMessage { .. })));
    }

    #[test]
    fn test_parse_missing_end_tag() {
        let data = &[1, 1, 0, 0, 0, 0, 0, 0, 1, 0x44, 0x00, 0x01, b'k', 0x00, 0x01, b'v'];
        assert!(matches!(parse(data), Err(IppParseError::TruncatedMessage { .. })));
    }

    #[test]
    fn test_parse_name_not_utf8() {
        let data = &[2, 0, 0, 2, 0, 0, 0, 1, 1, 0x44, 0, 1, 0xff, 0, 1, b'x', 3];
        assert!(matches!(parse(data), Err(IppParseError::InvalidName(_))));
    }

    #[test]
    fn test_parse_unknown_group_tag() {
        let data = &[1, 1, 0, 0, 0, 0, 0, 0, 0x0e, 3];
        assert!(matches!(parse(data), Err(IppParseError::UnrecognizedTag(0x0e))));
    }

    #[test]
    fn test_parse_attribute_stops_at_named_unit() {
        let data = Bytes::from_static(&[
            0x44, 0, 1, b'a', 0, 1, b'x', 0x44, 0, 0, 0, 1, b'y', 0x44, 0, 1, b'b', 0, 1, b'z',
        ]);
        let mut parser = IppParser::new(data);
        let first = parser.parse_attribute().unwrap();
        assert_eq!(first.name(), "a");
        assert_eq!(first.additional_values().len(), 1);
        assert_eq!(first.additional_values()[0].value().as_ref(), b"y");

        let second = parser.parse_attribute().unwrap();
        assert_eq!(second.name(), "b");
        assert!(!second.is_multi_value());
    }

    #[test]
    fn test_round_trip_is_byte_exact() {
        let data = vec![
            2, 0, 0, 2, 0, 0, 0, 42, 1, 0x47, 0, 18, b'a', b't', b't', b'r', b'i', b'b', b'u', b't', b'e', b's', b'-',
            b'c', b'h', b'a', b'r', b's', b'e', b't', 0, 5, b'u', b't', b'f', b'-', b'8', 0x44, 0, 2, b'r', b'a', 0, 1,
            b'a', 0x44, 0, 0, 0, 1, b'b', 0x12, 0, 0, 0, 0, 2, 0x23, 0, 1, b'o', 0, 4, 0, 0, 0, 3, 0x4b, 0, 1, b'x', 0,
            2, 0xff, 0xfe, 3, b'%', b'P', b'D', b'F',
        ];
        let res = parse(&data).unwrap();
        assert_eq!(res.to_bytes().unwrap(), data);

        let again = IppParser::new(res.to_bytes().unwrap()).parse().unwrap();
        assert_eq!(again.attributes, res.attributes);
        assert_eq!(again.header.request_id, 42);
    }
}
