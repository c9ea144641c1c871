//!
//! Typed view of IPP attribute values
//!
use std::{convert::Infallible, fmt, str::FromStr};

use bytes::{Buf, BufMut, Bytes, BytesMut};
use enum_as_inner::EnumAsInner;

use crate::{parser::IppParseError, tag::ValueTag};

/// IPP attribute values as defined in [RFC 8010](https://tools.ietf.org/html/rfc8010)
#[derive(Clone, Debug, PartialEq, EnumAsInner)]
pub enum IppValue {
    Integer(i32),
    Enum(i32),
    OctetString(String),
    TextWithoutLanguage(String),
    NameWithoutLanguage(String),
    Charset(String),
    NaturalLanguage(String),
    Uri(String),
    UriScheme(String),
    RangeOfInteger {
        min: i32,
        max: i32,
    },
    Boolean(bool),
    Keyword(String),
    MimeMediaType(String),
    DateTime {
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minutes: u8,
        seconds: u8,
        deci_seconds: u8,
        /// Direction from UTC, `b'+'` or `b'-'`
        utc_dir: u8,
        utc_hours: u8,
        utc_mins: u8,
    },
    MemberAttrName(String),
    Resolution {
        cross_feed: i32,
        feed: i32,
        units: i8,
    },
    NoValue,
    Other {
        tag: ValueTag,
        data: Bytes,
    },
}

fn expect_len(tag: ValueTag, data: &Bytes, len: usize) -> Result<(), IppParseError> {
    if data.len() == len {
        Ok(())
    } else {
        Err(IppParseError::InvalidValue {
            tag: tag.code(),
            len: data.len(),
        })
    }
}

impl IppValue {
    /// Value tag this value is encoded with
    pub fn to_tag(&self) -> ValueTag {
        match *self {
            IppValue::Integer(_) => ValueTag::Integer,
            IppValue::Enum(_) => ValueTag::Enum,
            IppValue::RangeOfInteger { .. } => ValueTag::RangeOfInteger,
            IppValue::Boolean(_) => ValueTag::Boolean,
            IppValue::Keyword(_) => ValueTag::Keyword,
            IppValue::OctetString(_) => ValueTag::OctetStringUnspecified,
            IppValue::TextWithoutLanguage(_) => ValueTag::TextWithoutLanguage,
            IppValue::NameWithoutLanguage(_) => ValueTag::NameWithoutLanguage,
            IppValue::Charset(_) => ValueTag::Charset,
            IppValue::NaturalLanguage(_) => ValueTag::NaturalLanguage,
            IppValue::Uri(_) => ValueTag::Uri,
            IppValue::UriScheme(_) => ValueTag::UriScheme,
            IppValue::MimeMediaType(_) => ValueTag::MimeMediaType,
            IppValue::DateTime { .. } => ValueTag::DateTime,
            IppValue::MemberAttrName(_) => ValueTag::MemberAttrName,
            IppValue::Resolution { .. } => ValueTag::Resolution,
            IppValue::Other { tag, .. } => tag,
            IppValue::NoValue => ValueTag::NoValue,
        }
    }

    /// Interpret raw value bytes according to the value tag
    pub fn parse(tag: ValueTag, mut data: Bytes) -> Result<IppValue, IppParseError> {
        let text = |data: &Bytes| String::from_utf8_lossy(data).into_owned();

        let value = match tag {
            ValueTag::Integer => {
                expect_len(tag, &data, 4)?;
                IppValue::Integer(data.get_i32())
            }
            ValueTag::Enum => {
                expect_len(tag, &data, 4)?;
                IppValue::Enum(data.get_i32())
            }
            ValueTag::Boolean => {
                expect_len(tag, &data, 1)?;
                IppValue::Boolean(data.get_u8() != 0)
            }
            ValueTag::RangeOfInteger => {
                expect_len(tag, &data, 8)?;
                IppValue::RangeOfInteger {
                    min: data.get_i32(),
                    max: data.get_i32(),
                }
            }
            ValueTag::Resolution => {
                expect_len(tag, &data, 9)?;
                IppValue::Resolution {
                    cross_feed: data.get_i32(),
                    feed: data.get_i32(),
                    units: data.get_i8(),
                }
            }
            ValueTag::DateTime => {
                expect_len(tag, &data, 11)?;
                IppValue::DateTime {
                    year: data.get_u16(),
                    month: data.get_u8(),
                    day: data.get_u8(),
                    hour: data.get_u8(),
                    minutes: data.get_u8(),
                    seconds: data.get_u8(),
                    deci_seconds: data.get_u8(),
                    utc_dir: data.get_u8(),
                    utc_hours: data.get_u8(),
                    utc_mins: data.get_u8(),
                }
            }
            ValueTag::OctetStringUnspecified => IppValue::OctetString(text(&data)),
            ValueTag::TextWithoutLanguage => IppValue::TextWithoutLanguage(text(&data)),
            ValueTag::NameWithoutLanguage => IppValue::NameWithoutLanguage(text(&data)),
            ValueTag::Charset => IppValue::Charset(text(&data)),
            ValueTag::NaturalLanguage => IppValue::NaturalLanguage(text(&data)),
            ValueTag::Uri => IppValue::Uri(text(&data)),
            ValueTag::UriScheme => IppValue::UriScheme(text(&data)),
            ValueTag::Keyword => IppValue::Keyword(text(&data)),
            ValueTag::MimeMediaType => IppValue::MimeMediaType(text(&data)),
            ValueTag::MemberAttrName => IppValue::MemberAttrName(text(&data)),
            ValueTag::NoValue => IppValue::NoValue,
            _ => IppValue::Other { tag, data },
        };
        Ok(value)
    }

    /// Text of the string-syntax variants
    pub fn as_text(&self) -> Option<&str> {
        match self {
            IppValue::Keyword(s)
            | IppValue::OctetString(s)
            | IppValue::TextWithoutLanguage(s)
            | IppValue::NameWithoutLanguage(s)
            | IppValue::Charset(s)
            | IppValue::NaturalLanguage(s)
            | IppValue::Uri(s)
            | IppValue::UriScheme(s)
            | IppValue::MimeMediaType(s)
            | IppValue::MemberAttrName(s) => Some(s),
            _ => None,
        }
    }

    /// Raw value bytes, without value tag and length prefix
    pub fn to_bytes(&self) -> Bytes {
        if let Some(text) = self.as_text() {
            return Bytes::copy_from_slice(text.as_bytes());
        }

        let mut buffer = BytesMut::new();
        match *self {
            IppValue::Integer(v) | IppValue::Enum(v) => buffer.put_i32(v),
            IppValue::Boolean(v) => buffer.put_u8(u8::from(v)),
            IppValue::RangeOfInteger { min, max } => {
                buffer.put_i32(min);
                buffer.put_i32(max);
            }
            IppValue::Resolution { cross_feed, feed, units } => {
                buffer.put_i32(cross_feed);
                buffer.put_i32(feed);
                buffer.put_i8(units);
            }
            IppValue::DateTime {
                year,
                month,
                day,
                hour,
                minutes,
                seconds,
                deci_seconds,
                utc_dir,
                utc_hours,
                utc_mins,
            } => {
                buffer.put_u16(year);
                buffer.put_slice(&[month, day, hour, minutes, seconds, deci_seconds]);
                buffer.put_u8(utc_dir);
                buffer.put_slice(&[utc_hours, utc_mins]);
            }
            IppValue::Other { ref data, .. } => return data.clone(),
            _ => {}
        }
        buffer.freeze()
    }
}

impl fmt::Display for IppValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(text) = self.as_text() {
            return f.write_str(text);
        }
        match *self {
            IppValue::Integer(v) | IppValue::Enum(v) => write!(f, "{v}"),
            IppValue::Boolean(v) => write!(f, "{v}"),
            IppValue::RangeOfInteger { min, max } => write!(f, "{min}..{max}"),
            IppValue::Resolution { cross_feed, feed, units } => {
                let unit = if units == 3 { "dpi" } else { "dpcm" };
                write!(f, "{cross_feed}x{feed}{unit}")
            }
            IppValue::DateTime {
                year,
                month,
                day,
                hour,
                minutes,
                seconds,
                deci_seconds,
                utc_dir,
                utc_hours,
                utc_mins,
            } => write!(
                f,
                "{year:04}-{month:02}-{day:02}T{hour:02}:{minutes:02}:{seconds:02}.{deci_seconds}{}{utc_hours:02}:{utc_mins:02}",
                utc_dir as char
            ),
            IppValue::Other { tag, ref data } => write!(f, "{tag}: {}", hex::encode(data)),
            _ => Ok(()),
        }
    }
}

impl FromStr for IppValue {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = match s {
            "true" => IppValue::Boolean(true),
            "false" => IppValue::Boolean(false),
            other => {
                if let Ok(iv) = other.parse::<i32>() {
                    IppValue::Integer(iv)
                } else {
                    IppValue::Keyword(other.to_owned())
                }
            }
        };
        Ok(value)
    }
}
