//!
//! IPP reader
//!
use bytes::{Buf, Bytes};

use crate::{model::IppVersion, parser::IppParseError, IppHeader};

/// Tag and name length of the next attribute unit, obtained without moving the cursor
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct UnitHead {
    pub tag: u8,
    pub name_len: u16,
}

impl UnitHead {
    /// A unit with an empty name continues the previous attribute
    pub fn is_additional_value(&self) -> bool {
        self.name_len == 0
    }
}

/// IPP reader over an in-memory message with one unit of lookahead
pub struct IppReader {
    inner: Bytes,
}

impl IppReader {
    /// Create IppReader from a byte buffer
    pub fn new<B>(inner: B) -> Self
    where
        B: Into<Bytes>,
    {
        IppReader { inner: inner.into() }
    }

    /// Number of unread bytes
    pub fn remaining(&self) -> usize {
        self.inner.remaining()
    }

    fn ensure(&self, needed: usize) -> Result<(), IppParseError> {
        let remaining = self.inner.remaining();
        if remaining < needed {
            Err(IppParseError::TruncatedMessage { needed, remaining })
        } else {
            Ok(())
        }
    }

    fn read_bytes(&mut self, len: usize) -> Result<Bytes, IppParseError> {
        self.ensure(len)?;
        Ok(self.inner.split_to(len))
    }

    fn read_u16(&mut self) -> Result<u16, IppParseError> {
        self.ensure(2)?;
        Ok(self.inner.get_u16())
    }

    fn read_i32(&mut self) -> Result<i32, IppParseError> {
        self.ensure(4)?;
        Ok(self.inner.get_i32())
    }

    /// Look at the next byte without consuming it
    pub fn peek_tag(&self) -> Result<u8, IppParseError> {
        self.ensure(1)?;
        Ok(self.inner[0])
    }

    /// Look at the tag and name length of the next unit without consuming them
    pub fn peek_unit(&self) -> Option<UnitHead> {
        if self.inner.len() < 3 {
            return None;
        }
        Some(UnitHead {
            tag: self.inner[0],
            name_len: u16::from_be_bytes([self.inner[1], self.inner[2]]),
        })
    }

    /// Consume the unit head returned by the preceding `peek_unit`
    pub fn commit_unit(&mut self, head: UnitHead) {
        debug_assert_eq!(self.peek_unit(), Some(head));
        self.inner.advance(3);
    }

    /// Read tag
    pub fn read_tag(&mut self) -> Result<u8, IppParseError> {
        self.ensure(1)?;
        Ok(self.inner.get_u8())
    }

    /// Read IPP name from [len; name] element
    pub fn read_name(&mut self) -> Result<String, IppParseError> {
        let name_len = self.read_u16()?;
        let name = self.read_bytes(name_len as usize)?;
        String::from_utf8(name.to_vec()).map_err(|_| IppParseError::InvalidName(hex::encode(&name)))
    }

    /// Read IPP value from [len; value] element
    pub fn read_value(&mut self) -> Result<Bytes, IppParseError> {
        let value_len = self.read_u16()?;
        self.read_bytes(value_len as usize)
    }

    /// Read IPP header
    pub fn read_header(&mut self) -> Result<IppHeader, IppParseError> {
        self.ensure(8)?;
        let version = IppVersion(self.read_u16()?);
        let operation_status = self.read_u16()?;
        let request_id = self.read_i32()?;

        Ok(IppHeader::new(version, operation_status, request_id))
    }

    /// Return everything not read so far
    pub fn into_payload(self) -> Bytes {
        self.inner
    }
}

impl From<Bytes> for IppReader {
    fn from(b: Bytes) -> Self {
        IppReader::new(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StatusCode;

    #[test]
    fn test_read_name() {
        let mut reader = IppReader::new(vec![0x00, 0x04, b't', b'e', b's', b't']);
        let name = reader.read_name().unwrap();
        assert_eq!(name, "test");
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_read_name_not_utf8() {
        let mut reader = IppReader::new(vec![0x00, 0x02, 0xff, b'a']);
        assert!(matches!(reader.read_name(), Err(IppParseError::InvalidName(ref n)) if n == "ff61"));
    }

    #[test]
    fn test_read_value() {
        let mut reader = IppReader::new(vec![0x00, 0x04, b't', b'e', b's', b't']);
        let value = reader.read_value().unwrap();
        assert_eq!(value.as_ref(), b"test");
    }

    #[test]
    fn test_read_value_truncated() {
        let mut reader = IppReader::new(vec![0x00, 0x04, b't', b'e']);
        let result = reader.read_value();
        assert!(matches!(
            result,
            Err(IppParseError::TruncatedMessage { needed: 4, remaining: 2 })
        ));
    }

    #[test]
    fn test_read_header() {
        let mut reader = IppReader::new(vec![0x01, 0x01, 0x04, 0x01, 0x11, 0x22, 0x33, 0x44]);
        let header = reader.read_header().unwrap();
        assert_eq!(header.version, IppVersion::v1_1());
        assert_eq!(header.operation_or_status, 0x401);
        assert_eq!(header.request_id, 0x11223344);
        assert_eq!(header.status_code(), StatusCode::ClientErrorForbidden);
    }

    #[test]
    fn test_read_header_signed_request_id() {
        let mut reader = IppReader::new(vec![0x02, 0x00, 0x00, 0x02, 0xff, 0xff, 0xff, 0xfe]);
        let header = reader.read_header().unwrap();
        assert_eq!(header.request_id, -2);
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut reader = IppReader::new(vec![0x44, 0x00, 0x00, 0x00, 0x01, b'x', 0x03]);
        let head = reader.peek_unit().unwrap();
        assert_eq!(head, UnitHead { tag: 0x44, name_len: 0 });
        assert!(head.is_additional_value());
        assert_eq!(reader.remaining(), 7);
        assert_eq!(reader.peek_tag().unwrap(), 0x44);

        reader.commit_unit(head);
        assert_eq!(reader.read_value().unwrap().as_ref(), b"x");
        assert_eq!(reader.peek_unit(), None);
        assert_eq!(reader.peek_tag().unwrap(), 0x03);
        assert_eq!(reader.into_payload().as_ref(), &[0x03]);
    }
}
