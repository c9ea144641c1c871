//!
//! IPP print protocol codec and print proxy. The crate consists of:
//! * the binary codec for IPP messages, attribute groups and attributes ([RFC 8010](https://tools.ietf.org/html/rfc8010)).
//! * the operation registry which builds request templates, validates inbound requests and
//!   synthesizes spooler responses.
//! * the dispatcher which either forwards requests to an upstream IPP server or emulates one locally.
//! * an HTTP listener serving the dispatcher (feature `server`, enabled by default).
//!
//! The following feature flags are supported:
//! * `server` - enable the `axum` based HTTP listener
//! * `serde` - derive `Serialize` and `Deserialize` for the data types
//!
//! Usage examples:
//!
//!```rust,no_run
//! // decode a request and answer it locally
//! use ipp_relay::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dispatcher = IppDispatcher::new("file:/tmp/IPP".parse()?);
//!     let uri: Uri = "ipp://localhost:631/printers/test-printer".parse()?;
//!     let operation = IppOperationBuilder::create_job(uri).job_title("report").build();
//!     let response = dispatcher.send(operation);
//!     if response.header().status_code().is_success() {
//!         println!("job-id: {}", response.job_id()?);
//!     }
//!     Ok(())
//! }
//!```
//!```rust,no_run
//! // low-level codec
//! use ipp_relay::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let uri: Uri = "ipp://localhost:631/printers/test-printer".parse()?;
//!     let request = IppRequestResponse::new(IppVersion::v2_0(), Operation::GetPrinterAttributes, Some(uri));
//!     let bytes = request.to_bytes()?;
//!     let decoded = IppRequestResponse::from_bytes(bytes)?;
//!     println!("{}", decoded.to_long_string());
//!     Ok(())
//! }
//!```

use bytes::{BufMut, Bytes, BytesMut};
use num_traits::FromPrimitive;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::model::{IppVersion, Operation, StatusCode};

pub mod attribute;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod model;
pub mod operation;
pub mod parser;
pub mod reader;
pub mod request;
#[cfg(feature = "server")]
pub mod server;
pub mod tag;
pub mod util;
pub mod value;

pub mod prelude {
    //!
    //! Common imports
    //!
    pub use http::Uri;
    pub use num_traits::FromPrimitive as _;

    pub use crate::{
        attribute::{AdditionalValue, IppAttribute, IppAttributeGroup, IppAttributes},
        config::{ForwardTarget, ProxyConfig},
        dispatch::{IppDispatcher, IppTransport},
        model::*,
        operation::{builder::IppOperationBuilder, IppOperation},
        request::IppRequestResponse,
        tag::{DelimiterTag, ValueTag},
        value::IppValue,
    };

    pub use super::client::IppClient;
    pub use super::error::IppError;

    pub use super::IppHeader;
}

/// IPP request and response header
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IppHeader {
    /// IPP protocol version
    pub version: IppVersion,
    /// Operation tag for requests, status for responses
    pub operation_or_status: u16,
    /// ID of the request
    pub request_id: i32,
}

impl IppHeader {
    /// Create IPP header
    pub fn new(version: IppVersion, operation_or_status: u16, request_id: i32) -> IppHeader {
        IppHeader {
            version,
            operation_or_status,
            request_id,
        }
    }

    /// Write header to a byte array
    pub fn to_bytes(&self) -> Bytes {
        let mut buffer = BytesMut::new();
        buffer.put_u16(self.version.0);
        buffer.put_u16(self.operation_or_status);
        buffer.put_i32(self.request_id);

        buffer.freeze()
    }

    /// Decode and get IPP status code from the header
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.operation_or_status).unwrap_or(StatusCode::UnknownStatusCode)
    }

    /// Decode and get IPP operation from the header, `None` for codes outside the supported set
    pub fn operation(&self) -> Option<Operation> {
        Operation::from_u16(self.operation_or_status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_to_bytes() {
        let header = IppHeader::new(IppVersion::v2_1(), 0x1234, 0x2a55_aa55);
        let buf = header.to_bytes();
        assert_eq!(buf, vec![0x02, 0x01, 0x12, 0x34, 0x2a, 0x55, 0xaa, 0x55]);
    }

    #[test]
    fn test_header_negative_request_id() {
        let header = IppHeader::new(IppVersion::v2_0(), 0, -1);
        assert_eq!(header.to_bytes(), vec![0x02, 0x00, 0x00, 0x00, 0xff, 0xff, 0xff, 0xff]);
    }

    #[test]
    fn test_header_codes() {
        let header = IppHeader::new(IppVersion::v2_0(), 0x0005, 1);
        assert_eq!(header.operation(), Some(Operation::CreateJob));

        let header = IppHeader::new(IppVersion::v2_0(), 0x0406, 1);
        assert_eq!(header.status_code(), StatusCode::ClientErrorNotFound);

        let header = IppHeader::new(IppVersion::v2_0(), 0x7777, 1);
        assert_eq!(header.operation(), None);
        assert_eq!(header.status_code(), StatusCode::UnknownStatusCode);
    }
}
