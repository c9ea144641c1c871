//!
//! IPP error
//!
use std::io;

use http::uri::InvalidUri;

use crate::{model::StatusCode, parser::IppParseError};

/// IPP error
#[allow(clippy::large_enum_variant)]
#[derive(Debug, thiserror::Error)]
pub enum IppError {
    #[error(transparent)]
    /// HTTP protocol error
    HttpError(#[from] http::Error),

    #[error("HTTP request error: {0}")]
    /// Upstream answered with a non-success HTTP status
    RequestError(u16),

    #[error(transparent)]
    /// Network or file I/O error
    IoError(#[from] io::Error),

    #[error("IPP status error: {0}")]
    /// IPP status error
    StatusError(StatusCode),

    #[error(transparent)]
    /// Parsing error
    ParseError(#[from] IppParseError),

    #[error("{0}")]
    /// Request does not match the operation asked to handle it
    ValidationError(String),

    #[error("Attribute not found: {0}")]
    /// Required attribute is absent
    AttributeNotFound(String),

    #[error("Invalid attribute type: {0}")]
    /// Attribute exists but its value has an unexpected syntax
    InvalidAttributeType(String),

    #[error(transparent)]
    /// Invalid URI
    InvalidUri(#[from] InvalidUri),

    #[error(transparent)]
    /// Client error
    ClientError(#[from] ureq::Error),
}
