//!
//! IPP request and response
//!
use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use bytes::{BufMut, Bytes, BytesMut};
use http::Uri;
use log::debug;
use num_traits::FromPrimitive;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    attribute::{IppAttribute, IppAttributes},
    error::IppError,
    model::{IppVersion, JobState, JobStateReasons, Operation, StatusCode},
    parser::{IppParseError, IppParser},
    tag::DelimiterTag,
    value::IppValue,
    IppHeader,
};

/// IPP request/response struct. Requests carry an operation in the header, responses a status code.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IppRequestResponse {
    pub(crate) header: IppHeader,
    pub(crate) attributes: IppAttributes,
    pub(crate) payload: Bytes,
}

fn charset_and_language(attributes: &mut IppAttributes) {
    attributes.add(
        DelimiterTag::OperationAttributes,
        IppAttribute::new(IppAttribute::ATTRIBUTES_CHARSET, IppValue::Charset("utf-8".to_string())),
    );
    attributes.add(
        DelimiterTag::OperationAttributes,
        IppAttribute::new(
            IppAttribute::ATTRIBUTES_NATURAL_LANGUAGE,
            IppValue::NaturalLanguage("en".to_string()),
        ),
    );
}

impl IppRequestResponse {
    /// Create new IPP request for the operation and uri
    pub fn new(version: IppVersion, operation: Operation, uri: Option<Uri>) -> IppRequestResponse {
        let header = IppHeader::new(version, operation as u16, 1);
        let mut attributes = IppAttributes::new();
        charset_and_language(&mut attributes);

        if let Some(uri) = uri {
            attributes.add(
                DelimiterTag::OperationAttributes,
                IppAttribute::new(IppAttribute::PRINTER_URI, IppValue::Uri(uri.to_string())),
            );
        }

        IppRequestResponse {
            header,
            attributes,
            payload: Bytes::new(),
        }
    }

    /// Create response from status and id
    pub fn new_response(version: IppVersion, status: StatusCode, id: i32) -> IppRequestResponse {
        let mut attributes = IppAttributes::new();
        charset_and_language(&mut attributes);

        IppRequestResponse {
            header: IppHeader::new(version, status as u16, id),
            attributes,
            payload: Bytes::new(),
        }
    }

    /// Create a successful response to a request: same version and request id, copy of the request groups
    pub fn response_for(request: &IppRequestResponse) -> IppRequestResponse {
        IppRequestResponse {
            header: IppHeader::new(
                request.header.version,
                StatusCode::SuccessfulOk as u16,
                request.header.request_id,
            ),
            attributes: request.attributes.clone(),
            payload: Bytes::new(),
        }
    }

    /// Create an error response to a request carrying a status message
    pub fn error_for<S>(request: &IppRequestResponse, status: StatusCode, message: S) -> IppRequestResponse
    where
        S: AsRef<str>,
    {
        let mut response = IppRequestResponse::new_response(request.header.version, status, request.header.request_id);
        response.set_status_message(message);
        response
    }

    /// Decode a message from bytes
    pub fn from_bytes<B>(bytes: B) -> Result<IppRequestResponse, IppParseError>
    where
        B: Into<Bytes>,
    {
        IppParser::new(bytes.into()).parse()
    }

    /// Get IPP header
    pub fn header(&self) -> &IppHeader {
        &self.header
    }

    /// Get mutable IPP header
    pub fn header_mut(&mut self) -> &mut IppHeader {
        &mut self.header
    }

    /// Get attributes
    pub fn attributes(&self) -> &IppAttributes {
        &self.attributes
    }

    /// Get attributes
    pub fn attributes_mut(&mut self) -> &mut IppAttributes {
        &mut self.attributes
    }

    /// Get payload
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Replace payload
    pub fn set_payload<B>(&mut self, payload: B)
    where
        B: Into<Bytes>,
    {
        self.payload = payload.into();
    }

    /// Consume request/response and return a payload
    pub fn into_payload(self) -> Bytes {
        self.payload
    }

    pub fn request_id(&self) -> i32 {
        self.header.request_id
    }

    pub fn set_request_id(&mut self, request_id: i32) {
        self.header.request_id = request_id;
    }

    /// Set status code of a response
    pub fn set_status_code(&mut self, status: StatusCode) {
        self.header.operation_or_status = status as u16;
    }

    /// Find an attribute by name in any group
    pub fn attribute(&self, name: &str) -> Result<&IppAttribute, IppError> {
        self.attributes
            .get(name)
            .ok_or_else(|| IppError::AttributeNotFound(name.to_owned()))
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.get(name).is_some()
    }

    /// Add or replace an operation attribute
    pub fn set_operation_attribute(&mut self, attribute: IppAttribute) {
        self.attributes.add(DelimiterTag::OperationAttributes, attribute);
    }

    /// Add or replace a job attribute
    pub fn set_job_attribute(&mut self, attribute: IppAttribute) {
        self.attributes.add(DelimiterTag::JobAttributes, attribute);
    }

    /// Add or replace a printer attribute
    pub fn set_printer_attribute(&mut self, attribute: IppAttribute) {
        self.attributes.add(DelimiterTag::PrinterAttributes, attribute);
    }

    pub fn printer_uri(&self) -> Result<Uri, IppError> {
        self.attribute(IppAttribute::PRINTER_URI)?.uri_value()
    }

    pub fn set_printer_uri(&mut self, uri: &Uri) {
        self.set_operation_attribute(IppAttribute::new(
            IppAttribute::PRINTER_URI,
            IppValue::Uri(uri.to_string()),
        ));
    }

    pub fn job_id(&self) -> Result<i32, IppError> {
        self.attribute(IppAttribute::JOB_ID)?.int_value()
    }

    /// Set job-id as an operation attribute, the target of job operations
    pub fn set_job_id(&mut self, job_id: i32) {
        self.set_operation_attribute(IppAttribute::new(IppAttribute::JOB_ID, IppValue::Integer(job_id)));
    }

    pub fn job_uri(&self) -> Result<Uri, IppError> {
        self.attribute(IppAttribute::JOB_URI)?.uri_value()
    }

    pub fn set_job_uri(&mut self, uri: &Uri) {
        self.set_job_attribute(IppAttribute::new(IppAttribute::JOB_URI, IppValue::Uri(uri.to_string())));
    }

    pub fn job_state(&self) -> Result<JobState, IppError> {
        let attr = self.attribute(IppAttribute::JOB_STATE)?;
        JobState::from_i32(attr.int_value()?).ok_or_else(|| IppError::InvalidAttributeType(attr.name().to_owned()))
    }

    pub fn set_job_state(&mut self, state: JobState) {
        self.set_job_attribute(IppAttribute::new(IppAttribute::JOB_STATE, IppValue::Enum(state as i32)));
    }

    pub fn job_state_reasons(&self) -> Result<JobStateReasons, IppError> {
        let attr = self.attribute(IppAttribute::JOB_STATE_REASONS)?;
        Ok(JobStateReasons::from_keyword(&attr.string_value()))
    }

    pub fn set_job_state_reasons(&mut self, reasons: JobStateReasons) {
        self.set_job_attribute(IppAttribute::new(
            IppAttribute::JOB_STATE_REASONS,
            IppValue::Keyword(reasons.keyword().to_owned()),
        ));
    }

    /// Status message of a response, if any
    pub fn status_message(&self) -> Option<String> {
        self.attributes.get(IppAttribute::STATUS_MESSAGE).map(|a| a.string_value())
    }

    pub fn set_status_message<S>(&mut self, message: S)
    where
        S: AsRef<str>,
    {
        self.set_operation_attribute(IppAttribute::new(
            IppAttribute::STATUS_MESSAGE,
            IppValue::TextWithoutLanguage(message.as_ref().to_owned()),
        ));
    }

    /// Write message including payload to byte array
    pub fn to_bytes(&self) -> Result<Bytes, IppParseError> {
        let mut buffer = BytesMut::new();
        buffer.put(self.header.to_bytes());
        buffer.put(self.attributes.to_bytes()?);
        buffer.put_slice(&self.payload);
        debug!("IPP message size: {}", buffer.len());
        Ok(buffer.freeze())
    }

    /// Header only rendering
    pub fn to_short_string(&self) -> String {
        format!(
            "|{}|{:#06x}|{}|",
            self.header.version, self.header.operation_or_status, self.header.request_id
        )
    }

    /// Rendering with every group and every attribute value
    pub fn to_long_string(&self) -> String {
        let mut s = self.to_short_string();
        for group in self.attributes.groups() {
            s.push_str(&format!("\n{}", group.tag()));
            for attr in group.attributes() {
                s.push_str(&format!("\n\t{}", attr.to_long_string()));
            }
        }
        s.push_str(&format!("\n{} bytes of data", self.payload.len()));
        s
    }

    /// Write the encoded message into `dir`, returns the written path
    pub fn record_to<P>(&self, dir: P, kind: &str) -> Result<PathBuf, IppError>
    where
        P: AsRef<Path>,
    {
        fs::create_dir_all(dir.as_ref())?;
        let path = dir.as_ref().join(format!(
            "{kind}-{}-{:04x}.ipp",
            self.header.request_id, self.header.operation_or_status
        ));
        fs::write(&path, self.to_bytes()?)?;
        debug!("Recorded {kind} to {}", path.display());
        Ok(path)
    }
}

impl fmt::Display for IppRequestResponse {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}{} groups|{} attributes|{} bytes of data|",
            self.to_short_string(),
            self.attributes.groups().len(),
            self.attributes.len(),
            self.payload.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_only_response() {
        let response = IppRequestResponse {
            header: IppHeader::new(IppVersion::v2_0(), StatusCode::SuccessfulOk as u16, 1),
            attributes: IppAttributes::new(),
            payload: Bytes::new(),
        };
        assert_eq!(response.to_bytes().unwrap(), vec![2, 0, 0, 0, 0, 0, 0, 1, 3]);

        let decoded = IppRequestResponse::from_bytes(response.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, response);
    }

    #[test]
    fn test_new_request() {
        let uri: Uri = "ipp://localhost:631/printers/test-printer".parse().unwrap();
        let request = IppRequestResponse::new(IppVersion::v2_0(), Operation::GetPrinterAttributes, Some(uri.clone()));

        let names = request.attributes().groups()[0]
            .attributes()
            .iter()
            .map(|a| a.name())
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            vec!["attributes-charset", "attributes-natural-language", "printer-uri"]
        );
        assert_eq!(request.printer_uri().unwrap(), uri);
        assert_eq!(request.header().operation(), Some(Operation::GetPrinterAttributes));
    }

    #[test]
    fn test_round_trip_request() {
        let uri: Uri = "ipp://localhost/printers/p".parse().unwrap();
        let mut request = IppRequestResponse::new(IppVersion::v1_1(), Operation::SendDocument, Some(uri));
        request.set_job_id(12);
        request.set_operation_attribute(IppAttribute::of(
            crate::tag::ValueTag::Keyword,
            IppAttribute::REQUESTED_ATTRIBUTES,
            ["copies-supported", "page-ranges-supported"],
        ));
        request.set_payload(&b"%!PS"[..]);

        let decoded = IppRequestResponse::from_bytes(request.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, request);
        assert_eq!(decoded.to_bytes().unwrap(), request.to_bytes().unwrap());

        let attr = decoded.attribute(IppAttribute::REQUESTED_ATTRIBUTES).unwrap();
        assert!(attr.is_multi_value());
        assert_eq!(attr.additional_values().len(), 1);
        assert_eq!(decoded.job_id().unwrap(), 12);
        assert_eq!(decoded.payload().as_ref(), b"%!PS");
    }

    #[test]
    fn test_attribute_not_found() {
        let request = IppRequestResponse::new(IppVersion::v2_0(), Operation::GetJobs, None);
        assert!(matches!(
            request.attribute("job-id"),
            Err(IppError::AttributeNotFound(ref name)) if name == "job-id"
        ));
        assert!(!request.has_attribute("job-id"));
        assert!(request.has_attribute("attributes-charset"));
    }

    #[test]
    fn test_response_helpers() {
        let mut request = IppRequestResponse::new(IppVersion::v2_0(), Operation::CreateJob, None);
        request.set_request_id(77);

        let mut response = IppRequestResponse::response_for(&request);
        assert_eq!(response.request_id(), 77);
        assert!(response.header().status_code().is_success());

        response.set_job_state(JobState::PendingHeld);
        response.set_job_state_reasons(JobStateReasons::JobIncoming);
        response.set_job_uri(&"ipp://localhost:631/jobs/3".parse().unwrap());

        let decoded = IppRequestResponse::from_bytes(response.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded.job_state().unwrap(), JobState::PendingHeld);
        assert_eq!(decoded.job_state_reasons().unwrap(), JobStateReasons::JobIncoming);
        assert_eq!(decoded.job_uri().unwrap().path(), "/jobs/3");
        assert_eq!(decoded.attributes().groups_of(DelimiterTag::JobAttributes).count(), 1);
    }

    #[test]
    fn test_error_for() {
        let mut request = IppRequestResponse::new(IppVersion::v1_1(), Operation::PrintJob, None);
        request.set_request_id(5);
        let response = IppRequestResponse::error_for(&request, StatusCode::ClientErrorBadRequest, "no target");
        assert_eq!(response.header().status_code(), StatusCode::ClientErrorBadRequest);
        assert_eq!(response.request_id(), 5);
        assert_eq!(response.header().version, IppVersion::v1_1());
        assert_eq!(response.status_message().as_deref(), Some("no target"));
    }

    #[test]
    fn test_oversize_status_message_not_encoded() {
        let request = IppRequestResponse::new(IppVersion::v2_0(), Operation::GetJobs, None);
        let mut response = IppRequestResponse::error_for(&request, StatusCode::ServerErrorInternalError, "");
        response.set_status_message("a".repeat(70_000));
        assert!(matches!(
            response.to_bytes(),
            Err(IppParseError::ValueTooLong { len: 70_000, .. })
        ));
    }

    #[test]
    fn test_renderings() {
        let mut request = IppRequestResponse::new(IppVersion::v2_0(), Operation::GetJobs, None);
        request.set_request_id(3);
        request.set_payload(&b"xyz"[..]);

        assert_eq!(request.to_short_string(), "|2.0|0x000a|3|");
        assert_eq!(request.to_string(), "|2.0|0x000a|3|1 groups|2 attributes|3 bytes of data|");

        let long = request.to_long_string();
        assert!(long.contains("operation-attributes-tag"));
        assert!(long.contains("attributes-charset=utf-8"));
        assert!(long.contains("attributes-natural-language=en"));
        assert!(long.ends_with("3 bytes of data"));
    }
}
