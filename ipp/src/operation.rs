//!
//! IPP operations. Each supported operation code is registered with a request template,
//! the target it addresses and a decorator for locally synthesized responses.
//!
use std::fmt;

use bytes::Bytes;
use http::Uri;
use log::{debug, warn};

use crate::{
    attribute::{IppAttribute, IppAttributeGroup},
    error::IppError,
    model::{IppVersion, JobState, JobStateReasons, Operation, Orientation, PrinterState},
    request::IppRequestResponse,
    tag::{DelimiterTag, ValueTag},
    util,
    value::IppValue,
};

pub mod builder;
pub mod cups;

const GET_JOBS_ATTRIBUTES: &[&str] = &[
    IppAttribute::JOB_ID,
    IppAttribute::JOB_IMPRESSIONS_COMPLETED,
    IppAttribute::JOB_MEDIA_SHEETS_COMPLETED,
    IppAttribute::JOB_NAME,
    IppAttribute::JOB_ORIGINATING_USER_NAME,
    IppAttribute::JOB_STATE,
    IppAttribute::JOB_STATE_REASONS,
];

const PRINTER_DESCRIPTION_ATTRIBUTES: &[&str] = &[
    IppAttribute::COPIES_SUPPORTED,
    IppAttribute::PAGE_RANGES_SUPPORTED,
    IppAttribute::PRINTER_NAME,
    IppAttribute::PRINTER_INFO,
    IppAttribute::PRINTER_LOCATION,
    IppAttribute::PRINTER_MAKE_AND_MODEL,
    IppAttribute::PRINTER_URI_SUPPORTED,
    IppAttribute::MEDIA_SUPPORTED,
    IppAttribute::MEDIA_DEFAULT,
    IppAttribute::SIDES_SUPPORTED,
    IppAttribute::SIDES_DEFAULT,
    IppAttribute::ORIENTATION_REQUESTED_SUPPORTED,
    IppAttribute::PRINTER_RESOLUTION_SUPPORTED,
    IppAttribute::PRINTER_RESOLUTION_DEFAULT,
    IppAttribute::NUMBER_UP_DEFAULT,
    IppAttribute::NUMBER_UP_SUPPORTED,
    IppAttribute::DOCUMENT_FORMAT_SUPPORTED,
    IppAttribute::PRINT_COLOR_MODE_SUPPORTED,
    IppAttribute::PRINT_COLOR_MODE_DEFAULT,
];

const DOCUMENT_FORMATS: &[&str] = &[
    "application/octet-stream",
    "application/pdf",
    "application/postscript",
    "application/vnd.cups-pdf",
    "application/vnd.cups-raw",
    "image/gif",
    "image/jpeg",
    "image/png",
    "image/tiff",
    "text/html",
    "text/plain",
];

const MEDIA: &[&str] = &[
    "na_letter_8.5x11in",
    "iso_a4_210x297mm",
    "iso_a5_148x210mm",
    "iso_a6_105x148mm",
    "iso_b5_176x250mm",
    "iso_c5_162x229mm",
    "iso_dl_110x220mm",
    "na_legal_8.5x14in",
    "na_executive_7.25x10.5in",
];

/// What an operation addresses
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum OperationTarget {
    /// no target attribute
    None,
    /// printer-uri
    Printer,
    /// printer-uri and job-id, or job-uri
    Job,
}

/// Registry entry for one operation code
#[derive(Debug)]
struct OperationSpec {
    operation: Operation,
    target: OperationTarget,
    template: fn(&mut IppRequestResponse),
    respond: fn(&IppOperation, &mut IppRequestResponse),
}

static PRINT_JOB: OperationSpec = OperationSpec {
    operation: Operation::PrintJob,
    target: OperationTarget::Printer,
    template: print_job_template,
    respond: print_job_response,
};

static CREATE_JOB: OperationSpec = OperationSpec {
    operation: Operation::CreateJob,
    target: OperationTarget::Printer,
    template: base_template,
    respond: no_response_attributes,
};

static SEND_DOCUMENT: OperationSpec = OperationSpec {
    operation: Operation::SendDocument,
    target: OperationTarget::Job,
    template: send_document_template,
    respond: print_job_response,
};

static CANCEL_JOB: OperationSpec = OperationSpec {
    operation: Operation::CancelJob,
    target: OperationTarget::Job,
    template: base_template,
    respond: no_response_attributes,
};

static GET_JOBS: OperationSpec = OperationSpec {
    operation: Operation::GetJobs,
    target: OperationTarget::Printer,
    template: get_jobs_template,
    respond: no_response_attributes,
};

static GET_PRINTER_ATTRIBUTES: OperationSpec = OperationSpec {
    operation: Operation::GetPrinterAttributes,
    target: OperationTarget::Printer,
    template: get_printer_attributes_template,
    respond: printer_attributes_response,
};

static GET_PRINTERS: OperationSpec = OperationSpec {
    operation: Operation::CupsGetPrinters,
    target: OperationTarget::None,
    template: base_template,
    respond: cups::get_printers_response,
};

static GET_DEFAULT: OperationSpec = OperationSpec {
    operation: Operation::CupsGetDefault,
    target: OperationTarget::None,
    template: cups::get_default_template,
    respond: cups::get_default_response,
};

static OPERATIONS: [&OperationSpec; 8] = [
    &PRINT_JOB,
    &CREATE_JOB,
    &SEND_DOCUMENT,
    &CANCEL_JOB,
    &GET_JOBS,
    &GET_PRINTER_ATTRIBUTES,
    &GET_PRINTERS,
    &GET_DEFAULT,
];

fn lookup(code: u16) -> Option<&'static OperationSpec> {
    OPERATIONS.iter().copied().find(|spec| spec.operation as u16 == code)
}

pub(crate) fn base_template(request: &mut IppRequestResponse) {
    request.set_operation_attribute(IppAttribute::new(
        IppAttribute::REQUESTING_USER_NAME,
        IppValue::NameWithoutLanguage(util::current_user_name()),
    ));
}

fn print_job_template(request: &mut IppRequestResponse) {
    base_template(request);
    request.set_job_attribute(IppAttribute::new(IppAttribute::COPIES, IppValue::Integer(1)));
    request.set_job_attribute(IppAttribute::new(
        IppAttribute::ORIENTATION_REQUESTED,
        IppValue::Enum(Orientation::Portrait as i32),
    ));
    request.set_job_attribute(IppAttribute::new(
        IppAttribute::OUTPUT_MODE,
        IppValue::Keyword("monochrome".to_owned()),
    ));
}

fn send_document_template(request: &mut IppRequestResponse) {
    print_job_template(request);
    request.set_operation_attribute(IppAttribute::new(IppAttribute::LAST_DOCUMENT, IppValue::Boolean(true)));
}

fn get_jobs_template(request: &mut IppRequestResponse) {
    base_template(request);
    request.set_operation_attribute(IppAttribute::of(
        ValueTag::Keyword,
        IppAttribute::REQUESTED_ATTRIBUTES,
        GET_JOBS_ATTRIBUTES.iter().copied(),
    ));
}

fn get_printer_attributes_template(request: &mut IppRequestResponse) {
    base_template(request);
    request.set_operation_attribute(IppAttribute::of(
        ValueTag::Keyword,
        IppAttribute::REQUESTED_ATTRIBUTES,
        PRINTER_DESCRIPTION_ATTRIBUTES.iter().copied(),
    ));
}

fn no_response_attributes(_: &IppOperation, _: &mut IppRequestResponse) {}

fn print_job_response(op: &IppOperation, response: &mut IppRequestResponse) {
    if op.job_state.is_none() {
        response.set_job_state(JobState::Completed);
    }
}

fn printer_attributes_response(op: &IppOperation, response: &mut IppRequestResponse) {
    let printer_uri = op.target_uri();
    let mut group = IppAttributeGroup::new(DelimiterTag::PrinterAttributes);

    group.add(IppAttribute::new(
        IppAttribute::PRINTER_URI_SUPPORTED,
        IppValue::Uri(printer_uri.to_string()),
    ));
    group.add(IppAttribute::new(
        IppAttribute::PRINTER_NAME,
        IppValue::NameWithoutLanguage(cups::printer_name(&printer_uri)),
    ));
    group.add(IppAttribute::new(
        IppAttribute::PRINTER_LOCATION,
        IppValue::TextWithoutLanguage("unknown".to_owned()),
    ));
    group.add(IppAttribute::new(
        IppAttribute::PRINTER_INFO,
        IppValue::TextWithoutLanguage(concat!("provided by ", env!("CARGO_PKG_NAME")).to_owned()),
    ));
    group.add(IppAttribute::new(
        IppAttribute::PRINTER_MAKE_AND_MODEL,
        IppValue::TextWithoutLanguage("Generic PDF Printer".to_owned()),
    ));
    group.add(IppAttribute::new(
        IppAttribute::PRINTER_STATE,
        IppValue::Enum(PrinterState::Idle as i32),
    ));
    group.add(IppAttribute::new(IppAttribute::PRINTER_IS_ACCEPTING_JOBS, IppValue::Boolean(true)));
    group.add(IppAttribute::of(
        ValueTag::MimeMediaType,
        IppAttribute::DOCUMENT_FORMAT_SUPPORTED,
        DOCUMENT_FORMATS.iter().copied(),
    ));
    group.add(IppAttribute::of(
        ValueTag::Keyword,
        IppAttribute::MEDIA_SUPPORTED,
        MEDIA.iter().copied(),
    ));
    group.add(IppAttribute::new(
        IppAttribute::MEDIA_DEFAULT,
        IppValue::Keyword("iso_a4_210x297mm".to_owned()),
    ));
    group.add(IppAttribute::of(
        ValueTag::Keyword,
        IppAttribute::PRINT_COLOR_MODE_SUPPORTED,
        ["monochrome", "color"],
    ));
    group.add(IppAttribute::new(
        IppAttribute::PRINT_COLOR_MODE_DEFAULT,
        IppValue::Keyword("color".to_owned()),
    ));
    group.add(IppAttribute::with_values(
        IppAttribute::PRINTER_RESOLUTION_SUPPORTED,
        [300, 600, 1200].map(|dpi| IppValue::Resolution {
            cross_feed: dpi,
            feed: dpi,
            units: 3,
        }),
    ));
    group.add(IppAttribute::new(
        IppAttribute::PRINTER_RESOLUTION_DEFAULT,
        IppValue::Resolution {
            cross_feed: 600,
            feed: 600,
            units: 3,
        },
    ));
    group.add(IppAttribute::of(
        ValueTag::Keyword,
        IppAttribute::SIDES_SUPPORTED,
        ["one-sided", "two-sided-long-edge", "two-sided-short-edge"],
    ));
    group.add(IppAttribute::new(
        IppAttribute::SIDES_DEFAULT,
        IppValue::Keyword("two-sided-long-edge".to_owned()),
    ));
    group.add(IppAttribute::new(
        IppAttribute::COPIES_SUPPORTED,
        IppValue::RangeOfInteger { min: 1, max: 9999 },
    ));
    group.add(IppAttribute::new(IppAttribute::NUMBER_UP_DEFAULT, IppValue::Integer(1)));
    group.add(IppAttribute::with_values(
        IppAttribute::NUMBER_UP_SUPPORTED,
        [1, 2, 4, 6, 9, 16].map(IppValue::Integer),
    ));
    group.add(IppAttribute::with_values(
        IppAttribute::ORIENTATION_REQUESTED_SUPPORTED,
        [
            Orientation::Portrait,
            Orientation::Landscape,
            Orientation::ReverseLandscape,
            Orientation::ReversePortrait,
        ]
        .map(|o| IppValue::Enum(o as i32)),
    ));
    group.add(IppAttribute::new(IppAttribute::PAGE_RANGES_SUPPORTED, IppValue::Boolean(true)));

    response.attributes_mut().groups_mut().push(group);
}

/// One IPP operation: the operation code with its registry entry and the request it carries
#[derive(Clone, Debug)]
pub struct IppOperation {
    spec: &'static OperationSpec,
    request: IppRequestResponse,
    job_state: Option<JobState>,
    job_state_reasons: Option<JobStateReasons>,
    printers: Vec<Uri>,
}

impl IppOperation {
    fn from_spec(spec: &'static OperationSpec) -> IppOperation {
        let mut request = IppRequestResponse::new(IppVersion::v2_0(), spec.operation, None);
        (spec.template)(&mut request);
        IppOperation {
            spec,
            request,
            job_state: None,
            job_state_reasons: None,
            printers: Vec::new(),
        }
    }

    /// Create an operation with its request template
    pub fn new(operation: Operation) -> Result<IppOperation, IppError> {
        lookup(operation as u16)
            .map(IppOperation::from_spec)
            .ok_or_else(|| IppError::ValidationError(format!("{operation} is not supported")))
    }

    pub fn print_job() -> IppOperation {
        IppOperation::from_spec(&PRINT_JOB)
    }

    pub fn create_job() -> IppOperation {
        IppOperation::from_spec(&CREATE_JOB)
    }

    pub fn send_document() -> IppOperation {
        IppOperation::from_spec(&SEND_DOCUMENT)
    }

    pub fn cancel_job() -> IppOperation {
        IppOperation::from_spec(&CANCEL_JOB)
    }

    pub fn get_jobs() -> IppOperation {
        IppOperation::from_spec(&GET_JOBS)
    }

    pub fn get_printer_attributes() -> IppOperation {
        IppOperation::from_spec(&GET_PRINTER_ATTRIBUTES)
    }

    pub fn get_printers() -> IppOperation {
        IppOperation::from_spec(&GET_PRINTERS)
    }

    pub fn get_default() -> IppOperation {
        IppOperation::from_spec(&GET_DEFAULT)
    }

    /// Check whether an operation code has a registry entry
    pub fn is_supported(code: u16) -> bool {
        lookup(code).is_some()
    }

    /// Wrap a decoded request, classified by the operation code in its header
    pub fn from_request(request: IppRequestResponse) -> Result<IppOperation, IppError> {
        let code = request.header().operation_or_status;
        let spec = lookup(code).ok_or_else(|| {
            IppError::ValidationError(format!("unsupported operation {code:#06x} in {}", request.to_short_string()))
        })?;
        debug!("Classified {} as {}", request.to_short_string(), spec.operation);
        Ok(IppOperation {
            spec,
            request,
            job_state: None,
            job_state_reasons: None,
            printers: Vec::new(),
        })
    }

    pub fn operation(&self) -> Operation {
        self.spec.operation
    }

    pub fn target(&self) -> OperationTarget {
        self.spec.target
    }

    pub fn request(&self) -> &IppRequestResponse {
        &self.request
    }

    pub fn request_mut(&mut self) -> &mut IppRequestResponse {
        &mut self.request
    }

    pub fn into_request(self) -> IppRequestResponse {
        self.request
    }

    /// Accept only requests carrying this operation's code
    pub fn validate_request(&self, request: &IppRequestResponse) -> Result<(), IppError> {
        if request.header().operation_or_status != self.spec.operation as u16 {
            return Err(IppError::ValidationError(format!(
                "not a {} request: {}",
                self.spec.operation,
                request.to_short_string()
            )));
        }
        Ok(())
    }

    /// Decode `bytes` and validate the result
    pub fn validate_bytes<B>(&self, bytes: B) -> Result<(), IppError>
    where
        B: Into<Bytes>,
    {
        let request = IppRequestResponse::from_bytes(bytes)?;
        self.validate_request(&request)
    }

    /// Check that `request` carries the target attributes this operation addresses
    pub fn validate_target(&self, request: &IppRequestResponse) -> Result<(), IppError> {
        let has_target = match self.spec.target {
            OperationTarget::None => true,
            OperationTarget::Printer => request.has_attribute(IppAttribute::PRINTER_URI),
            OperationTarget::Job => {
                (request.has_attribute(IppAttribute::PRINTER_URI) && request.has_attribute(IppAttribute::JOB_ID))
                    || request.has_attribute(IppAttribute::JOB_URI)
            }
        };
        if has_target {
            Ok(())
        } else {
            Err(IppError::ValidationError(match self.spec.target {
                OperationTarget::Job => format!(
                    "neither 'printer-uri' & 'job-id' nor 'job-uri' is given in {}",
                    request.to_short_string()
                ),
                _ => format!("no 'printer-uri' given in {}", request.to_short_string()),
            }))
        }
    }

    /// Validate the carried request: operation code and target attributes
    pub fn validate(&self) -> Result<(), IppError> {
        self.validate_request(&self.request)?;
        self.validate_target(&self.request)
    }

    pub fn set_request_id(&mut self, request_id: i32) {
        self.request.set_request_id(request_id);
    }

    pub fn set_printer_uri(&mut self, uri: &Uri) {
        self.request.set_printer_uri(uri);
    }

    pub fn set_job_id(&mut self, job_id: i32) {
        self.request.set_job_id(job_id);
    }

    pub fn job_id(&self) -> Option<i32> {
        self.request.job_id().ok()
    }

    pub fn set_job_name<S>(&mut self, name: S)
    where
        S: AsRef<str>,
    {
        self.request.set_operation_attribute(IppAttribute::new(
            IppAttribute::JOB_NAME,
            IppValue::NameWithoutLanguage(name.as_ref().to_owned()),
        ));
    }

    pub fn set_document_name<S>(&mut self, name: S)
    where
        S: AsRef<str>,
    {
        self.request.set_operation_attribute(IppAttribute::new(
            IppAttribute::DOCUMENT_NAME,
            IppValue::NameWithoutLanguage(name.as_ref().to_owned()),
        ));
    }

    pub fn set_requesting_user_name<S>(&mut self, name: S)
    where
        S: AsRef<str>,
    {
        self.request.set_operation_attribute(IppAttribute::new(
            IppAttribute::REQUESTING_USER_NAME,
            IppValue::NameWithoutLanguage(name.as_ref().to_owned()),
        ));
    }

    pub fn set_last_document(&mut self, last: bool) {
        self.request
            .set_operation_attribute(IppAttribute::new(IppAttribute::LAST_DOCUMENT, IppValue::Boolean(last)));
    }

    /// Replace the requested-attributes keyword list
    pub fn set_requested_attributes<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names.into_iter().map(|s| s.as_ref().to_owned()).collect::<Vec<_>>();
        self.request.set_operation_attribute(IppAttribute::of(
            ValueTag::Keyword,
            IppAttribute::REQUESTED_ATTRIBUTES,
            names,
        ));
    }

    /// Document data sent after the attributes
    pub fn set_data<B>(&mut self, data: B)
    where
        B: Into<Bytes>,
    {
        self.request.set_payload(data);
    }

    /// Add a job attribute to the request
    pub fn add_job_attribute(&mut self, attribute: IppAttribute) {
        self.request.set_job_attribute(attribute);
    }

    /// job-state reported by the synthesized response
    pub fn set_job_state(&mut self, state: JobState) {
        self.job_state = Some(state);
    }

    /// job-state-reasons reported by the synthesized response
    pub fn set_job_state_reasons(&mut self, reasons: JobStateReasons) {
        self.job_state_reasons = Some(reasons);
    }

    /// Printer advertised by the synthesized Get-Printers and Get-Default responses
    pub fn add_printer(&mut self, printer_uri: Uri) {
        self.printers.push(printer_uri);
    }

    pub fn printers(&self) -> &[Uri] {
        &self.printers
    }

    fn target_uri(&self) -> Uri {
        self.request
            .printer_uri()
            .unwrap_or_else(|_| Uri::from_static("ipp://localhost:631/printers"))
    }

    /// Synthesize the response a spooler would give to the carried request
    pub fn response(&self) -> IppRequestResponse {
        let mut response = IppRequestResponse::response_for(&self.request);

        if let Some(job_id) = self.job_id() {
            response.set_job_attribute(IppAttribute::new(IppAttribute::JOB_ID, IppValue::Integer(job_id)));
            match util::job_uri(&self.target_uri(), job_id) {
                Ok(uri) => response.set_job_uri(&uri),
                Err(e) => warn!("Cannot build job-uri for job {job_id}: {e}"),
            }
        }
        if let Some(state) = self.job_state {
            response.set_job_state(state);
        }
        if let Some(reasons) = self.job_state_reasons {
            response.set_job_state_reasons(reasons);
        }

        (self.spec.respond)(self, &mut response);
        response
    }
}

impl fmt::Display for IppOperation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.spec.operation, self.request.to_short_string())
    }
}

impl From<IppOperation> for IppRequestResponse {
    fn from(op: IppOperation) -> Self {
        op.into_request()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StatusCode;

    fn all_operations() -> Vec<IppOperation> {
        vec![
            IppOperation::print_job(),
            IppOperation::create_job(),
            IppOperation::send_document(),
            IppOperation::cancel_job(),
            IppOperation::get_jobs(),
            IppOperation::get_printer_attributes(),
            IppOperation::get_printers(),
            IppOperation::get_default(),
        ]
    }

    #[test]
    fn test_validate_request_matches_own_code_only() {
        let operations = all_operations();
        for op in &operations {
            for other in &operations {
                let result = op.validate_request(other.request());
                if op.operation() == other.operation() {
                    assert!(result.is_ok(), "{op} rejects its own request");
                } else {
                    assert!(
                        matches!(result, Err(IppError::ValidationError(_))),
                        "{op} accepts {other}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_validate_bytes() {
        let op = IppOperation::get_jobs();
        assert!(op.validate_bytes(op.request().to_bytes().unwrap()).is_ok());
        assert!(matches!(
            op.validate_bytes(IppOperation::cancel_job().request().to_bytes().unwrap()),
            Err(IppError::ValidationError(_))
        ));
        assert!(matches!(
            op.validate_bytes(vec![2u8, 0, 0]),
            Err(IppError::ParseError(_))
        ));
    }

    #[test]
    fn test_new_rejects_unregistered() {
        assert_eq!(IppOperation::new(Operation::CreateJob).unwrap().operation(), Operation::CreateJob);
        assert!(matches!(
            IppOperation::new(Operation::ReleaseJob),
            Err(IppError::ValidationError(_))
        ));
        assert!(IppOperation::is_supported(0x4001));
        assert!(!IppOperation::is_supported(0x000D));
    }

    #[test]
    fn test_template_base_attributes() {
        for op in all_operations() {
            let request = op.request();
            let names = request.attributes().groups()[0]
                .attributes()
                .iter()
                .map(|a| a.name())
                .take(2)
                .collect::<Vec<_>>();
            assert_eq!(names, vec!["attributes-charset", "attributes-natural-language"]);
            assert!(request.has_attribute(IppAttribute::REQUESTING_USER_NAME));
            assert_eq!(request.header().version, IppVersion::v2_0());
        }
    }

    #[test]
    fn test_print_job_template() {
        let op = IppOperation::print_job();
        let request = op.request();
        assert_eq!(request.attribute("copies").unwrap().int_value().unwrap(), 1);
        assert_eq!(request.attribute("orientation-requested").unwrap().int_value().unwrap(), 3);
        assert_eq!(request.attribute("output-mode").unwrap().string_value(), "monochrome");
        assert!(!request.has_attribute(IppAttribute::LAST_DOCUMENT));
    }

    #[test]
    fn test_send_document_template() {
        let op = IppOperation::send_document();
        assert!(op.request().attribute("last-document").unwrap().bool_value().unwrap());
        assert!(op.request().has_attribute("copies"));
    }

    #[test]
    fn test_get_jobs_template() {
        let op = IppOperation::get_jobs();
        let attr = op.request().attribute(IppAttribute::REQUESTED_ATTRIBUTES).unwrap();
        assert_eq!(attr.tag(), ValueTag::Keyword);
        assert_eq!(attr.string_value(), "job-id");
        assert_eq!(attr.additional_values().len(), GET_JOBS_ATTRIBUTES.len() - 1);
    }

    #[test]
    fn test_get_printer_attributes_template() {
        let op = IppOperation::get_printer_attributes();
        let attr = op.request().attribute(IppAttribute::REQUESTED_ATTRIBUTES).unwrap();
        assert_eq!(attr.ipp_values().unwrap().len(), PRINTER_DESCRIPTION_ATTRIBUTES.len());
    }

    #[test]
    fn test_validate_target() {
        let uri: Uri = "ipp://localhost/printers/p".parse().unwrap();

        let mut op = IppOperation::send_document();
        assert!(op.validate().is_err());
        op.set_printer_uri(&uri);
        assert!(op.validate().is_err());
        op.set_job_id(3);
        assert!(op.validate().is_ok());

        let mut op = IppOperation::send_document();
        op.request_mut()
            .set_operation_attribute(IppAttribute::new(IppAttribute::JOB_URI, IppValue::Uri("ipp://localhost/jobs/3".into())));
        assert!(op.validate().is_ok());

        let mut op = IppOperation::print_job();
        assert!(op.validate_target(op.request()).is_err());
        op.set_printer_uri(&uri);
        assert!(op.validate_target(op.request()).is_ok());

        assert!(IppOperation::get_printers().validate().is_ok());
    }

    #[test]
    fn test_from_request() {
        let request = IppOperation::create_job().into_request();
        let op = IppOperation::from_request(request).unwrap();
        assert_eq!(op.operation(), Operation::CreateJob);

        let request = IppRequestResponse::new(IppVersion::v1_1(), Operation::HoldJob, None);
        assert!(matches!(
            IppOperation::from_request(request),
            Err(IppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_print_job_response() {
        let mut op = IppOperation::print_job();
        op.set_printer_uri(&"ipp://printhost:8631/printers/p".parse().unwrap());
        op.set_request_id(9);
        op.set_job_id(42);
        op.set_job_state_reasons(JobStateReasons::None);

        let response = op.response();
        assert_eq!(response.header().status_code(), StatusCode::SuccessfulOk);
        assert_eq!(response.request_id(), 9);
        assert_eq!(response.job_id().unwrap(), 42);
        assert_eq!(response.job_state().unwrap(), JobState::Completed);
        assert_eq!(response.job_state_reasons().unwrap(), JobStateReasons::None);
        assert_eq!(response.job_uri().unwrap().to_string(), "ipp://printhost:8631/jobs/42");
    }

    #[test]
    fn test_create_job_response_state() {
        let mut op = IppOperation::create_job();
        op.set_job_id(1);
        op.set_job_state(JobState::PendingHeld);
        op.set_job_state_reasons(JobStateReasons::JobIncoming);

        let response = op.response();
        assert_eq!(response.job_state().unwrap(), JobState::PendingHeld);
        assert_eq!(response.job_state_reasons().unwrap(), JobStateReasons::JobIncoming);
        assert_eq!(response.job_uri().unwrap().to_string(), "ipp://localhost:631/jobs/1");
    }

    #[test]
    fn test_printer_attributes_response() {
        let mut op = IppOperation::get_printer_attributes();
        op.set_printer_uri(&"ipp://localhost:631/printers/office".parse().unwrap());

        let response = op.response();
        let group = response
            .attributes()
            .groups_of(DelimiterTag::PrinterAttributes)
            .next()
            .unwrap();
        assert_eq!(group.get(IppAttribute::PRINTER_NAME).unwrap().string_value(), "office");
        assert_eq!(
            group.get(IppAttribute::COPIES_SUPPORTED).unwrap().ipp_value().unwrap(),
            IppValue::RangeOfInteger { min: 1, max: 9999 }
        );
        assert_eq!(
            group
                .get(IppAttribute::ORIENTATION_REQUESTED_SUPPORTED)
                .unwrap()
                .ipp_values()
                .unwrap()
                .len(),
            4
        );
        assert!(!response.has_attribute(IppAttribute::JOB_ID));

        let decoded = IppRequestResponse::from_bytes(response.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, response);
    }
}
