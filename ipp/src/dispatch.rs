//!
//! Request dispatcher: forwards operations to an upstream IPP server or answers them locally
//!
use std::{
    fs,
    path::Path,
    sync::atomic::{AtomicI32, Ordering},
    time::Duration,
};

use http::Uri;
use log::{debug, info, warn};

use crate::{
    client::HttpTransport,
    config::{ForwardTarget, ProxyConfig, DEFAULT_TIMEOUT},
    error::IppError,
    model::{JobState, JobStateReasons, Operation, StatusCode},
    operation::{builder::IppOperationBuilder, IppOperation, OperationTarget},
    request::IppRequestResponse,
    util,
};

/// Sends an encoded request to an upstream server and returns the decoded response
pub trait IppTransport: Send + Sync {
    fn send(&self, uri: &Uri, request: &IppRequestResponse) -> Result<IppRequestResponse, IppError>;
}

/// Builder to create a dispatcher
pub struct IppDispatcherBuilder {
    target: ForwardTarget,
    request_timeout: Duration,
    record: bool,
    printer_name: String,
    transport: Option<Box<dyn IppTransport>>,
}

impl IppDispatcherBuilder {
    fn new(target: ForwardTarget) -> Self {
        IppDispatcherBuilder {
            target,
            request_timeout: DEFAULT_TIMEOUT,
            record: false,
            printer_name: ProxyConfig::default().printer_name,
            transport: None,
        }
    }

    /// Set upstream request timeout. Default is 30 seconds.
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = duration;
        self
    }

    /// Record requests and responses into the local target directory
    pub fn record(mut self, flag: bool) -> Self {
        self.record = flag;
        self
    }

    /// Name of the printer advertised by CUPS-Get-Default and CUPS-Get-Printers
    pub fn printer_name<S>(mut self, name: S) -> Self
    where
        S: AsRef<str>,
    {
        self.printer_name = name.as_ref().to_owned();
        self
    }

    /// Replace the HTTP transport used for upstream targets
    pub fn transport<T>(mut self, transport: T) -> Self
    where
        T: IppTransport + 'static,
    {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Build the dispatcher
    pub fn build(self) -> IppDispatcher {
        let transport = self
            .transport
            .unwrap_or_else(|| Box::new(HttpTransport::new(self.request_timeout)));
        IppDispatcher {
            target: self.target,
            transport,
            request_id: AtomicI32::new(1),
            job_id: AtomicI32::new(0),
            record: self.record,
            printer_name: self.printer_name,
        }
    }
}

/// Dispatcher of IPP operations.
///
/// Every outgoing request is stamped with a fresh request id. With a local target job ids are allocated
/// from a counter starting at 1 and responses are synthesized, otherwise requests are forwarded upstream.
pub struct IppDispatcher {
    target: ForwardTarget,
    transport: Box<dyn IppTransport>,
    request_id: AtomicI32,
    job_id: AtomicI32,
    record: bool,
    printer_name: String,
}

impl IppDispatcher {
    /// Create dispatcher with default options
    pub fn new(target: ForwardTarget) -> Self {
        IppDispatcher::builder(target).build()
    }

    /// Create dispatcher builder for setting extra options
    pub fn builder(target: ForwardTarget) -> IppDispatcherBuilder {
        IppDispatcherBuilder::new(target)
    }

    /// Create dispatcher from proxy settings
    pub fn from_config(config: &ProxyConfig) -> Self {
        IppDispatcher::builder(config.target.clone())
            .request_timeout(config.timeout)
            .record(config.record)
            .printer_name(&config.printer_name)
            .build()
    }

    pub fn target(&self) -> &ForwardTarget {
        &self.target
    }

    fn next_request_id(&self) -> i32 {
        self.request_id.fetch_add(1, Ordering::SeqCst)
    }

    fn next_job_id(&self) -> i32 {
        self.job_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn record(&self, message: &IppRequestResponse, kind: &str) {
        if !self.record {
            return;
        }
        if let ForwardTarget::Local(dir) = &self.target {
            if let Err(e) = message.record_to(dir, kind) {
                warn!("Cannot record {kind} {}: {e}", message.to_short_string());
            }
        }
    }

    fn advertised_printer(&self, request: &IppRequestResponse) -> Result<Uri, IppError> {
        let authority = request
            .printer_uri()
            .ok()
            .and_then(|uri| uri.authority().map(|a| a.to_string()))
            .unwrap_or_else(|| "localhost:631".to_owned());
        Ok(format!("ipp://{authority}/printers/{}", self.printer_name).parse()?)
    }

    fn forward(&self, upstream: &Uri, request: &IppRequestResponse) -> IppRequestResponse {
        let destination = match request.printer_uri() {
            Ok(printer_uri) => util::with_default_port(&printer_uri, self.target.port()),
            Err(_) => upstream.clone(),
        };
        debug!("Forwarding {} to {destination}", request.to_short_string());

        match self.transport.send(&destination, request) {
            Ok(response) => response,
            Err(e) => {
                warn!("Forwarding {} to {destination} failed: {e}", request.to_short_string());
                IppRequestResponse::error_for(request, StatusCode::ServerErrorInternalError, e.to_string())
            }
        }
    }

    fn emulate(&self, op: &mut IppOperation) -> IppRequestResponse {
        match op.operation() {
            Operation::PrintJob | Operation::SendDocument => {
                op.set_job_id(self.next_job_id());
                op.set_job_state_reasons(JobStateReasons::None);
            }
            Operation::CreateJob => {
                op.set_job_id(self.next_job_id());
                op.set_job_state(JobState::PendingHeld);
                op.set_job_state_reasons(JobStateReasons::JobIncoming);
            }
            Operation::CupsGetDefault | Operation::CupsGetPrinters if op.printers().is_empty() => {
                match self.advertised_printer(op.request()) {
                    Ok(uri) => op.add_printer(uri),
                    Err(e) => warn!("Cannot advertise printer {}: {e}", self.printer_name),
                }
            }
            _ => {}
        }

        if let Err(e) = op.validate_request(op.request()) {
            return IppRequestResponse::error_for(op.request(), StatusCode::ClientErrorBadRequest, e.to_string());
        }
        let response = op.response();
        info!("Emulated {op} -> {response}");
        response
    }

    /// Stamp the operation with the next request id and send it to the target
    pub fn send(&self, mut op: IppOperation) -> IppRequestResponse {
        op.set_request_id(self.next_request_id());
        self.record(op.request(), "request");

        let response = match &self.target {
            ForwardTarget::Local(_) => self.emulate(&mut op),
            ForwardTarget::Upstream(upstream) => self.forward(upstream, op.request()),
        };

        self.record(&response, "response");
        response
    }

    /// Answer an inbound request. The response carries the caller's request id.
    pub fn handle(&self, request: IppRequestResponse) -> IppRequestResponse {
        let request_id = request.request_id();
        let code = request.header().operation_or_status;

        let mut response = if !IppOperation::is_supported(code) {
            match &self.target {
                ForwardTarget::Upstream(upstream) => {
                    let mut request = request;
                    request.set_request_id(self.next_request_id());
                    self.forward(upstream, &request)
                }
                ForwardTarget::Local(_) => {
                    debug!("Operation {code:#06x} is not supported: {}", request.to_short_string());
                    IppRequestResponse::error_for(
                        &request,
                        StatusCode::ServerErrorOperationNotSupported,
                        format!("operation {code:#06x} is not supported"),
                    )
                }
            }
        } else {
            let version = request.header().version;
            match IppOperation::from_request(request) {
                Ok(mut op) => match op.operation() {
                    Operation::CupsGetDefault | Operation::CupsGetPrinters => self.emulate(&mut op),
                    _ if op.target() == OperationTarget::Job => match op.validate_target(op.request()) {
                        Ok(()) => self.send(op),
                        Err(e) => {
                            IppRequestResponse::error_for(op.request(), StatusCode::ClientErrorBadRequest, e.to_string())
                        }
                    },
                    _ => self.send(op),
                },
                Err(e) => {
                    let mut response =
                        IppRequestResponse::new_response(version, StatusCode::ClientErrorBadRequest, request_id);
                    response.set_status_message(e.to_string());
                    response
                }
            }
        };

        response.set_request_id(request_id);
        response
    }

    fn checked(response: IppRequestResponse) -> Result<IppRequestResponse, IppError> {
        let status = response.header().status_code();
        if status.is_success() {
            Ok(response)
        } else {
            Err(IppError::StatusError(status))
        }
    }

    fn document_name(path: &Path) -> String {
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    }

    /// Print a file as a single job
    pub fn print_job<P>(&self, printer_uri: &Uri, path: P) -> Result<IppRequestResponse, IppError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let data = fs::read(path)?;
        let name = IppDispatcher::document_name(path);
        let op = IppOperationBuilder::print_job(printer_uri.clone(), data)
            .job_title(&name)
            .document_name(&name)
            .build();
        IppDispatcher::checked(self.send(op))
    }

    /// Create a job and return its id
    pub fn create_job(&self, printer_uri: &Uri) -> Result<i32, IppError> {
        let op = IppOperationBuilder::create_job(printer_uri.clone()).build();
        IppDispatcher::checked(self.send(op))?.job_id()
    }

    /// Add a file to a job created before
    pub fn send_document<P>(
        &self,
        printer_uri: &Uri,
        job_id: i32,
        path: P,
        last: bool,
    ) -> Result<IppRequestResponse, IppError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let data = fs::read(path)?;
        let op = IppOperationBuilder::send_document(printer_uri.clone(), job_id, data)
            .document_name(IppDispatcher::document_name(path))
            .last(last)
            .build();
        IppDispatcher::checked(self.send(op))
    }

    pub fn cancel_job(&self, printer_uri: &Uri, job_id: i32) -> Result<IppRequestResponse, IppError> {
        let op = IppOperationBuilder::cancel_job(printer_uri.clone(), job_id).build();
        IppDispatcher::checked(self.send(op))
    }

    pub fn get_jobs(&self, printer_uri: &Uri) -> Result<IppRequestResponse, IppError> {
        let op = IppOperationBuilder::get_jobs(printer_uri.clone()).build();
        IppDispatcher::checked(self.send(op))
    }

    pub fn get_printer_attributes(&self, printer_uri: &Uri) -> Result<IppRequestResponse, IppError> {
        let op = IppOperationBuilder::get_printer_attributes(printer_uri.clone()).build();
        IppDispatcher::checked(self.send(op))
    }
}
