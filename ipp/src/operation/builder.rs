//!
//! Fluent builders for the supported operations
//!
use bytes::Bytes;
use http::Uri;

use crate::{attribute::IppAttribute, operation::IppOperation};

/// Builder to create IPP operations addressed to a printer
pub struct IppOperationBuilder;

impl IppOperationBuilder {
    /// Create Print-Job operation
    ///
    /// * `printer_uri` - printer URI<br/>
    /// * `data` - document data
    pub fn print_job<B>(printer_uri: Uri, data: B) -> PrintJobBuilder
    where
        B: Into<Bytes>,
    {
        let mut op = IppOperation::print_job();
        op.set_printer_uri(&printer_uri);
        op.set_data(data);
        PrintJobBuilder { op }
    }

    /// Create Create-Job operation
    ///
    /// * `printer_uri` - printer URI
    pub fn create_job(printer_uri: Uri) -> CreateJobBuilder {
        let mut op = IppOperation::create_job();
        op.set_printer_uri(&printer_uri);
        CreateJobBuilder { op }
    }

    /// Create Send-Document operation
    ///
    /// * `printer_uri` - printer URI<br/>
    /// * `job_id` - job id returned by Create-Job<br/>
    /// * `data` - document data
    pub fn send_document<B>(printer_uri: Uri, job_id: i32, data: B) -> SendDocumentBuilder
    where
        B: Into<Bytes>,
    {
        let mut op = IppOperation::send_document();
        op.set_printer_uri(&printer_uri);
        op.set_job_id(job_id);
        op.set_data(data);
        SendDocumentBuilder { op }
    }

    /// Create Cancel-Job operation
    ///
    /// * `printer_uri` - printer URI<br/>
    /// * `job_id` - job id to cancel
    pub fn cancel_job(printer_uri: Uri, job_id: i32) -> SimpleBuilder {
        let mut op = IppOperation::cancel_job();
        op.set_printer_uri(&printer_uri);
        op.set_job_id(job_id);
        SimpleBuilder { op }
    }

    /// Create Get-Jobs operation
    ///
    /// * `printer_uri` - printer URI
    pub fn get_jobs(printer_uri: Uri) -> SimpleBuilder {
        let mut op = IppOperation::get_jobs();
        op.set_printer_uri(&printer_uri);
        SimpleBuilder { op }
    }

    /// Create Get-Printer-Attributes operation
    ///
    /// * `printer_uri` - printer URI
    pub fn get_printer_attributes(printer_uri: Uri) -> GetPrinterAttributesBuilder {
        let mut op = IppOperation::get_printer_attributes();
        op.set_printer_uri(&printer_uri);
        GetPrinterAttributesBuilder {
            op,
            attributes: Vec::new(),
        }
    }

    /// Create CUPS-specific operations
    pub fn cups() -> CupsBuilder {
        CupsBuilder
    }
}

/// Builder to create Print-Job operation
pub struct PrintJobBuilder {
    op: IppOperation,
}

impl PrintJobBuilder {
    /// Specify requesting-user-name attribute
    pub fn user_name<S>(mut self, user_name: S) -> Self
    where
        S: AsRef<str>,
    {
        self.op.set_requesting_user_name(user_name);
        self
    }

    /// Specify job-name attribute
    pub fn job_title<S>(mut self, job_title: S) -> Self
    where
        S: AsRef<str>,
    {
        self.op.set_job_name(job_title);
        self
    }

    /// Specify document-name attribute
    pub fn document_name<S>(mut self, document_name: S) -> Self
    where
        S: AsRef<str>,
    {
        self.op.set_document_name(document_name);
        self
    }

    /// Specify custom job attribute
    pub fn attribute(mut self, attribute: IppAttribute) -> Self {
        self.op.add_job_attribute(attribute);
        self
    }

    /// Specify custom job attributes
    pub fn attributes<I>(self, attributes: I) -> Self
    where
        I: IntoIterator<Item = IppAttribute>,
    {
        attributes.into_iter().fold(self, |builder, attr| builder.attribute(attr))
    }

    /// Build operation
    pub fn build(self) -> IppOperation {
        self.op
    }
}

/// Builder to create Create-Job operation
pub struct CreateJobBuilder {
    op: IppOperation,
}

impl CreateJobBuilder {
    /// Specify requesting-user-name attribute
    pub fn user_name<S>(mut self, user_name: S) -> Self
    where
        S: AsRef<str>,
    {
        self.op.set_requesting_user_name(user_name);
        self
    }

    /// Specify job-name attribute
    pub fn job_title<S>(mut self, job_title: S) -> Self
    where
        S: AsRef<str>,
    {
        self.op.set_job_name(job_title);
        self
    }

    /// Specify custom job attribute
    pub fn attribute(mut self, attribute: IppAttribute) -> Self {
        self.op.add_job_attribute(attribute);
        self
    }

    /// Build operation
    pub fn build(self) -> IppOperation {
        self.op
    }
}

/// Builder to create Send-Document operation
pub struct SendDocumentBuilder {
    op: IppOperation,
}

impl SendDocumentBuilder {
    /// Specify requesting-user-name attribute
    pub fn user_name<S>(mut self, user_name: S) -> Self
    where
        S: AsRef<str>,
    {
        self.op.set_requesting_user_name(user_name);
        self
    }

    /// Specify document-name attribute
    pub fn document_name<S>(mut self, document_name: S) -> Self
    where
        S: AsRef<str>,
    {
        self.op.set_document_name(document_name);
        self
    }

    /// Whether this document is the last one of the job, true by default
    pub fn last(mut self, last: bool) -> Self {
        self.op.set_last_document(last);
        self
    }

    /// Build operation
    pub fn build(self) -> IppOperation {
        self.op
    }
}

/// Builder for operations taking no extra parameters besides the user name
pub struct SimpleBuilder {
    op: IppOperation,
}

impl SimpleBuilder {
    /// Specify requesting-user-name attribute
    pub fn user_name<S>(mut self, user_name: S) -> Self
    where
        S: AsRef<str>,
    {
        self.op.set_requesting_user_name(user_name);
        self
    }

    /// Build operation
    pub fn build(self) -> IppOperation {
        self.op
    }
}

/// Builder to create Get-Printer-Attributes operation
pub struct GetPrinterAttributesBuilder {
    op: IppOperation,
    attributes: Vec<String>,
}

impl GetPrinterAttributesBuilder {
    /// Specify which attribute to retrieve from the printer. Can be repeated.
    pub fn attribute<S>(mut self, attribute: S) -> Self
    where
        S: AsRef<str>,
    {
        self.attributes.push(attribute.as_ref().to_owned());
        self
    }

    /// Specify which attributes to retrieve from the printer
    pub fn attributes<S, I>(mut self, attributes: I) -> Self
    where
        S: AsRef<str>,
        I: IntoIterator<Item = S>,
    {
        self.attributes
            .extend(attributes.into_iter().map(|s| s.as_ref().to_owned()));
        self
    }

    /// Build operation. Without explicit attributes the full printer description is requested.
    pub fn build(mut self) -> IppOperation {
        if !self.attributes.is_empty() {
            self.op.set_requested_attributes(&self.attributes);
        }
        self.op
    }
}

/// CUPS operations builder
pub struct CupsBuilder;

impl CupsBuilder {
    /// CUPS-Get-Printers operation
    pub fn get_printers(&self) -> IppOperation {
        IppOperation::get_printers()
    }

    /// CUPS-Get-Default operation
    pub fn get_default(&self) -> IppOperation {
        IppOperation::get_default()
    }
}
