//!
//! CUPS-specific operations: CUPS-Get-Default and CUPS-Get-Printers
//!
use http::Uri;

use crate::{
    attribute::{IppAttribute, IppAttributeGroup},
    operation::{base_template, IppOperation},
    request::IppRequestResponse,
    tag::{DelimiterTag, ValueTag},
    value::IppValue,
};

const DEFAULT_PRINTERS_URI: &str = "http://localhost:631/printers";

/// Last non-empty path segment of a printer URI
pub fn printer_name(printer_uri: &Uri) -> String {
    printer_uri
        .path()
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or("default")
        .to_owned()
}

/// Printer attributes group as returned by CUPS-Get-Printers and CUPS-Get-Default
pub fn printer_group(printer_uri: &Uri) -> IppAttributeGroup {
    let name = printer_name(printer_uri);
    let mut group = IppAttributeGroup::new(DelimiterTag::PrinterAttributes);
    group.add(IppAttribute::new(
        IppAttribute::PRINTER_URI_SUPPORTED,
        IppValue::Uri(printer_uri.to_string()),
    ));
    group.add(IppAttribute::new(
        IppAttribute::PRINTER_NAME,
        IppValue::NameWithoutLanguage(name.clone()),
    ));
    group.add(IppAttribute::new(
        IppAttribute::PRINTER_LOCATION,
        IppValue::TextWithoutLanguage(format!("internal ({name})")),
    ));
    group.add(IppAttribute::new(
        IppAttribute::PRINTER_INFO,
        IppValue::TextWithoutLanguage("virtual printer".to_owned()),
    ));
    group
}

pub(crate) fn get_default_template(request: &mut IppRequestResponse) {
    base_template(request);
    request.set_operation_attribute(IppAttribute::of(
        ValueTag::Keyword,
        IppAttribute::REQUESTED_ATTRIBUTES,
        [
            IppAttribute::PRINTER_NAME,
            IppAttribute::PRINTER_URI_SUPPORTED,
            IppAttribute::PRINTER_LOCATION,
        ],
    ));
    request.set_printer_uri(&Uri::from_static(DEFAULT_PRINTERS_URI));
}

pub(crate) fn get_default_response(op: &IppOperation, response: &mut IppRequestResponse) {
    if let Some(printer_uri) = op.printers().first() {
        response.attributes_mut().groups_mut().push(printer_group(printer_uri));
    }
}

pub(crate) fn get_printers_response(op: &IppOperation, response: &mut IppRequestResponse) {
    for printer_uri in op.printers() {
        response.attributes_mut().groups_mut().push(printer_group(printer_uri));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printer_name() {
        assert_eq!(printer_name(&"ipp://localhost:631/printers/office".parse().unwrap()), "office");
        assert_eq!(printer_name(&"ipp://localhost:631/printers/office/".parse().unwrap()), "office");
        assert_eq!(printer_name(&"ipp://localhost:631".parse().unwrap()), "default");
    }

    #[test]
    fn test_get_default_template() {
        let op = IppOperation::get_default();
        let request = op.request();
        assert_eq!(request.printer_uri().unwrap().to_string(), DEFAULT_PRINTERS_URI);
        assert_eq!(
            request
                .attribute(IppAttribute::REQUESTED_ATTRIBUTES)
                .unwrap()
                .to_long_string(),
            "requested-attributes=printer-name,printer-uri-supported,printer-location"
        );
    }

    #[test]
    fn test_get_default_response() {
        let mut op = IppOperation::get_default();
        op.set_request_id(4);
        op.add_printer("ipp://localhost:631/printers/test-printer".parse().unwrap());

        let response = op.response();
        assert_eq!(response.request_id(), 4);
        let groups = response
            .attributes()
            .groups_of(DelimiterTag::PrinterAttributes)
            .collect::<Vec<_>>();
        assert_eq!(groups.len(), 1);
        assert_eq!(
            groups[0].get(IppAttribute::PRINTER_NAME).unwrap().string_value(),
            "test-printer"
        );
        assert_eq!(
            groups[0].get(IppAttribute::PRINTER_LOCATION).unwrap().string_value(),
            "internal (test-printer)"
        );
    }

    #[test]
    fn test_get_printers_response() {
        let mut op = IppOperation::get_printers();
        op.add_printer("ipp://localhost:631/printers/a".parse().unwrap());
        op.add_printer("ipp://localhost:631/printers/b".parse().unwrap());

        let response = op.response();
        let names = response
            .attributes()
            .groups_of(DelimiterTag::PrinterAttributes)
            .filter_map(|g| g.get(IppAttribute::PRINTER_NAME))
            .map(|a| a.string_value())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["a", "b"]);

        let decoded = IppRequestResponse::from_bytes(response.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded.attributes().groups_of(DelimiterTag::PrinterAttributes).count(), 2);
    }

    #[test]
    fn test_get_printers_without_printers() {
        let response = IppOperation::get_printers().response();
        assert_eq!(response.attributes().groups_of(DelimiterTag::PrinterAttributes).count(), 0);
    }
}
