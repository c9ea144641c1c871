use std::{env, error::Error, process::exit};

use ipp_relay::prelude::*;

pub fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args: Vec<_> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: {} uri", args[0]);
        exit(1);
    }

    let client = IppClient::new(args[1].parse()?);
    let response = client.send(IppOperationBuilder::cups().get_printers())?;

    for group in response.attributes().groups_of(DelimiterTag::PrinterAttributes) {
        let name = group
            .get(IppAttribute::PRINTER_NAME)
            .ok_or_else(|| IppError::AttributeNotFound(IppAttribute::PRINTER_NAME.to_owned()))?;
        let uri = group
            .get(IppAttribute::PRINTER_URI_SUPPORTED)
            .map(|a| a.string_value())
            .unwrap_or_default();
        println!("{}: {uri}", name.string_value());
    }

    Ok(())
}
