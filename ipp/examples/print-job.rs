use std::{env, error::Error, fs, process::exit};

use ipp_relay::prelude::*;

pub fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args: Vec<_> = env::args().collect();

    if args.len() < 3 {
        println!("Usage: {} uri filename [key=value ...]", args[0]);
        exit(1);
    }

    let uri: Uri = args[1].parse()?;
    let data = fs::read(&args[2])?;

    let mut builder = IppOperationBuilder::print_job(uri.clone(), data).job_title(&args[2]);

    for arg in &args[3..] {
        if let Some((k, v)) = arg.split_once('=') {
            let value = v.parse::<IppValue>().unwrap_or_else(|e| match e {});
            builder = builder.attribute(IppAttribute::new(k, value));
        }
    }

    let response = IppClient::new(uri).send(builder.build())?;
    println!("{}", response.to_long_string());

    Ok(())
}
