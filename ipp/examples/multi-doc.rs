use std::{env, error::Error, process::exit};

use ipp_relay::prelude::*;

pub fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args: Vec<_> = env::args().collect();

    if args.len() < 4 {
        println!("Usage: {} target uri filename [filename...]", args[0]);
        exit(1);
    }

    let dispatcher = IppDispatcher::new(args[1].parse()?);
    let uri: Uri = args[2].parse()?;

    let job_id = dispatcher.create_job(&uri)?;
    println!("job id: {job_id}");

    for (i, item) in args.iter().enumerate().skip(3) {
        let last = i >= (args.len() - 1);
        println!("Sending {item}, last: {last}");

        let response = dispatcher.send_document(&uri, job_id, item, last)?;
        for group in response.attributes().groups_of(DelimiterTag::JobAttributes) {
            for attr in group.attributes() {
                println!("{attr}");
            }
        }
    }

    Ok(())
}
