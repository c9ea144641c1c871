//!
//! IPP print proxy and command-line utility
//!
use std::{
    fs,
    io::{self, Read},
    net::IpAddr,
    path::PathBuf,
    time::Duration,
};

use clap::Parser;
use log::debug;

use ipp_relay::{config::DEFAULT_TIMEOUT, prelude::*, server};

fn new_dispatcher(params: &IppParams, uri: &Uri) -> Result<IppDispatcher, IppError> {
    let target: ForwardTarget = match params.target {
        Some(ref target) => target.parse()?,
        None => uri.to_string().parse()?,
    };
    debug!("Forward target: {target}");

    Ok(IppDispatcher::builder(target)
        .request_timeout(Duration::from_secs(params.timeout))
        .build())
}

fn check_status(response: IppRequestResponse) -> Result<IppRequestResponse, IppError> {
    let status = response.header().status_code();
    if !status.is_success() {
        if let Some(message) = response.status_message() {
            eprintln!("{message}");
        }
        return Err(IppError::StatusError(status));
    }
    Ok(response)
}

fn print_group(response: &IppRequestResponse, tag: DelimiterTag) {
    for group in response.attributes().groups_of(tag) {
        let mut attributes = group.attributes().iter().collect::<Vec<_>>();
        attributes.sort_by_key(|a| a.name());
        for attr in attributes {
            println!("{}", attr.to_long_string());
        }
    }
}

fn do_serve(params: &IppParams, cmd: IppServeCmd) -> Result<(), IppError> {
    let mut config = ProxyConfig {
        bind: cmd.bind,
        port: cmd.port,
        printer_name: cmd.printer_name,
        timeout: Duration::from_secs(params.timeout),
        record: cmd.record,
        ..ProxyConfig::default()
    };
    if let Some(ref target) = params.target {
        config.target = target.parse()?;
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server::serve(config))
}

fn do_print(params: &IppParams, cmd: IppPrintCmd) -> Result<(), IppError> {
    let uri: Uri = cmd.uri.parse()?;
    let dispatcher = new_dispatcher(params, &uri)?;

    let data = match cmd.file {
        Some(ref filename) => fs::read(filename)?,
        None => {
            let mut data = Vec::new();
            io::stdin().read_to_end(&mut data)?;
            data
        }
    };

    let mut builder = IppOperationBuilder::print_job(uri, data);
    if let Some(jobname) = cmd.job_name {
        builder = builder.job_title(jobname);
    }
    if let Some(username) = cmd.user_name {
        builder = builder.user_name(username);
    }
    for arg in cmd.options {
        if let Some((k, v)) = arg.split_once('=') {
            let value = v.parse::<IppValue>().unwrap_or_else(|e| match e {});
            builder = builder.attribute(IppAttribute::new(k, value));
        }
    }

    let response = check_status(dispatcher.send(builder.build()))?;
    print_group(&response, DelimiterTag::JobAttributes);
    Ok(())
}

fn do_status(params: &IppParams, cmd: IppStatusCmd) -> Result<(), IppError> {
    let uri: Uri = cmd.uri.parse()?;
    let dispatcher = new_dispatcher(params, &uri)?;

    let operation = IppOperationBuilder::get_printer_attributes(uri)
        .attributes(&cmd.attributes)
        .build();

    let response = check_status(dispatcher.send(operation))?;
    print_group(&response, DelimiterTag::PrinterAttributes);
    Ok(())
}

fn do_jobs(params: &IppParams, cmd: IppJobsCmd) -> Result<(), IppError> {
    let uri: Uri = cmd.uri.parse()?;
    let dispatcher = new_dispatcher(params, &uri)?;

    let response = dispatcher.get_jobs(&uri)?;
    for group in response.attributes().groups_of(DelimiterTag::JobAttributes) {
        let line = group
            .attributes()
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        println!("{line}");
    }
    Ok(())
}

fn do_cancel(params: &IppParams, cmd: IppCancelCmd) -> Result<(), IppError> {
    let uri: Uri = cmd.uri.parse()?;
    let dispatcher = new_dispatcher(params, &uri)?;

    let response = dispatcher.cancel_job(&uri, cmd.job_id)?;
    println!("{}", response.header().status_code());
    Ok(())
}

#[derive(Parser)]
#[clap(about = "IPP print proxy and utility", name = "ipprelay", rename_all = "kebab-case")]
struct IppParams {
    #[clap(
        long = "timeout",
        short = 't',
        global = true,
        default_value_t = DEFAULT_TIMEOUT.as_secs(),
        help = "Upstream request timeout in seconds"
    )]
    timeout: u64,

    #[clap(
        long = "target",
        short = 'T',
        global = true,
        help = "Forward target: file:<dir> to answer locally or an upstream URI [default: the printer URI]"
    )]
    target: Option<String>,

    #[clap(subcommand)]
    command: IppCommand,
}

#[derive(Parser)]
enum IppCommand {
    #[clap(name = "serve", about = "Run the print proxy")]
    Serve(IppServeCmd),
    #[clap(name = "print", about = "Print file to an IPP printer")]
    Print(IppPrintCmd),
    #[clap(name = "status", about = "Get status of an IPP printer")]
    Status(IppStatusCmd),
    #[clap(name = "jobs", about = "List jobs of an IPP printer")]
    Jobs(IppJobsCmd),
    #[clap(name = "cancel", about = "Cancel a job")]
    Cancel(IppCancelCmd),
}

#[derive(Parser, Clone)]
#[clap(rename_all = "kebab-case")]
struct IppServeCmd {
    #[clap(long = "bind", short = 'b', default_value = "0.0.0.0", help = "Address to listen on")]
    bind: IpAddr,

    #[clap(long = "port", short = 'p', default_value_t = 631, help = "Port to listen on")]
    port: u16,

    #[clap(
        long = "printer-name",
        default_value = "test-printer",
        help = "Printer name advertised by CUPS-Get-Default and CUPS-Get-Printers"
    )]
    printer_name: String,

    #[clap(long = "record", short = 'r', help = "Record requests and responses into the local target directory")]
    record: bool,
}

#[derive(Parser, Clone)]
#[clap(rename_all = "kebab-case")]
struct IppPrintCmd {
    #[clap(help = "Printer URI")]
    uri: String,

    #[clap(
        long = "file",
        short = 'f',
        help = "Input file name to print [default: standard input]"
    )]
    file: Option<PathBuf>,

    #[clap(long = "job-name", short = 'j', help = "Job name to send as job-name attribute")]
    job_name: Option<String>,

    #[clap(
        long = "user-name",
        short = 'u',
        help = "User name to send as requesting-user-name attribute"
    )]
    user_name: Option<String>,

    #[clap(long = "option", short = 'o', help = "Extra IPP job attributes in key=value format")]
    options: Vec<String>,
}

#[derive(Parser, Clone)]
#[clap(rename_all = "kebab-case")]
struct IppStatusCmd {
    #[clap(help = "Printer URI")]
    uri: String,

    #[clap(long = "attribute", short = 'a', help = "Attributes to query, default is the printer description")]
    attributes: Vec<String>,
}

#[derive(Parser, Clone)]
#[clap(rename_all = "kebab-case")]
struct IppJobsCmd {
    #[clap(help = "Printer URI")]
    uri: String,
}

#[derive(Parser, Clone)]
#[clap(rename_all = "kebab-case")]
struct IppCancelCmd {
    #[clap(help = "Printer URI")]
    uri: String,

    #[clap(help = "Job id")]
    job_id: i32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let params = IppParams::parse();

    match params.command {
        IppCommand::Serve(ref cmd) => do_serve(&params, cmd.clone())?,
        IppCommand::Print(ref cmd) => do_print(&params, cmd.clone())?,
        IppCommand::Status(ref cmd) => do_status(&params, cmd.clone())?,
        IppCommand::Jobs(ref cmd) => do_jobs(&params, cmd.clone())?,
        IppCommand::Cancel(ref cmd) => do_cancel(&params, cmd.clone())?,
    }
    Ok(())
}
