use std::net::SocketAddr;

use clap::{Args, Subcommand};
use vcmbox_mailbox::{MailboxConfig, PropertyClient};

use crate::exit::{mailbox_error, CliResult};
use crate::output::OutputFormat;

pub mod doctor;
pub mod metrics;
pub mod props;
pub mod serve;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print every metric in Prometheus text format.
    Metrics(MetricsArgs),
    /// Serve metrics over HTTP.
    Serve(ServeArgs),
    /// Print board properties.
    Props(PropsArgs),
    /// Run local device health checks.
    Doctor(DoctorArgs),
    /// Show version information.
    Version(VersionArgs),
}

/// Settings shared by every subcommand.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: MailboxConfig,
    pub format: OutputFormat,
}

impl Context {
    /// Open a property client on the configured device.
    pub fn open_client(&self) -> CliResult<PropertyClient> {
        PropertyClient::open(self.config.clone()).map_err(|err| {
            mailbox_error(
                &format!("open {}", self.config.device_path.display()),
                err,
            )
        })
    }
}

pub fn run(command: Command, ctx: &Context) -> CliResult<i32> {
    match command {
        Command::Metrics(args) => metrics::run(args, ctx),
        Command::Serve(args) => serve::run(args, ctx),
        Command::Props(args) => props::run(args, ctx),
        Command::Doctor(args) => doctor::run(args, ctx),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug, Default)]
pub struct MetricsArgs {}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:9110", env = "VCMBOX_ADDR")]
    pub addr: SocketAddr,
}

#[derive(Args, Debug, Default)]
pub struct PropsArgs {}

#[derive(Args, Debug, Default)]
pub struct DoctorArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
