mod cmd;
mod exit;
mod logging;
mod output;

use std::path::PathBuf;

use clap::Parser;
use vcmbox_mailbox::MailboxConfig;
use vcmbox_transport::DEFAULT_DEVICE_PATH;

use crate::cmd::{Command, Context};
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "vcmbox",
    version,
    about = "Raspberry Pi VideoCore mailbox telemetry"
)]
struct Cli {
    /// Mailbox character device.
    #[arg(
        long,
        value_name = "PATH",
        env = "VCMBOX_DEVICE",
        default_value = DEFAULT_DEVICE_PATH,
        global = true
    )]
    device: PathBuf,

    /// Log a hex dump of every mailbox buffer (stderr).
    #[arg(long, global = true)]
    trace_buffers: bool,

    /// Accept selector responses that echo a different id.
    #[arg(long, global = true)]
    lenient_selectors: bool,

    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        env = "VCMBOX_LOG_LEVEL",
        default_value = "info",
        global = true
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn context(&self) -> Context {
        Context {
            config: MailboxConfig {
                device_path: self.device.clone(),
                trace_buffers: self.trace_buffers,
                verify_selector: !self.lenient_selectors,
            },
            format: self.format.unwrap_or_else(OutputFormat::default_for_stdout),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level, cli.trace_buffers);

    let ctx = cli.context();
    let result = cmd::run(cli.command, &ctx);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}
