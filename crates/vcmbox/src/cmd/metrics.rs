use std::io::Write;

use tracing::debug;
use vcmbox_export::write_metrics;

use crate::cmd::{Context, MetricsArgs};
use crate::exit::{export_error, CliResult, SUCCESS};

pub fn run(_args: MetricsArgs, ctx: &Context) -> CliResult<i32> {
    let mut client = ctx.open_client()?;
    debug!(device = %ctx.config.device_path.display(), "writing metrics");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = write_metrics(&mut client, &mut out);
    client.close();

    result.map_err(|err| {
        // Partial output stays on stdout so the last header shows the failed read.
        let _ = out.flush();
        export_error("metrics", err)
    })?;
    Ok(SUCCESS)
}
