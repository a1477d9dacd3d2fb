use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::prelude::*;

/// Target of the buffer hex dumps written by the mailbox.
const WIRE_TARGET: &str = "vcmbox::wire";

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Filter for `level`, raised to debug for buffer dumps when they are on.
fn filter(level: LogLevel, trace_buffers: bool) -> Targets {
    let filter = Targets::new().with_default(level.as_filter());
    if trace_buffers {
        filter.with_target(WIRE_TARGET, LevelFilter::DEBUG.max(level.as_filter()))
    } else {
        filter
    }
}

/// Install the stderr subscriber. Later calls are ignored.
pub fn init_logging(format: LogFormat, level: LogLevel, trace_buffers: bool) {
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(trace_buffers);
    let filter = filter(level, trace_buffers);

    let _ = match format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(layer.with_filter(filter))
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(layer.json().with_filter(filter))
            .try_init(),
    };
}

#[cfg(test)]
mod tests {
    use tracing::Level;

    use super::*;

    #[test]
    fn wire_dumps_follow_trace_buffers() {
        let off = filter(LogLevel::Info, false);
        assert!(!off.would_enable(WIRE_TARGET, &Level::DEBUG));

        let on = filter(LogLevel::Info, true);
        assert!(on.would_enable(WIRE_TARGET, &Level::DEBUG));
        assert!(!on.would_enable("vcmbox_mailbox::mailbox", &Level::DEBUG));
    }
}
