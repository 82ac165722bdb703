//! Logging setup for the command-line tool.

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Initialize logging for the process.
///
/// `RUST_LOG` takes precedence. Otherwise only warnings are shown, or
/// everything down to debug with `verbose`. Logs go to stderr since stdout
/// carries the billing output. Subsequent calls are no-ops.
pub fn init(verbose: bool, format: LogFormat) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
