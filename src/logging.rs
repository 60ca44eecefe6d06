//! Sets up the `tracing` subscriber for the binaries.

use std::{fs::OpenOptions, io, path::Path, sync::Arc};

use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

/// The file that debug logs are appended to.
pub const LOG_FILE_PATH: &str = "debug.log";

/// Log to stderr and to the file at `log_path`.
///
/// Stderr keeps stdout free for command output. It shows `INFO` and above,
/// or `DEBUG` and above if `verbose` is set. The `RUST_LOG` environment
/// variable overrides the stderr level.
/// The log file always receives `DEBUG` and above.
///
/// # Errors
/// Returns an error if the log file cannot be opened or a global subscriber
/// has already been set.
pub fn setup_logging(verbose: bool, log_path: &Path) -> io::Result<()> {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let console_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();
    let console_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(io::stderr)
        .with_filter(console_filter);

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_ansi(false)
        .with_writer(Arc::new(log_file))
        .with_filter(LevelFilter::DEBUG);

    tracing_subscriber::registry()
        .with(console_log)
        .with(debug_log)
        .try_init()
        .map_err(io::Error::other)
}
