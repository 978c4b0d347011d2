/// Writing rendered output and errors; logging setup.
use std::io::{self, Write};

use tracing_subscriber::EnvFilter;

use super::args::OutputFormat;
use crate::types::ErrorOutput;

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise only warnings are shown, or debug
/// output for this crate with `--verbose`.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "meshstat=debug" } else { "meshstat=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Write already-rendered text to stdout.
///
/// # Errors
///
/// Returns the I/O error if stdout cannot be written or flushed.
pub fn write_rendered(text: &str) -> io::Result<()> {
    write_to(&mut io::stdout().lock(), text)
}

fn write_to(out: &mut impl Write, text: &str) -> io::Result<()> {
    out.write_all(text.as_bytes())?;
    out.flush()
}

/// Write a structured error to stderr.
pub fn write_error(err: &ErrorOutput, format: OutputFormat) {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    match format {
        OutputFormat::Json => {
            let s = serde_json::to_string_pretty(err).unwrap_or_default();
            let _ = writeln!(out, "{s}");
        }
        OutputFormat::Table | OutputFormat::Wide => {
            let _ = writeln!(out, "Error: {}", err.error.message);
        }
    }
}
