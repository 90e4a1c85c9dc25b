//! Logging setup
//!
//! Diagnostics go to stderr so stdout stays clean for command output
//! (tables, CSV, JSON). `RUST_LOG` wins when set; otherwise the level comes
//! from the number of `-v` flags.

use tracing_subscriber::EnvFilter;

/// Default directive for a given `-v` count
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
