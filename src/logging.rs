//! Diagnostic logging
//!
//! Operational tracing goes to stderr so stdout stays clean for the shell.
//! This is separate from the transaction log, which is ledger data.

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the process
///
/// `RUST_LOG` wins when set. Otherwise `verbosity` selects the level:
/// 0 = warn, 1 = debug, 2+ = trace. Later calls are no-ops.
pub fn init(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
