//! Configuration module for Teller
//!
//! - platform config directory resolution
//! - persisted user settings
//! - transaction log location

use std::path::PathBuf;

pub mod paths;
pub mod settings;

pub use paths::TellerPaths;
pub use settings::Settings;

/// Log file used when nothing else is configured, in the working directory
pub const DEFAULT_LOG_FILE: &str = "transactions.txt";

/// Pick the transaction log path
///
/// An explicit override (command-line flag or `TELLER_LOG_FILE`) wins over
/// the settings file, which wins over [`DEFAULT_LOG_FILE`].
pub fn resolve_log_path(explicit: Option<PathBuf>, settings: &Settings) -> PathBuf {
    explicit
        .or_else(|| settings.log_file.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
}
