//! Path management for Teller
//!
//! ## Path Resolution Order
//!
//! 1. `TELLER_CONFIG_DIR` environment variable (if set)
//! 2. The platform config directory (`$XDG_CONFIG_HOME` or `~/.config` on
//!    Linux, `~/Library/Application Support` on macOS, `%APPDATA%` on
//!    Windows) joined with `teller`

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::error::{TellerError, TellerResult};

/// Environment variable that overrides the config directory
pub const CONFIG_DIR_ENV: &str = "TELLER_CONFIG_DIR";

/// Manages the paths used by Teller
#[derive(Debug, Clone)]
pub struct TellerPaths {
    base_dir: PathBuf,
}

impl TellerPaths {
    /// Resolve the config directory from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> TellerResult<Self> {
        let base_dir = match std::env::var_os(CONFIG_DIR_ENV) {
            Some(custom) => PathBuf::from(custom),
            None => BaseDirs::new()
                .ok_or_else(|| {
                    TellerError::Config("Could not determine the home directory".into())
                })?
                .config_dir()
                .join("teller"),
        };

        Ok(Self { base_dir })
    }

    /// Use an explicit base directory (tests, portable installs)
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Create the config directory if missing
    pub fn ensure_directories(&self) -> TellerResult<()> {
        std::fs::create_dir_all(&self.base_dir).map_err(|e| {
            TellerError::Io(format!(
                "Failed to create config directory {}: {}",
                self.base_dir.display(),
                e
            ))
        })
    }
}
