//! User settings for Teller
//!
//! Persisted as pretty JSON in `config.json`. Every field has a default so
//! older or hand-written files keep loading.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::paths::TellerPaths;
use crate::error::{TellerError, TellerResult};

/// User settings for Teller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Transaction log location; relative paths resolve against the
    /// working directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,

    /// Symbol used when displaying balances
    #[serde(default = "default_currency")]
    pub currency_symbol: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            log_file: None,
            currency_symbol: default_currency(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if there is no file
    ///
    /// Never writes; the caller decides when to persist.
    pub fn load_or_create(paths: &TellerPaths) -> TellerResult<Self> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            return Ok(Settings::default());
        }

        let contents = fs::read_to_string(&settings_path)
            .map_err(|e| TellerError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| TellerError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk atomically (temp file, sync, rename)
    pub fn save(&self, paths: &TellerPaths) -> TellerResult<()> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let temp_path = settings_path.with_extension("json.tmp");

        let file = File::create(&temp_path)
            .map_err(|e| TellerError::Io(format!("Failed to create temp file: {}", e)))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer
            .flush()
            .map_err(|e| TellerError::Io(format!("Failed to flush settings: {}", e)))?;
        writer
            .get_ref()
            .sync_all()
            .map_err(|e| TellerError::Io(format!("Failed to sync settings: {}", e)))?;

        fs::rename(&temp_path, &settings_path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            TellerError::Io(format!("Failed to write settings file: {}", e))
        })
    }
}
