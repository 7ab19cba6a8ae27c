//! User settings for the assistant
//!
//! Stored as `config.json` in the base directory. Every field has a serde
//! default so older or hand-edited files keep loading.

use serde::{Deserialize, Serialize};

use super::paths::AssistantPaths;
use crate::error::{AssistantError, AssistantResult};
use crate::storage::file_io::write_json_atomic;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Append record mutations to the audit log
    #[serde(default = "default_true")]
    pub audit_enabled: bool,

    /// Coerce imported CSV values to the collection's field types
    #[serde(default = "default_true")]
    pub coerce_imports: bool,

    /// Field delimiter for CSV export and import
    #[serde(default = "default_csv_delimiter")]
    pub csv_delimiter: char,
}

fn default_schema_version() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

fn default_csv_delimiter() -> char {
    ','
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            audit_enabled: true,
            coerce_imports: true,
            csv_delimiter: default_csv_delimiter(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist
    pub fn load_or_create(paths: &AssistantPaths) -> AssistantResult<Self> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| AssistantError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
            AssistantError::Config(format!("Failed to parse settings file: {}", e))
        })?;

        settings.csv_delimiter_byte()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &AssistantPaths) -> AssistantResult<()> {
        paths.ensure_directories()?;
        write_json_atomic(&paths.settings_file(), self)
    }

    /// The CSV delimiter as the single byte the csv crate expects
    pub fn csv_delimiter_byte(&self) -> AssistantResult<u8> {
        u8::try_from(self.csv_delimiter)
            .ok()
            .filter(|b| b.is_ascii() && !b.is_ascii_alphanumeric() && *b != b'"')
            .ok_or_else(|| {
                AssistantError::Config(format!(
                    "csv_delimiter must be an ASCII punctuation or whitespace character, got {:?}",
                    self.csv_delimiter
                ))
            })
    }
}
