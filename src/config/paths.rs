//! Path management for the assistant
//!
//! ## Path Resolution Order
//!
//! 1. `ASSISTANT_DATA_DIR` environment variable (if set)
//! 2. The platform config directory: `$XDG_CONFIG_HOME/assistant` (or
//!    `~/.config/assistant`) on Linux, `%APPDATA%\assistant` on Windows

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::{AssistantError, AssistantResult};
use crate::models::EntityKind;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "ASSISTANT_DATA_DIR";

/// Manages all paths used by the assistant
#[derive(Debug, Clone)]
pub struct AssistantPaths {
    /// Base directory for settings, audit log, data and reports
    base_dir: PathBuf,
}

impl AssistantPaths {
    /// Resolve the base directory from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> AssistantResult<Self> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Use a fixed base directory (tests and embedding)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Directory holding the collection files
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Directory finance reports are written to
    pub fn reports_dir(&self) -> PathBuf {
        self.base_dir.join("reports")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Storage file for one collection
    pub fn collection_file(&self, kind: EntityKind) -> PathBuf {
        self.data_dir().join(kind.file_name())
    }

    /// Create the base, data and reports directories
    pub fn ensure_directories(&self) -> AssistantResult<()> {
        for (dir, what) in [
            (self.base_dir.clone(), "base"),
            (self.data_dir(), "data"),
            (self.reports_dir(), "reports"),
        ] {
            std::fs::create_dir_all(&dir).map_err(|e| {
                AssistantError::Io(format!("Failed to create {} directory: {}", what, e))
            })?;
        }
        Ok(())
    }
}

fn resolve_default_path() -> AssistantResult<PathBuf> {
    ProjectDirs::from("", "", "assistant")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| AssistantError::Config("Could not determine a home directory".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AssistantPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
        assert_eq!(paths.reports_dir(), temp_dir.path().join("reports"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AssistantPaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().is_dir());
        assert!(paths.reports_dir().is_dir());
    }

    #[test]
    fn test_file_paths() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AssistantPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(paths.audit_log(), temp_dir.path().join("audit.log"));
        assert_eq!(
            paths.collection_file(EntityKind::Finance),
            temp_dir.path().join("data").join("finance.json")
        );
    }
}
