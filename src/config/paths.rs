//! Path management for SK Production Admin
//!
//! Resolves where configuration, collections and the audit log live.
//!
//! ## Path Resolution Order
//!
//! 1. `SKP_DATA_DIR` environment variable (if set)
//! 2. Platform data directory from `directories::ProjectDirs`
//!    (e.g. `~/.local/share/sk-production` on Linux)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::AdminError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "SKP_DATA_DIR";

/// Manages all paths used by SK Production Admin
#[derive(Debug, Clone)]
pub struct SkpPaths {
    /// Base directory for all data
    base_dir: PathBuf,
}

impl SkpPaths {
    /// Create a new SkpPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no platform data directory can be determined.
    pub fn new() -> Result<Self, AdminError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            ProjectDirs::from("com", "SK Production", "sk-production")
                .map(|dirs| dirs.data_dir().to_path_buf())
                .ok_or_else(|| {
                    AdminError::Config("Could not determine a data directory".into())
                })?
        };

        Ok(Self { base_dir })
    }

    /// Create SkpPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory holding one JSON file per collection
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the append-only audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to the version history collection
    pub fn versions_file(&self) -> PathBuf {
        self.data_dir().join("versions.json")
    }

    /// Get the path to a named collection file (e.g. `equipment.json`)
    pub fn collection_file(&self, collection: &str) -> PathBuf {
        self.data_dir().join(format!("{}.json", collection))
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), AdminError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| AdminError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| AdminError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if the data directory has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SkpPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
        assert_eq!(paths.audit_log(), temp_dir.path().join("audit.log"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SkpPaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().exists());
        assert!(!paths.is_initialized());
    }

    #[test]
    fn test_file_paths() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SkpPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(
            paths.collection_file("equipment"),
            temp_dir.path().join("data").join("equipment.json")
        );
        assert_eq!(
            paths.versions_file(),
            temp_dir.path().join("data").join("versions.json")
        );
    }
}
