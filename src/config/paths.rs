//! Path management for envelope-planner
//!
//! ## Path Resolution Order
//!
//! 1. `ENVELOPE_PLANNER_DATA_DIR` environment variable (if set)
//! 2. The platform config directory reported by `directories`
//!    (`~/.config/envelope-planner` on Linux)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::EnvelopeError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "ENVELOPE_PLANNER_DATA_DIR";

/// Manages all paths used by envelope-planner
#[derive(Debug, Clone)]
pub struct EnvelopePaths {
    /// Base directory for settings and diagnostics
    base_dir: PathBuf,
}

impl EnvelopePaths {
    /// Create a new EnvelopePaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no platform config directory can be determined.
    pub fn new() -> Result<Self, EnvelopeError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create EnvelopePaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the diagnostic log
    pub fn diagnostics_log(&self) -> PathBuf {
        self.base_dir.join("diagnostics.log")
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), EnvelopeError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| EnvelopeError::Io(format!("Failed to create base directory: {}", e)))?;
        Ok(())
    }

    /// Check if settings have been written before
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, EnvelopeError> {
    let dirs = ProjectDirs::from("com", "envelope", "envelope-planner").ok_or_else(|| {
        EnvelopeError::Config("Could not determine configuration directory".into())
    })?;
    Ok(dirs.config_dir().to_path_buf())
}
