//! User settings for envelope-planner
//!
//! Holds the planner calendar id and the date format used for the planner
//! title.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::paths::EnvelopePaths;
use crate::error::EnvelopeError;

/// Capability that provisions the calendar holding plan events
///
/// Implementations may create the calendar as a side effect; callers go
/// through [`Settings::resolve_planner_calendar`] so that happens at most once.
pub trait PlannerCalendar {
    /// Return the id of the planner calendar, creating it if needed
    fn ensure_planner(&self) -> Result<i64, EnvelopeError>;
}

/// User settings for envelope-planner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Date format for the planner title (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Calendar holding plan events, once provisioned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planner_calendar_id: Option<i64>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_date_format() -> String {
    "%b %d, %Y".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            date_format: default_date_format(),
            planner_calendar_id: None,
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &EnvelopePaths) -> Result<Self, EnvelopeError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                EnvelopeError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                EnvelopeError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &EnvelopePaths) -> Result<(), EnvelopeError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            EnvelopeError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            EnvelopeError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }

    /// Return the planner calendar id, provisioning it on first use
    ///
    /// The provisioned id is recorded in these settings; persisting them is
    /// left to the caller.
    pub fn resolve_planner_calendar(
        &mut self,
        calendar: &dyn PlannerCalendar,
    ) -> Result<i64, EnvelopeError> {
        if let Some(id) = self.planner_calendar_id {
            return Ok(id);
        }
        let id = calendar.ensure_planner()?;
        info!(calendar_id = id, "provisioned planner calendar");
        self.planner_calendar_id = Some(id);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tempfile::TempDir;

    struct CountingCalendar {
        calls: Cell<u32>,
    }

    impl PlannerCalendar for CountingCalendar {
        fn ensure_planner(&self) -> Result<i64, EnvelopeError> {
            self.calls.set(self.calls.get() + 1);
            Ok(17)
        }
    }

    struct BrokenCalendar;

    impl PlannerCalendar for BrokenCalendar {
        fn ensure_planner(&self) -> Result<i64, EnvelopeError> {
            Err(EnvelopeError::Storage("calendar provider unavailable".into()))
        }
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.schema_version, 1);
        assert_eq!(settings.date_format, "%b %d, %Y");
        assert_eq!(settings.planner_calendar_id, None);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = EnvelopePaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.date_format = "%Y-%m-%d".into();
        settings.planner_calendar_id = Some(3);
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"planner_calendar_id": 9}"#).unwrap();
        assert_eq!(settings.planner_calendar_id, Some(9));
        assert_eq!(settings.date_format, "%b %d, %Y");
    }

    #[test]
    fn test_planner_calendar_provisioned_once() {
        let calendar = CountingCalendar { calls: Cell::new(0) };
        let mut settings = Settings::default();

        assert_eq!(settings.resolve_planner_calendar(&calendar).unwrap(), 17);
        assert_eq!(settings.resolve_planner_calendar(&calendar).unwrap(), 17);
        assert_eq!(calendar.calls.get(), 1);
        assert_eq!(settings.planner_calendar_id, Some(17));
    }

    #[test]
    fn test_planner_calendar_failure_leaves_settings_untouched() {
        let mut settings = Settings::default();
        assert!(settings.resolve_planner_calendar(&BrokenCalendar).is_err());
        assert_eq!(settings.planner_calendar_id, None);
    }
}
