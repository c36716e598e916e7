//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configuration from YAML files.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::HolidaySet;

use super::types::{EngineConfig, HolidayCalendar};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── engine.yaml    # Server, storage and report settings
/// └── holidays.yaml  # Public holiday calendar
/// ```
///
/// # Example
///
/// ```no_run
/// use overtime_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Listening on {}", loader.server_address());
/// println!("{} holidays", loader.holiday_set().len());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    engine: EngineConfig,
    calendar: HolidayCalendar,
    holidays: HolidaySet,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Either file is missing (`ConfigNotFound`)
    /// - Either file contains invalid YAML or invalid values (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let engine_path = path.join("engine.yaml");
        let engine = Self::load_yaml::<EngineConfig>(&engine_path)?;
        if engine.report.page_size == 0 {
            return Err(EngineError::ConfigParseError {
                path: engine_path.display().to_string(),
                message: "report.page_size must be at least 1".to_string(),
            });
        }

        let calendar = Self::load_yaml::<HolidayCalendar>(&path.join("holidays.yaml"))?;
        let holidays = calendar.to_set();

        info!(
            config_dir = %path.display(),
            holidays = holidays.len(),
            page_size = engine.report.page_size,
            "Configuration loaded"
        );

        Ok(Self {
            engine,
            calendar,
            holidays,
        })
    }

    /// Builds a loader from already-parsed parts.
    pub fn from_parts(engine: EngineConfig, calendar: HolidayCalendar) -> Self {
        let holidays = calendar.to_set();
        Self {
            engine,
            calendar,
            holidays,
        }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the engine settings.
    pub fn engine(&self) -> &EngineConfig {
        &self.engine
    }

    /// Returns the holiday calendar as listed.
    pub fn calendar(&self) -> &HolidayCalendar {
        &self.calendar
    }

    /// Returns the holiday dates the classifier uses.
    pub fn holiday_set(&self) -> &HolidaySet {
        &self.holidays
    }

    /// `host:port` to listen on.
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.engine.server.host, self.engine.server.port)
    }

    /// Path of the JSON history file.
    pub fn records_path(&self) -> &PathBuf {
        &self.engine.storage.records_path
    }

    /// Records per listing page.
    pub fn page_size(&self) -> usize {
        self.engine.report.page_size
    }
}
