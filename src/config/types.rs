//! Configuration types for the report engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use std::path::PathBuf;

use serde::Deserialize;

use crate::calculation::DEFAULT_PAGE_SIZE;
use crate::models::{HolidaySet, PublicHoliday};

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Record store settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON history file.
    pub records_path: PathBuf,
}

/// Report presentation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReportConfig {
    /// Records per listing page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

/// Contents of `engine.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Record store settings.
    pub storage: StorageConfig,
    /// Report presentation settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Contents of `holidays.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HolidayCalendar {
    /// Listed public holidays.
    #[serde(default)]
    pub holidays: Vec<PublicHoliday>,
}

impl HolidayCalendar {
    /// The calendar's dates as a lookup set.
    pub fn to_set(&self) -> HolidaySet {
        HolidaySet::from_holidays(&self.holidays)
    }

    /// Holidays that apply in `region`, including national ones.
    pub fn for_region<'a>(&'a self, region: &'a str) -> impl Iterator<Item = &'a PublicHoliday> {
        self.holidays
            .iter()
            .filter(move |h| h.region == "national" || h.region == region)
    }
}
