//! Configuration loading and management for the Overtime Report Engine.
//!
//! This module loads the engine settings and the public holiday calendar from
//! YAML files.
//!
//! # Example
//!
//! ```no_run
//! use overtime_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Records file: {}", config.records_path().display());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{EngineConfig, HolidayCalendar, ReportConfig, ServerConfig, StorageConfig};
