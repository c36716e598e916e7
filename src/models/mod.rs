//! Core data models for the Overtime Report Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod filter_spec;
mod holiday;
mod summary;
mod time_record;

pub use filter_spec::FilterSpec;
pub use holiday::{HolidaySet, PublicHoliday};
pub use summary::{
    AnnualReport, DailySummary, DayDetail, FilterStats, PeriodSummary, ReportSummary,
};
pub use time_record::{PayBreakdown, RecordId, TimeRecord};
