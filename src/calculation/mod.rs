//! Reporting logic for the Overtime Report Engine.
//!
//! This module contains day classification against the holiday calendar, the
//! filter engine and the views it produces, aggregation into daily, monthly
//! and annual summaries, and selection tracking for bulk operations.

mod aggregation;
mod day_detection;
mod filter;
mod selection;
mod view;

pub use aggregation::{
    available_years, daily_breakdown, day_detail, filter_stats, summarize, summarize_year,
};
pub use day_detection::{DayType, UnknownDayType, classify_day};
pub use filter::{apply_filter, matches_filter};
pub use selection::{DeletionPlan, SelectionTracker, plan_deletion};
pub use view::{DEFAULT_PAGE_SIZE, Page, RecordView};
