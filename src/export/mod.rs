//! Export of record views and reports.
//!
//! Exports are pure: they take records and metadata and return a document.
//! [`ExportPayload`] pairs that document with the filename and MIME type a
//! download should carry.

mod csv;
mod json;

pub use self::csv::{
    RECORD_CSV_HEADER, SUMMARY_CSV_HEADER, annual_summary_csv, format_amount, records_to_csv,
};
pub use self::json::{ExportMetadata, RecordExport, parse_export, records_to_json};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::error::EngineResult;
use crate::models::{AnnualReport, FilterSpec, HolidaySet, TimeRecord};

/// MIME type of CSV exports.
pub const CSV_MIME_TYPE: &str = "text/csv; charset=utf-8";

/// MIME type of JSON exports.
pub const JSON_MIME_TYPE: &str = "application/json";

/// A rendered export ready to be downloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportPayload {
    /// Document body.
    pub content: String,
    /// Suggested filename.
    pub filename: String,
    /// MIME type of `content`.
    pub mime_type: &'static str,
}

impl ExportPayload {
    /// CSV of a filtered view, named after the export date.
    pub fn filtered_csv(
        records: &[TimeRecord],
        holidays: &HolidaySet,
        today: NaiveDate,
    ) -> EngineResult<Self> {
        Ok(Self {
            content: records_to_csv(records, holidays)?,
            filename: filtered_csv_filename(today),
            mime_type: CSV_MIME_TYPE,
        })
    }

    /// JSON export of records with their filter metadata.
    pub fn history_json(
        records: &[TimeRecord],
        filters: &FilterSpec,
        exported_at: DateTime<Utc>,
    ) -> EngineResult<Self> {
        Ok(Self {
            content: records_to_json(records, filters, exported_at)?,
            filename: history_json_filename(exported_at.date_naive()),
            mime_type: JSON_MIME_TYPE,
        })
    }

    /// CSV of an annual report.
    pub fn annual_summary(report: &AnnualReport) -> EngineResult<Self> {
        Ok(Self {
            content: annual_summary_csv(report)?,
            filename: annual_summary_filename(report.year),
            mime_type: CSV_MIME_TYPE,
        })
    }
}

/// `overtime_filtered_<YYYY-MM-DD>.csv`
pub fn filtered_csv_filename(date: NaiveDate) -> String {
    format!("overtime_filtered_{}.csv", date.format("%Y-%m-%d"))
}

/// `overtime_history_<YYYY-MM-DD>.json`
pub fn history_json_filename(date: NaiveDate) -> String {
    format!("overtime_history_{}.json", date.format("%Y-%m-%d"))
}

/// `overtime_summary_<YYYY>.csv`
pub fn annual_summary_filename(year: i32) -> String {
    format!("overtime_summary_{:04}.csv", year)
}
