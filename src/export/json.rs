//! JSON export.
//!
//! The export envelope carries the filter that produced the records, so a
//! file can be traced back to the view it was taken from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{FilterSpec, TimeRecord};

/// Metadata block of a JSON export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    /// When the export was produced.
    pub export_timestamp: DateTime<Utc>,
    /// The filter the records were selected with.
    pub filters: FilterSpec,
    /// Number of records in `data`.
    pub total_records: usize,
}

/// A complete JSON export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordExport {
    /// Export metadata.
    pub metadata: ExportMetadata,
    /// The exported records.
    pub data: Vec<TimeRecord>,
}

impl RecordExport {
    /// Wraps records with their metadata.
    pub fn new(records: &[TimeRecord], filters: &FilterSpec, exported_at: DateTime<Utc>) -> Self {
        Self {
            metadata: ExportMetadata {
                export_timestamp: exported_at,
                filters: filters.clone(),
                total_records: records.len(),
            },
            data: records.to_vec(),
        }
    }
}

/// Renders records as a pretty-printed JSON export.
///
/// # Example
///
/// ```
/// use overtime_engine::export::records_to_json;
/// use overtime_engine::models::FilterSpec;
/// use chrono::{TimeZone, Utc};
///
/// let exported_at = Utc.with_ymd_and_hms(2024, 2, 1, 9, 30, 0).unwrap();
/// let json = records_to_json(&[], &FilterSpec::default(), exported_at).unwrap();
/// assert!(json.contains("\"exportTimestamp\": \"2024-02-01T09:30:00Z\""));
/// assert!(json.contains("\"totalRecords\": 0"));
/// ```
pub fn records_to_json(
    records: &[TimeRecord],
    filters: &FilterSpec,
    exported_at: DateTime<Utc>,
) -> EngineResult<String> {
    let export = RecordExport::new(records, filters, exported_at);
    serde_json::to_string_pretty(&export).map_err(|e| EngineError::ExportError {
        message: e.to_string(),
    })
}

/// Reads an export document back.
pub fn parse_export(json: &str) -> EngineResult<RecordExport> {
    serde_json::from_str(json).map_err(|e| EngineError::ExportError {
        message: format!("invalid export document: {}", e),
    })
}
