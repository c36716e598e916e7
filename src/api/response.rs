//! Response types for the Overtime Report Engine API.
//!
//! This module defines the response bodies of the listing and selection
//! endpoints, the error response structure, and the mapping from
//! [`EngineError`] to HTTP statuses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{DayType, Page, RecordView, SelectionTracker};
use crate::error::EngineError;
use crate::models::{FilterSpec, FilterStats, HolidaySet, TimeRecord};

/// One row of a records listing.
#[derive(Debug, Clone, Serialize)]
pub struct RecordRow {
    /// Position of the record in the current view.
    pub index: usize,
    /// The record itself.
    #[serde(flatten)]
    pub record: TimeRecord,
    /// Hours not paid as overtime.
    pub normal_hours: Decimal,
    /// Classification of the record's date.
    pub day_type: DayType,
    /// Whether the position is in the current selection.
    pub selected: bool,
}

/// Body of `GET /records`.
#[derive(Debug, Clone, Serialize)]
pub struct RecordsPage {
    /// The filter the view was built with.
    pub filter: FilterSpec,
    /// Current page, 1-based.
    pub page: usize,
    /// Records per page.
    pub per_page: usize,
    /// Number of pages in the view.
    pub total_pages: usize,
    /// Number of records in the view.
    pub total_records: usize,
    /// Totals across the whole view.
    pub stats: FilterStats,
    /// Rows of the requested page.
    pub records: Vec<RecordRow>,
}

impl RecordsPage {
    /// Renders one page of a view.
    pub fn build(
        view: &RecordView,
        page: Page,
        stats: FilterStats,
        tracker: &SelectionTracker,
        holidays: &HolidaySet,
    ) -> Self {
        let range = page.range(view.len());
        let records = view.records()[range.clone()]
            .iter()
            .zip(range)
            .map(|(record, index)| RecordRow {
                index,
                normal_hours: record.normal_hours(),
                day_type: record.day_type(holidays),
                selected: tracker.is_selected(index),
                record: record.clone(),
            })
            .collect();

        Self {
            filter: view.filter().clone(),
            page: page.number,
            per_page: page.per_page,
            total_pages: Page::total_pages(view.len(), page.per_page),
            total_records: view.len(),
            stats,
            records,
        }
    }
}

/// Body of `GET /years`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearsResponse {
    /// Years with at least one record, ascending.
    pub years: Vec<i32>,
}

/// State of the selection after a selection request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionResponse {
    /// The filter the selection applies to.
    pub filter: FilterSpec,
    /// Selected view positions, ascending.
    pub selected: Vec<usize>,
    /// Number of selected positions.
    pub selected_count: usize,
    /// Number of records in the view.
    pub total_filtered: usize,
    /// Whether every record of a non-empty view is selected.
    pub all_filtered_selected: bool,
    /// Whether an earlier selection was dropped because the view changed.
    pub stale_selection_cleared: bool,
}

impl SelectionResponse {
    /// Describes the tracker against the view it is bound to.
    pub fn build(view: &RecordView, tracker: &SelectionTracker, stale_selection_cleared: bool) -> Self {
        Self {
            filter: view.filter().clone(),
            selected: tracker.selected_indices(),
            selected_count: tracker.len(),
            total_filtered: view.len(),
            all_filtered_selected: tracker.is_all_filtered_selected(),
            stale_selection_cleared,
        }
    }
}

/// Body of the delete endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletionResponse {
    /// Number of records removed.
    pub removed: usize,
    /// Number of records left in the collection.
    pub remaining: usize,
    /// Whether the selection was stale and therefore not acted upon.
    pub stale_selection_cleared: bool,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::StorageError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "STORAGE_ERROR",
                    "Record store unavailable",
                    format!("{}: {}", path, message),
                ),
            },
            EngineError::InvalidFilter { field, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_FILTER",
                    format!("Invalid filter '{}': {}", field, message),
                    field,
                ),
            },
            EngineError::RecordNotFound { index, len } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::with_details(
                    "RECORD_NOT_FOUND",
                    format!("No record at position {}", index),
                    format!("The current view has {} records", len),
                ),
            },
            EngineError::StaleView { listed, current } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::with_details(
                    "STALE_VIEW",
                    "The records changed since they were listed; list them again",
                    match listed {
                        Some(listed) => format!("Listed at revision {}, now {}", listed, current),
                        None => format!("Nothing listed yet, now at revision {}", current),
                    },
                ),
            },
            EngineError::ExportError { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("EXPORT_ERROR", "Export failed", message),
            },
        }
    }
}
