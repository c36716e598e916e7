//! Request types for the Overtime Report Engine API.
//!
//! Query parameters arrive as raw strings so that malformed values can be
//! reported as `INVALID_FILTER` with the offending field named, instead of a
//! generic extractor rejection.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calculation::DayType;
use crate::error::{EngineError, EngineResult};
use crate::models::FilterSpec;

/// Query string of `GET /records`.
///
/// Empty values are treated as absent, matching what an HTML form submits
/// for an untouched field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordsQuery {
    /// Earliest date, `YYYY-MM-DD`.
    #[serde(default)]
    pub start_date: Option<String>,
    /// Latest date, `YYYY-MM-DD`.
    #[serde(default)]
    pub end_date: Option<String>,
    /// Month, `YYYY-MM`.
    #[serde(default)]
    pub month: Option<String>,
    /// Year, `YYYY`.
    #[serde(default)]
    pub year: Option<String>,
    /// Day type key.
    #[serde(default)]
    pub day_type: Option<String>,
    /// 1-based page number.
    #[serde(default)]
    pub page: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn invalid(field: &str, message: impl Into<String>) -> EngineError {
    EngineError::InvalidFilter {
        field: field.to_string(),
        message: message.into(),
    }
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(field: &str, value: &str) -> EngineResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| invalid(field, format!("'{}' is not a YYYY-MM-DD date", value)))
}

/// Validates a `YYYY-MM` month and returns it unchanged.
pub fn parse_month(value: &str) -> EngineResult<String> {
    let well_formed = value.len() == 7
        && NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d").is_ok();
    if well_formed {
        Ok(value.to_string())
    } else {
        Err(invalid("month", format!("'{}' is not a YYYY-MM month", value)))
    }
}

/// Parses a four-digit year.
pub fn parse_year(value: &str) -> EngineResult<i32> {
    if value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit()) {
        value
            .parse()
            .map_err(|_| invalid("year", format!("'{}' is not a YYYY year", value)))
    } else {
        Err(invalid("year", format!("'{}' is not a YYYY year", value)))
    }
}

impl RecordsQuery {
    /// Validates the filter dimensions.
    ///
    /// # Example
    ///
    /// ```
    /// use overtime_engine::api::RecordsQuery;
    ///
    /// let query = RecordsQuery {
    ///     month: Some("2024-02".to_string()),
    ///     day_type: Some("saturday".to_string()),
    ///     year: Some(String::new()),
    ///     ..Default::default()
    /// };
    /// let filter = query.to_filter().unwrap();
    /// assert_eq!(filter.month.as_deref(), Some("2024-02"));
    /// assert!(filter.year.is_none());
    ///
    /// let bad = RecordsQuery { month: Some("2024-13".to_string()), ..Default::default() };
    /// assert!(bad.to_filter().is_err());
    /// ```
    pub fn to_filter(&self) -> EngineResult<FilterSpec> {
        let mut filter = FilterSpec::default();

        if let Some(value) = non_empty(&self.start_date) {
            filter.start_date = Some(parse_date("start_date", value)?);
        }
        if let Some(value) = non_empty(&self.end_date) {
            filter.end_date = Some(parse_date("end_date", value)?);
        }
        if let Some(value) = non_empty(&self.month) {
            filter.month = Some(parse_month(value)?);
        }
        if let Some(value) = non_empty(&self.year) {
            parse_year(value)?;
            filter.year = Some(value.to_string());
        }
        if let Some(value) = non_empty(&self.day_type) {
            let day_type: DayType = value
                .parse()
                .map_err(|e| invalid("day_type", format!("{}", e)))?;
            filter.day_type = Some(day_type);
        }

        Ok(filter)
    }

    /// The requested page, defaulting to 1.
    pub fn page_number(&self) -> EngineResult<usize> {
        match non_empty(&self.page) {
            None => Ok(1),
            Some(value) => match value.parse::<usize>() {
                Ok(page) if page >= 1 => Ok(page),
                _ => Err(invalid("page", format!("'{}' is not a page number", value))),
            },
        }
    }
}

/// Body of `POST /selection/toggle`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleRequest {
    /// View position to flip.
    pub index: usize,
}

fn default_true() -> bool {
    true
}

/// Body of `POST /selection/page`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSelectionRequest {
    /// 1-based page of the current view.
    pub page: usize,
    /// Select (`true`) or deselect (`false`) the page.
    #[serde(default = "default_true")]
    pub selected: bool,
}
