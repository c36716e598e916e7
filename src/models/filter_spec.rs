//! Filter specification model.
//!
//! A [`FilterSpec`] is an immutable, multi-dimensional query over the record
//! collection. Each dimension is optional; an absent dimension places no
//! constraint on the result.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calculation::DayType;

/// Query over the record collection.
///
/// Serializes with camelCase keys and omits absent dimensions, which is the
/// shape echoed in the JSON export metadata.
///
/// # Example
///
/// ```
/// use overtime_engine::calculation::DayType;
/// use overtime_engine::models::FilterSpec;
///
/// let spec = FilterSpec::default()
///     .with_year("2024")
///     .with_day_type(DayType::Holiday);
///
/// assert!(!spec.is_empty());
/// assert_eq!(
///     serde_json::to_string(&spec).unwrap(),
///     r#"{"year":"2024","dayType":"festive"}"#
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    /// Earliest date to keep (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Latest date to keep (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// `YYYY-MM` prefix the date must start with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    /// `YYYY` prefix the date must start with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    /// Day type the date must classify as.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_type: Option<DayType>,
}

impl FilterSpec {
    /// Constrains the start of the date range.
    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Constrains the end of the date range.
    pub fn with_end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    /// Constrains the month prefix.
    pub fn with_month(mut self, month: impl Into<String>) -> Self {
        self.month = Some(month.into());
        self
    }

    /// Constrains the year prefix.
    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    /// Constrains the day type.
    pub fn with_day_type(mut self, day_type: DayType) -> Self {
        self.day_type = Some(day_type);
        self
    }

    /// Returns true if no dimension is constrained.
    pub fn is_empty(&self) -> bool {
        self.start_date.is_none()
            && self.end_date.is_none()
            && self.month.is_none()
            && self.year.is_none()
            && self.day_type.is_none()
    }
}
