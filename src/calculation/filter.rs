//! Filter engine.
//!
//! Applies a [`FilterSpec`] to a record collection and produces the canonical
//! view ordering every index-based operation relies on: most recent date
//! first, ties kept in collection order.

use tracing::debug;

use crate::models::{FilterSpec, HolidaySet, TimeRecord};

use super::classify_day;

/// Returns true if a record satisfies every constrained dimension of `spec`.
///
/// Month and year are plain prefix checks on the ISO date and are evaluated
/// independently, so a month of `2024-03` combined with a year of `2023`
/// matches nothing.
pub fn matches_filter(record: &TimeRecord, spec: &FilterSpec, holidays: &HolidaySet) -> bool {
    if spec.start_date.is_some_and(|start| record.date < start) {
        return false;
    }
    if spec.end_date.is_some_and(|end| record.date > end) {
        return false;
    }

    if spec.month.is_some() || spec.year.is_some() {
        let date_key = record.date_key();
        if spec
            .month
            .as_deref()
            .is_some_and(|month| !date_key.starts_with(month))
        {
            return false;
        }
        if spec
            .year
            .as_deref()
            .is_some_and(|year| !date_key.starts_with(year))
        {
            return false;
        }
    }

    match spec.day_type {
        Some(day_type) => classify_day(record.date, holidays) == day_type,
        None => true,
    }
}

/// Filters records and sorts the result by date, most recent first.
///
/// The sort is stable: records sharing a date keep their relative order from
/// `records`. An empty or over-restrictive spec yields an empty list, never an
/// error.
///
/// # Example
///
/// ```
/// use overtime_engine::calculation::{apply_filter, DayType};
/// use overtime_engine::models::{FilterSpec, HolidaySet, TimeRecord};
/// use chrono::NaiveDate;
///
/// let saturday = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
/// let records = vec![TimeRecord::new(saturday)];
/// let holidays = HolidaySet::from_dates([saturday]);
///
/// let festive = FilterSpec::default().with_day_type(DayType::Holiday);
/// assert_eq!(apply_filter(&records, &festive, &holidays).len(), 1);
///
/// let saturdays = FilterSpec::default().with_day_type(DayType::Saturday);
/// assert!(apply_filter(&records, &saturdays, &holidays).is_empty());
/// ```
pub fn apply_filter(
    records: &[TimeRecord],
    spec: &FilterSpec,
    holidays: &HolidaySet,
) -> Vec<TimeRecord> {
    let mut filtered: Vec<TimeRecord> = records
        .iter()
        .filter(|record| matches_filter(record, spec, holidays))
        .cloned()
        .collect();

    filtered.sort_by(|a, b| b.date.cmp(&a.date));

    debug!(
        input = records.len(),
        output = filtered.len(),
        "Applied record filter"
    );
    filtered
}
