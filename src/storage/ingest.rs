//! Normalization of stored records.
//!
//! Stored history documents have been written by several versions of the
//! time-entry workflow, so one field may appear under more than one key, a
//! number may arrive as a string, and a breakdown may be a nested JSON string.
//! Everything is resolved here, once, into the canonical [`TimeRecord`].

use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::models::{PayBreakdown, TimeRecord};

const TOTAL_HOURS_KEYS: &[&str] = &["total_hours", "totalHours"];
const EXTRA_HOURS_KEYS: &[&str] = &["extra_hours", "extraHours"];
const NIGHT_HOURS_KEYS: &[&str] = &["night_hours", "nightHours"];
const AMOUNT_KEYS: &[&str] = &["amount"];
const START_TIME_KEYS: &[&str] = &["start_time", "startTime"];
const END_TIME_KEYS: &[&str] = &["end_time", "endTime"];

const WEEKDAY_EXTRA_KEYS: &[&str] = &["weekday_extra", "extraWeekAmount"];
const SATURDAY_EXTRA_KEYS: &[&str] = &["saturday_extra", "extraSatAmount"];
const SUNDAY_EXTRA_KEYS: &[&str] = &["sunday_extra", "extraSunAmount"];
const HOLIDAY_EXTRA_KEYS: &[&str] = &["holiday_extra", "extraFestAmount"];
const NIGHT_SURCHARGE_KEYS: &[&str] = &["night_surcharge", "nightAmount"];

/// Why a stored entry could not become a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    /// The entry is not a JSON object.
    #[error("entry is not an object")]
    NotAnObject,
    /// The entry has no date.
    #[error("entry has no date")]
    MissingDate,
    /// The entry's date is not an ISO calendar date.
    #[error("unparseable date '{0}'")]
    InvalidDate(String),
}

/// Result of normalizing a whole history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestOutcome {
    /// Records that were kept, in stored order.
    pub records: Vec<TimeRecord>,
    /// Number of entries dropped.
    pub skipped: usize,
    /// Number of kept records that had no identifier and received one.
    pub assigned_ids: usize,
}

/// First non-null value under any of `keys`.
fn lookup<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !value.is_null())
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Reads a non-negative amount. Missing or non-numeric values are zero and
/// negative values are clamped to zero.
fn decimal_field(object: &Map<String, Value>, keys: &[&str]) -> Decimal {
    let parsed = match lookup(object, keys) {
        Some(Value::Number(n)) => parse_decimal(&n.to_string()),
        Some(Value::String(s)) => parse_decimal(s),
        _ => None,
    };

    match parsed {
        Some(value) if value.is_sign_negative() && !value.is_zero() => {
            warn!(field = keys[0], value = %value, "Negative value clamped to zero");
            Decimal::ZERO
        }
        Some(value) => value,
        None => Decimal::ZERO,
    }
}

fn time_field(object: &Map<String, Value>, keys: &[&str]) -> Option<NaiveTime> {
    let text = lookup(object, keys)?.as_str()?.trim();
    NaiveTime::parse_from_str(text, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M:%S"))
        .ok()
}

fn date_field(object: &Map<String, Value>) -> Result<NaiveDate, SkipReason> {
    let text = match lookup(object, &["date"]) {
        Some(Value::String(s)) => s.trim(),
        Some(other) => return Err(SkipReason::InvalidDate(other.to_string())),
        None => return Err(SkipReason::MissingDate),
    };

    // Accept full timestamps by reading their calendar-date prefix.
    text.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        .ok_or_else(|| SkipReason::InvalidDate(text.to_string()))
}

fn breakdown_field(object: &Map<String, Value>) -> Option<PayBreakdown> {
    let nested;
    let fields = match lookup(object, &["breakdown"])? {
        Value::Object(fields) => fields,
        Value::String(encoded) => match serde_json::from_str::<Value>(encoded) {
            Ok(Value::Object(fields)) => {
                nested = fields;
                &nested
            }
            _ => {
                warn!("Ignoring breakdown that is not a JSON object");
                return None;
            }
        },
        _ => return None,
    };

    Some(PayBreakdown {
        weekday_extra: decimal_field(fields, WEEKDAY_EXTRA_KEYS),
        saturday_extra: decimal_field(fields, SATURDAY_EXTRA_KEYS),
        sunday_extra: decimal_field(fields, SUNDAY_EXTRA_KEYS),
        holiday_extra: decimal_field(fields, HOLIDAY_EXTRA_KEYS),
        night_surcharge: decimal_field(fields, NIGHT_SURCHARGE_KEYS),
    })
}

/// Converts one stored entry into a record.
///
/// Returns the record and whether it received a new identifier.
///
/// # Example
///
/// ```
/// use overtime_engine::storage::normalize_record;
/// use rust_decimal::Decimal;
/// use serde_json::json;
///
/// let entry = json!({
///     "date": "2024-01-06",
///     "totalHours": "10.5",
///     "extra_hours": 2.5,
///     "amount": 50,
/// });
///
/// let (record, assigned) = normalize_record(&entry).unwrap();
/// assert!(assigned);
/// assert_eq!(record.total_hours, Decimal::new(105, 1));
/// assert_eq!(record.night_hours, Decimal::ZERO);
/// ```
pub fn normalize_record(entry: &Value) -> Result<(TimeRecord, bool), SkipReason> {
    let object = entry.as_object().ok_or(SkipReason::NotAnObject)?;
    let date = date_field(object)?;

    let existing_id = lookup(object, &["id"])
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok());

    let record = TimeRecord {
        id: existing_id.unwrap_or_else(Uuid::new_v4),
        date,
        start_time: time_field(object, START_TIME_KEYS),
        end_time: time_field(object, END_TIME_KEYS),
        total_hours: decimal_field(object, TOTAL_HOURS_KEYS),
        extra_hours: decimal_field(object, EXTRA_HOURS_KEYS),
        night_hours: decimal_field(object, NIGHT_HOURS_KEYS),
        amount: decimal_field(object, AMOUNT_KEYS),
        breakdown: breakdown_field(object),
    };

    if record.extra_hours > record.total_hours {
        warn!(
            id = %record.id,
            date = %record.date,
            "Record has more extra hours than total hours"
        );
    }
    if let Some(breakdown) = &record.breakdown {
        if breakdown.total() > record.amount {
            warn!(
                id = %record.id,
                date = %record.date,
                "Record breakdown exceeds its amount"
            );
        }
    }

    Ok((record, existing_id.is_none()))
}

/// Normalizes a stored history, dropping entries that cannot be dated.
pub fn ingest_records(entries: &[Value]) -> IngestOutcome {
    let mut outcome = IngestOutcome::default();

    for (position, entry) in entries.iter().enumerate() {
        match normalize_record(entry) {
            Ok((record, assigned)) => {
                if assigned {
                    outcome.assigned_ids += 1;
                }
                outcome.records.push(record);
            }
            Err(reason) => {
                warn!(position, reason = %reason, "Skipping stored record");
                outcome.skipped += 1;
            }
        }
    }

    outcome
}
