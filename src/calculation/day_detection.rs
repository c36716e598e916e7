//! Day classification logic.
//!
//! This module determines the [`DayType`] of a calendar date, which decides the
//! overtime treatment a shift on that date received and drives the day-type
//! filter and the export label.

use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::models::HolidaySet;

/// Represents the type of a worked day.
///
/// # Example
///
/// ```
/// use overtime_engine::calculation::DayType;
///
/// let day_type: DayType = "festive".parse().unwrap();
/// assert_eq!(day_type, DayType::Holiday);
/// assert_eq!(day_type.to_string(), "Holiday");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayType {
    /// Monday through Friday, not a public holiday.
    Weekday,
    /// Saturday, not a public holiday.
    Saturday,
    /// Sunday, not a public holiday.
    Sunday,
    /// Any date in the holiday set, whatever its day of the week.
    #[serde(rename = "festive", alias = "holiday")]
    Holiday,
}

impl DayType {
    /// All day types in display order.
    pub const ALL: [DayType; 4] = [
        DayType::Weekday,
        DayType::Saturday,
        DayType::Sunday,
        DayType::Holiday,
    ];

    /// The key used in query strings and serialized filters.
    pub fn as_key(&self) -> &'static str {
        match self {
            DayType::Weekday => "weekday",
            DayType::Saturday => "saturday",
            DayType::Sunday => "sunday",
            DayType::Holiday => "festive",
        }
    }
}

impl std::fmt::Display for DayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayType::Weekday => write!(f, "Weekday"),
            DayType::Saturday => write!(f, "Saturday"),
            DayType::Sunday => write!(f, "Sunday"),
            DayType::Holiday => write!(f, "Holiday"),
        }
    }
}

/// Error returned when a string names no known day type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDayType(pub String);

impl std::fmt::Display for UnknownDayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown day type '{}', expected weekday, saturday, sunday or festive",
            self.0
        )
    }
}

impl std::error::Error for UnknownDayType {}

impl FromStr for DayType {
    type Err = UnknownDayType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekday" => Ok(DayType::Weekday),
            "saturday" => Ok(DayType::Saturday),
            "sunday" => Ok(DayType::Sunday),
            "festive" | "holiday" => Ok(DayType::Holiday),
            _ => Err(UnknownDayType(s.to_string())),
        }
    }
}

/// Classifies a date against a holiday set.
///
/// Holiday membership is checked first, so a public holiday that falls on a
/// weekend is reported as [`DayType::Holiday`], not as Saturday or Sunday.
///
/// # Example
///
/// ```
/// use overtime_engine::calculation::{classify_day, DayType};
/// use overtime_engine::models::HolidaySet;
/// use chrono::NaiveDate;
///
/// // 2024-01-06 is a Saturday
/// let date = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
/// assert_eq!(classify_day(date, &HolidaySet::default()), DayType::Saturday);
///
/// let holidays = HolidaySet::from_dates([date]);
/// assert_eq!(classify_day(date, &holidays), DayType::Holiday);
/// ```
pub fn classify_day(date: NaiveDate, holidays: &HolidaySet) -> DayType {
    if holidays.is_holiday(date) {
        return DayType::Holiday;
    }
    match date.weekday() {
        Weekday::Sat => DayType::Saturday,
        Weekday::Sun => DayType::Sunday,
        _ => DayType::Weekday,
    }
}
