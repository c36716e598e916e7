//! Time record model and related types.
//!
//! A [`TimeRecord`] is one worked shift as logged by the time-entry workflow.
//! Hours and amounts arrive pre-computed; this crate only classifies, filters,
//! aggregates and exports them.

use chrono::{Datelike, NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::{DayType, classify_day};
use crate::models::HolidaySet;

/// Stable identifier assigned to a record when it is first ingested.
pub type RecordId = Uuid;

/// Decomposition of a record's amount into its pay components.
///
/// Components are non-negative. Their sum should not exceed the record's
/// amount, but records that break this are kept as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayBreakdown {
    /// Overtime paid at the weekday rate.
    pub weekday_extra: Decimal,
    /// Overtime paid at the Saturday rate.
    pub saturday_extra: Decimal,
    /// Overtime paid at the Sunday rate.
    pub sunday_extra: Decimal,
    /// Overtime paid at the holiday rate.
    pub holiday_extra: Decimal,
    /// Night-work surcharge.
    pub night_surcharge: Decimal,
}

impl PayBreakdown {
    /// Sum of all components.
    pub fn total(&self) -> Decimal {
        self.weekday_extra
            + self.saturday_extra
            + self.sunday_extra
            + self.holiday_extra
            + self.night_surcharge
    }

    /// Named components with a non-zero value, in display order.
    pub fn components(&self) -> Vec<(&'static str, Decimal)> {
        [
            ("weekday_extra", self.weekday_extra),
            ("saturday_extra", self.saturday_extra),
            ("sunday_extra", self.sunday_extra),
            ("holiday_extra", self.holiday_extra),
            ("night_surcharge", self.night_surcharge),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_zero())
        .collect()
    }
}

/// Represents one worked shift.
///
/// # Example
///
/// ```
/// use overtime_engine::models::TimeRecord;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let record = TimeRecord::new(NaiveDate::from_ymd_opt(2024, 1, 6).unwrap())
///     .with_hours(Decimal::new(100, 1), Decimal::new(20, 1), Decimal::ZERO)
///     .with_amount(Decimal::new(50, 0));
///
/// assert_eq!(record.normal_hours(), Decimal::new(80, 1));
/// assert_eq!(record.month_key(), "2024-01");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRecord {
    /// Stable identifier of the record.
    pub id: RecordId,
    /// The date the shift was worked.
    pub date: NaiveDate,
    /// Clock-in time, display only.
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    /// Clock-out time, display only.
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
    /// Total hours worked.
    pub total_hours: Decimal,
    /// Hours paid as overtime.
    pub extra_hours: Decimal,
    /// Hours worked at night.
    pub night_hours: Decimal,
    /// Amount earned for the shift.
    pub amount: Decimal,
    /// Optional decomposition of `amount`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<PayBreakdown>,
}

impl TimeRecord {
    /// Creates an empty record for a date with a fresh identifier.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            start_time: None,
            end_time: None,
            total_hours: Decimal::ZERO,
            extra_hours: Decimal::ZERO,
            night_hours: Decimal::ZERO,
            amount: Decimal::ZERO,
            breakdown: None,
        }
    }

    /// Sets the clock times.
    pub fn with_times(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.start_time = Some(start);
        self.end_time = Some(end);
        self
    }

    /// Sets total, extra and night hours.
    pub fn with_hours(mut self, total: Decimal, extra: Decimal, night: Decimal) -> Self {
        self.total_hours = total;
        self.extra_hours = extra;
        self.night_hours = night;
        self
    }

    /// Sets the amount.
    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = amount;
        self
    }

    /// Sets the pay breakdown.
    pub fn with_breakdown(mut self, breakdown: PayBreakdown) -> Self {
        self.breakdown = Some(breakdown);
        self
    }

    /// Hours not paid as overtime (`total_hours - extra_hours`).
    pub fn normal_hours(&self) -> Decimal {
        self.total_hours - self.extra_hours
    }

    /// The ISO date string, `YYYY-MM-DD`.
    pub fn date_key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// The `YYYY-MM` prefix of the date.
    pub fn month_key(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }

    /// The calendar year of the date.
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Classifies the record's date.
    pub fn day_type(&self, holidays: &HolidaySet) -> DayType {
        classify_day(self.date, holidays)
    }
}
