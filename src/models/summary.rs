//! Summary models produced by the aggregator.
//!
//! Every type here is derived data: recomputed from the current records and
//! filter on each request and never persisted.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::DayType;

use super::TimeRecord;

/// Totals across a filtered record list.
///
/// `avg_amount_per_day` here divides by the number of records, matching the
/// headline figure shown above a filtered listing where each record is one
/// logged day. Period summaries divide by distinct days instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterStats {
    /// Number of records in the list.
    pub record_count: usize,
    /// Sum of total hours.
    pub total_hours: Decimal,
    /// Sum of overtime hours.
    pub extra_hours: Decimal,
    /// Sum of night hours.
    pub night_hours: Decimal,
    /// Sum of amounts.
    pub amount: Decimal,
    /// `amount / record_count`, zero for an empty list.
    pub avg_amount_per_day: Decimal,
}

/// Totals for one month (`YYYY-MM`) or one year (`YYYY`).
///
/// # Example
///
/// ```
/// use overtime_engine::models::PeriodSummary;
///
/// let empty = PeriodSummary::empty("2024-02");
/// assert_eq!(empty.days_worked, 0);
/// assert!(empty.amount.is_zero());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSummary {
    /// The period key, `YYYY-MM` or `YYYY`.
    pub period: String,
    /// Sum of total hours.
    pub total_hours: Decimal,
    /// Sum of overtime hours.
    pub extra_hours: Decimal,
    /// Sum of night hours.
    pub night_hours: Decimal,
    /// Sum of amounts.
    pub amount: Decimal,
    /// Number of distinct dates with at least one record.
    pub days_worked: usize,
    /// Number of records.
    pub shift_count: usize,
    /// `amount / days_worked`, zero when no day was worked.
    pub avg_amount_per_day: Decimal,
    /// `total_hours / days_worked`, zero when no day was worked.
    pub avg_hours_per_day: Decimal,
}

impl PeriodSummary {
    /// A zeroed summary for a period without records.
    pub fn empty(period: impl Into<String>) -> Self {
        Self {
            period: period.into(),
            total_hours: Decimal::ZERO,
            extra_hours: Decimal::ZERO,
            night_hours: Decimal::ZERO,
            amount: Decimal::ZERO,
            days_worked: 0,
            shift_count: 0,
            avg_amount_per_day: Decimal::ZERO,
            avg_hours_per_day: Decimal::ZERO,
        }
    }
}

/// Overall, per-month and per-year rollup of a record list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Totals across the whole list.
    pub overall: FilterStats,
    /// Twelve entries for every year present, ascending by month.
    pub by_month: Vec<PeriodSummary>,
    /// One entry per year present, ascending.
    pub by_year: Vec<PeriodSummary>,
}

/// Month-by-month report for a single year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualReport {
    /// The reported year.
    pub year: i32,
    /// Exactly twelve entries, January first.
    pub months: Vec<PeriodSummary>,
    /// Totals for the year.
    pub totals: PeriodSummary,
    /// `totals.amount / totals.shift_count`, zero without shifts.
    pub avg_amount_per_shift: Decimal,
}

/// Totals for a single date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySummary {
    /// The date.
    pub date: NaiveDate,
    /// The date's classification.
    pub day_type: DayType,
    /// Number of shifts logged on the date.
    pub shift_count: usize,
    /// Sum of total hours.
    pub total_hours: Decimal,
    /// Sum of overtime hours.
    pub extra_hours: Decimal,
    /// Sum of night hours.
    pub night_hours: Decimal,
    /// Sum of amounts.
    pub amount: Decimal,
}

/// The shifts of one date together with their totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayDetail {
    /// Totals for the date.
    pub summary: DailySummary,
    /// The shifts, in collection order.
    pub shifts: Vec<TimeRecord>,
}
