//! Aggregation of time records into summaries.
//!
//! This module rolls a record list up into overall totals, per-month and
//! per-year period summaries, per-day breakdowns, and the twelve-month annual
//! report.
//!
//! Monthly output is densely enumerated: a year that is reported at all is
//! reported with all twelve months, including months without records.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{
    AnnualReport, DailySummary, DayDetail, FilterStats, HolidaySet, PeriodSummary, ReportSummary,
    TimeRecord,
};

use super::classify_day;

/// Divides, returning zero for a zero divisor.
fn ratio(numerator: Decimal, denominator: usize) -> Decimal {
    if denominator == 0 {
        Decimal::ZERO
    } else {
        numerator / Decimal::from(denominator)
    }
}

fn month_key(year: i32, month: u32) -> String {
    format!("{:04}-{:02}", year, month)
}

/// Running totals for one period.
#[derive(Debug, Default)]
struct PeriodAccumulator {
    total_hours: Decimal,
    extra_hours: Decimal,
    night_hours: Decimal,
    amount: Decimal,
    shift_count: usize,
    days: BTreeSet<NaiveDate>,
}

impl PeriodAccumulator {
    fn add(&mut self, record: &TimeRecord) {
        self.total_hours += record.total_hours;
        self.extra_hours += record.extra_hours;
        self.night_hours += record.night_hours;
        self.amount += record.amount;
        self.shift_count += 1;
        self.days.insert(record.date);
    }

    fn finish(self, period: impl Into<String>) -> PeriodSummary {
        let days_worked = self.days.len();
        PeriodSummary {
            period: period.into(),
            avg_amount_per_day: ratio(self.amount, days_worked),
            avg_hours_per_day: ratio(self.total_hours, days_worked),
            total_hours: self.total_hours,
            extra_hours: self.extra_hours,
            night_hours: self.night_hours,
            amount: self.amount,
            days_worked,
            shift_count: self.shift_count,
        }
    }
}

/// Totals across a record list.
///
/// # Example
///
/// ```
/// use overtime_engine::calculation::filter_stats;
/// use rust_decimal::Decimal;
///
/// let stats = filter_stats(&[]);
/// assert_eq!(stats.record_count, 0);
/// assert_eq!(stats.avg_amount_per_day, Decimal::ZERO);
/// ```
pub fn filter_stats(records: &[TimeRecord]) -> FilterStats {
    let mut stats = FilterStats::default();
    for record in records {
        stats.total_hours += record.total_hours;
        stats.extra_hours += record.extra_hours;
        stats.night_hours += record.night_hours;
        stats.amount += record.amount;
    }
    stats.record_count = records.len();
    stats.avg_amount_per_day = ratio(stats.amount, stats.record_count);
    stats
}

/// Rolls a record list into overall, per-month and per-year summaries.
///
/// `by_year` lists each year that has records, ascending. `by_month` lists
/// all twelve months of each of those years, so the monthly amounts always
/// add up to the overall amount.
pub fn summarize(records: &[TimeRecord]) -> ReportSummary {
    let mut years: BTreeMap<i32, PeriodAccumulator> = BTreeMap::new();
    let mut months: BTreeMap<String, PeriodAccumulator> = BTreeMap::new();

    for record in records {
        years.entry(record.year()).or_default().add(record);
        months.entry(record.month_key()).or_default().add(record);
    }

    let mut by_month = Vec::with_capacity(years.len() * 12);
    for &year in years.keys() {
        for month in 1..=12 {
            let key = month_key(year, month);
            let summary = match months.remove(&key) {
                Some(acc) => acc.finish(key),
                None => PeriodSummary::empty(key),
            };
            by_month.push(summary);
        }
    }

    let by_year: Vec<PeriodSummary> = years
        .into_iter()
        .map(|(year, acc)| acc.finish(format!("{:04}", year)))
        .collect();

    debug!(
        records = records.len(),
        years = by_year.len(),
        "Summarized records"
    );

    ReportSummary {
        overall: filter_stats(records),
        by_month,
        by_year,
    }
}

/// Builds the twelve-month report for one year.
///
/// Records from other years are ignored. A year without records still yields
/// twelve zeroed months.
///
/// # Example
///
/// ```
/// use overtime_engine::calculation::summarize_year;
///
/// let report = summarize_year(&[], 2024);
/// assert_eq!(report.months.len(), 12);
/// assert_eq!(report.months[0].period, "2024-01");
/// assert!(report.totals.amount.is_zero());
/// ```
pub fn summarize_year(records: &[TimeRecord], year: i32) -> AnnualReport {
    let mut months: Vec<PeriodAccumulator> = (0..12).map(|_| PeriodAccumulator::default()).collect();
    let mut totals = PeriodAccumulator::default();

    for record in records.iter().filter(|r| r.year() == year) {
        months[record.date.month0() as usize].add(record);
        totals.add(record);
    }

    let months: Vec<PeriodSummary> = months
        .into_iter()
        .enumerate()
        .map(|(i, acc)| acc.finish(month_key(year, i as u32 + 1)))
        .collect();
    let totals = totals.finish(format!("{:04}", year));

    AnnualReport {
        year,
        avg_amount_per_shift: ratio(totals.amount, totals.shift_count),
        months,
        totals,
    }
}

fn daily_summary(date: NaiveDate, records: &[&TimeRecord], holidays: &HolidaySet) -> DailySummary {
    let mut summary = DailySummary {
        date,
        day_type: classify_day(date, holidays),
        shift_count: records.len(),
        total_hours: Decimal::ZERO,
        extra_hours: Decimal::ZERO,
        night_hours: Decimal::ZERO,
        amount: Decimal::ZERO,
    };
    for record in records {
        summary.total_hours += record.total_hours;
        summary.extra_hours += record.extra_hours;
        summary.night_hours += record.night_hours;
        summary.amount += record.amount;
    }
    summary
}

/// Per-day totals for one `YYYY-MM` month, ascending by date.
///
/// Only dates with records appear.
pub fn daily_breakdown(
    records: &[TimeRecord],
    month: &str,
    holidays: &HolidaySet,
) -> Vec<DailySummary> {
    let mut days: BTreeMap<NaiveDate, Vec<&TimeRecord>> = BTreeMap::new();
    for record in records.iter().filter(|r| r.month_key() == month) {
        days.entry(record.date).or_default().push(record);
    }

    days.into_iter()
        .map(|(date, shifts)| daily_summary(date, &shifts, holidays))
        .collect()
}

/// The shifts of one date, in collection order, with their totals.
pub fn day_detail(records: &[TimeRecord], date: NaiveDate, holidays: &HolidaySet) -> DayDetail {
    let shifts: Vec<&TimeRecord> = records.iter().filter(|r| r.date == date).collect();
    DayDetail {
        summary: daily_summary(date, &shifts, holidays),
        shifts: shifts.into_iter().cloned().collect(),
    }
}

/// Distinct years present in the collection, ascending.
pub fn available_years(records: &[TimeRecord]) -> Vec<i32> {
    records
        .iter()
        .map(|r| r.year())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::DayType;
    use std::str::FromStr;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn record(date: &str, total: &str, extra: &str, night: &str, amount: &str) -> TimeRecord {
        TimeRecord::new(make_date(date))
            .with_hours(dec(total), dec(extra), dec(night))
            .with_amount(dec(amount))
    }

    fn sample_records() -> Vec<TimeRecord> {
        vec![
            record("2024-01-06", "10", "2", "0", "50"),
            record("2024-01-08", "9", "1", "1", "30"),
            record("2024-01-08", "4", "0", "2", "10"),
            record("2024-03-15", "8", "0", "0", "0"),
            record("2025-02-01", "12", "4", "3", "120"),
        ]
    }

    #[test]
    fn test_filter_stats_sums_and_averages_per_record() {
        let stats = filter_stats(&sample_records());
        assert_eq!(stats.record_count, 5);
        assert_eq!(stats.total_hours, dec("43"));
        assert_eq!(stats.extra_hours, dec("7"));
        assert_eq!(stats.night_hours, dec("6"));
        assert_eq!(stats.amount, dec("210"));
        assert_eq!(stats.avg_amount_per_day, dec("42"));
    }

    #[test]
    fn test_filter_stats_empty_has_zero_average() {
        let stats = filter_stats(&[]);
        assert_eq!(stats.amount, Decimal::ZERO);
        assert_eq!(stats.avg_amount_per_day, Decimal::ZERO);
    }

    #[test]
    fn test_summarize_enumerates_twelve_months_per_year() {
        let summary = summarize(&sample_records());
        assert_eq!(summary.by_year.len(), 2);
        assert_eq!(summary.by_month.len(), 24);
        assert_eq!(summary.by_month[0].period, "2024-01");
        assert_eq!(summary.by_month[11].period, "2024-12");
        assert_eq!(summary.by_month[12].period, "2025-01");
        assert_eq!(summary.by_month[1], PeriodSummary::empty("2024-02"));
    }

    #[test]
    fn test_summarize_month_amounts_match_overall() {
        let summary = summarize(&sample_records());
        let monthly: Decimal = summary.by_month.iter().map(|m| m.amount).sum();
        let yearly: Decimal = summary.by_year.iter().map(|y| y.amount).sum();
        assert_eq!(monthly, summary.overall.amount);
        assert_eq!(yearly, summary.overall.amount);
    }

    #[test]
    fn test_days_worked_counts_distinct_dates() {
        let summary = summarize(&sample_records());
        let january = &summary.by_month[0];
        assert_eq!(january.shift_count, 3);
        assert_eq!(january.days_worked, 2);
        assert_eq!(january.amount, dec("90"));
        assert_eq!(january.avg_amount_per_day, dec("45"));
        assert_eq!(january.avg_hours_per_day, dec("11.5"));
    }

    #[test]
    fn test_summarize_empty_collection() {
        let summary = summarize(&[]);
        assert!(summary.by_month.is_empty());
        assert!(summary.by_year.is_empty());
        assert_eq!(summary.overall.amount, Decimal::ZERO);
    }

    #[test]
    fn test_summarize_year_is_dense() {
        let report = summarize_year(&sample_records(), 2024);
        assert_eq!(report.months.len(), 12);
        assert_eq!(report.months[0].amount, dec("90"));
        assert_eq!(report.months[2].shift_count, 1);
        assert_eq!(report.months[2].days_worked, 1);
        assert_eq!(report.months[11], PeriodSummary::empty("2024-12"));
    }

    #[test]
    fn test_summarize_year_totals() {
        let report = summarize_year(&sample_records(), 2024);
        assert_eq!(report.totals.period, "2024");
        assert_eq!(report.totals.amount, dec("90"));
        assert_eq!(report.totals.shift_count, 4);
        assert_eq!(report.totals.days_worked, 3);
        assert_eq!(report.avg_amount_per_shift, dec("22.5"));
        assert_eq!(report.totals.avg_amount_per_day, dec("30"));
    }

    #[test]
    fn test_summarize_year_without_records_is_zeroed() {
        let report = summarize_year(&sample_records(), 2019);
        assert_eq!(report.months.len(), 12);
        assert!(report.months.iter().all(|m| m.shift_count == 0));
        assert_eq!(report.avg_amount_per_shift, Decimal::ZERO);
        assert_eq!(report.totals.avg_hours_per_day, Decimal::ZERO);
    }

    #[test]
    fn test_daily_breakdown_groups_by_date() {
        let holidays = HolidaySet::from_dates([make_date("2024-01-06")]);
        let days = daily_breakdown(&sample_records(), "2024-01", &holidays);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, make_date("2024-01-06"));
        assert_eq!(days[0].day_type, DayType::Holiday);
        assert_eq!(days[1].shift_count, 2);
        assert_eq!(days[1].total_hours, dec("13"));
        assert_eq!(days[1].night_hours, dec("3"));
        assert_eq!(days[1].amount, dec("40"));
        assert_eq!(days[1].day_type, DayType::Weekday);
    }

    #[test]
    fn test_daily_breakdown_empty_month() {
        let days = daily_breakdown(&sample_records(), "2024-07", &HolidaySet::default());
        assert!(days.is_empty());
    }

    #[test]
    fn test_day_detail_keeps_collection_order() {
        let records = sample_records();
        let detail = day_detail(&records, make_date("2024-01-08"), &HolidaySet::default());
        assert_eq!(detail.shifts.len(), 2);
        assert_eq!(detail.shifts[0].id, records[1].id);
        assert_eq!(detail.shifts[1].id, records[2].id);
        assert_eq!(detail.summary.amount, dec("40"));
    }

    #[test]
    fn test_day_detail_without_shifts() {
        let detail = day_detail(&sample_records(), make_date("2024-05-05"), &HolidaySet::default());
        assert!(detail.shifts.is_empty());
        assert_eq!(detail.summary.shift_count, 0);
        assert_eq!(detail.summary.day_type, DayType::Sunday);
    }

    #[test]
    fn test_available_years() {
        assert_eq!(available_years(&sample_records()), vec![2024, 2025]);
        assert!(available_years(&[]).is_empty());
    }
}
