//! CSV export.
//!
//! Renders record lists and annual reports as UTF-8 CSV: a bare header line,
//! then data rows with every field quoted and every number carrying exactly
//! two decimals.

use chrono::{NaiveTime, Timelike};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};
use crate::models::{AnnualReport, HolidaySet, TimeRecord};

/// Column order of the record export.
pub const RECORD_CSV_HEADER: [&str; 9] = [
    "date",
    "startTime",
    "endTime",
    "totalHours",
    "normalHours",
    "extraHours",
    "nightHours",
    "amount",
    "dayTypeLabel",
];

/// Column order of the annual summary export.
pub const SUMMARY_CSV_HEADER: [&str; 7] = [
    "month",
    "daysWorked",
    "totalHours",
    "extraHours",
    "nightHours",
    "amount",
    "avgPerDay",
];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Formats a value with exactly two decimals, rounding half away from zero.
pub fn format_amount(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

/// Formats a clock time as `HH:MM`, or `HH:MM:SS` when it has seconds.
///
/// A missing time renders as an empty field.
fn format_clock(time: Option<NaiveTime>) -> String {
    match time {
        Some(t) if t.second() != 0 => t.format("%H:%M:%S").to_string(),
        Some(t) => t.format("%H:%M").to_string(),
        None => String::new(),
    }
}

fn export_error(e: impl std::fmt::Display) -> EngineError {
    EngineError::ExportError {
        message: e.to_string(),
    }
}

fn write_rows<const N: usize>(header: [&str; N], rows: Vec<[String; N]>) -> EngineResult<String> {
    let mut output = header.join(",");
    output.push('\n');

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    for row in &rows {
        writer.write_record(row).map_err(export_error)?;
    }

    let bytes = writer.into_inner().map_err(export_error)?;
    output.push_str(&String::from_utf8(bytes).map_err(export_error)?);
    Ok(output)
}

/// Renders records as CSV in the order given.
///
/// # Example
///
/// ```
/// use overtime_engine::export::records_to_csv;
/// use overtime_engine::models::{HolidaySet, TimeRecord};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let record = TimeRecord::new(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap())
///     .with_hours(Decimal::new(95, 1), Decimal::new(15, 1), Decimal::ZERO)
///     .with_amount(Decimal::new(3050, 2));
///
/// let csv = records_to_csv(&[record], &HolidaySet::default()).unwrap();
/// let lines: Vec<&str> = csv.lines().collect();
/// assert_eq!(lines[1], r#""2024-01-08","","","9.50","8.00","1.50","0.00","30.50","Weekday""#);
/// ```
pub fn records_to_csv(records: &[TimeRecord], holidays: &HolidaySet) -> EngineResult<String> {
    let rows = records
        .iter()
        .map(|record| {
            [
                record.date_key(),
                format_clock(record.start_time),
                format_clock(record.end_time),
                format_amount(record.total_hours),
                format_amount(record.normal_hours()),
                format_amount(record.extra_hours),
                format_amount(record.night_hours),
                format_amount(record.amount),
                record.day_type(holidays).to_string(),
            ]
        })
        .collect();

    write_rows(RECORD_CSV_HEADER, rows)
}

/// Renders an annual report as one CSV row per month.
pub fn annual_summary_csv(report: &AnnualReport) -> EngineResult<String> {
    let rows = report
        .months
        .iter()
        .zip(MONTH_NAMES)
        .map(|(month, name)| {
            [
                name.to_string(),
                month.days_worked.to_string(),
                format_amount(month.total_hours),
                format_amount(month.extra_hours),
                format_amount(month.night_hours),
                format_amount(month.amount),
                format_amount(month.avg_amount_per_day),
            ]
        })
        .collect();

    write_rows(SUMMARY_CSV_HEADER, rows)
}
