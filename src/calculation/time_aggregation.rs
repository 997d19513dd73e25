//! Time-entry aggregation.
//!
//! Builds the lunch and dinner hours tables from clocked shifts. Every shift
//! is credited to its clock-in date, including the part worked after
//! midnight.

use crate::error::EngineResult;
use crate::models::{PoolHours, Table, TimeEntryRecord};

use super::{TimestampParser, split_hours};

/// Aggregates a time-entries table into per-pool hours.
///
/// # Example
///
/// ```
/// use tip_pool_engine::calculation::{aggregate_time_entries, TimestampParser};
/// use tip_pool_engine::models::Table;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let entries = Table::new(
///     vec!["Employee", "Job Title", "In Date", "Out Date"],
///     vec![vec!["Alice", "Server", "01/10/2024 15:00", "01/10/2024 20:00"]],
/// );
/// let hours = aggregate_time_entries(&entries, &TimestampParser::default()).unwrap();
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
/// assert_eq!(hours.lunch.hours(date, "Alice"), Decimal::from(2));
/// assert_eq!(hours.dinner.hours(date, "Alice"), Decimal::from(3));
/// ```
pub fn aggregate_time_entries(table: &Table, parser: &TimestampParser) -> EngineResult<PoolHours> {
    let records = TimeEntryRecord::from_table(table)?;
    aggregate_time_entry_records(&records, parser)
}

/// Aggregates already-read time entries into per-pool hours.
///
/// Repeated shifts by the same employee on the same date add up.
pub fn aggregate_time_entry_records(
    records: &[TimeEntryRecord],
    parser: &TimestampParser,
) -> EngineResult<PoolHours> {
    let mut hours = PoolHours::default();
    for record in records {
        let date = parser.parse(&record.in_date)?.date();
        let split = split_hours(&record.in_date, &record.out_date, parser)?;
        hours.lunch.add(date, &record.employee, split.lunch_hours);
        hours.dinner.add(date, &record.employee, split.dinner_hours);
    }
    Ok(hours)
}
