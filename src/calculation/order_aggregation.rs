//! Order aggregation.
//!
//! Sums tip and gratuity per (date, pool) bucket, keyed on the time each
//! order was opened.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{DayPoolKey, OrderRecord, Table, TipPoolTable};

use super::{TimestampParser, classify_instant};

/// Aggregates an orders table into gross tip pools.
///
/// Column validation happens before any row is read, so a missing `Opened`,
/// `Tip` or `Gratuity` column fails even for an empty table.
///
/// # Example
///
/// ```
/// use tip_pool_engine::calculation::{aggregate_orders, TimestampParser};
/// use tip_pool_engine::models::{DayPoolKey, Pool, Table};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let orders = Table::new(
///     vec!["Opened", "Tip", "Gratuity"],
///     vec![
///         vec!["01/10/2024 12:30", "100", "20"],
///         vec!["01/10/2024 19:00", "40", ""],
///     ],
/// );
/// let pools = aggregate_orders(&orders, &TimestampParser::default()).unwrap();
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
/// assert_eq!(pools[&DayPoolKey::new(date, Pool::Lunch)], Decimal::from(120));
/// assert_eq!(pools[&DayPoolKey::new(date, Pool::Dinner)], Decimal::from(40));
/// ```
pub fn aggregate_orders(table: &Table, parser: &TimestampParser) -> EngineResult<TipPoolTable> {
    let records = OrderRecord::from_table(table)?;
    aggregate_order_records(&records, parser)
}

/// Aggregates already-read order records into gross tip pools.
pub fn aggregate_order_records(
    records: &[OrderRecord],
    parser: &TimestampParser,
) -> EngineResult<TipPoolTable> {
    let mut pools = TipPoolTable::new();
    for record in records {
        let opened = parser.parse(&record.opened)?;
        let key = DayPoolKey::new(opened.date(), classify_instant(opened));
        let amount = record.pooled_amount()?;
        let gross = pools.entry(key).or_insert(Decimal::ZERO);
        *gross = gross
            .checked_add(amount)
            .ok_or_else(|| EngineError::AmountOverflow {
                context: format!("the {} pool", key),
            })?;
    }
    Ok(pools)
}
