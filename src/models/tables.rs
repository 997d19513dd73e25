//! Aggregate tables built and consumed by the engine.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{DayPoolKey, Pool};

/// Gross tip + gratuity per day/pool bucket, before the processing fee.
///
/// Buckets with no orders are absent rather than zero.
pub type TipPoolTable = BTreeMap<DayPoolKey, Decimal>;

/// Total owed to each employee for the week.
pub type EmployeeWeeklyCuts = BTreeMap<String, Decimal>;

/// Hours worked per (date, employee) within a single pool.
///
/// # Example
///
/// ```
/// use tip_pool_engine::models::HoursTable;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
/// let mut table = HoursTable::default();
/// table.add(date, "Alice", Decimal::new(3, 0));
/// table.add(date, "Alice", Decimal::new(2, 0));
/// assert_eq!(table.hours(date, "Alice"), Decimal::new(5, 0));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoursTable {
    by_date: BTreeMap<NaiveDate, BTreeMap<String, Decimal>>,
}

impl HoursTable {
    /// Adds hours for an employee on a date. Repeated shifts accumulate.
    pub fn add(&mut self, date: NaiveDate, employee: &str, hours: Decimal) {
        *self
            .by_date
            .entry(date)
            .or_default()
            .entry(employee.to_string())
            .or_insert(Decimal::ZERO) += hours;
    }

    /// Hours for an employee on a date; zero when absent.
    pub fn hours(&self, date: NaiveDate, employee: &str) -> Decimal {
        self.by_date
            .get(&date)
            .and_then(|employees| employees.get(employee))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Every (employee, hours) recorded on a date, ordered by employee.
    pub fn on_date(&self, date: NaiveDate) -> impl Iterator<Item = (&str, Decimal)> {
        self.by_date
            .get(&date)
            .into_iter()
            .flat_map(|employees| employees.iter().map(|(e, h)| (e.as_str(), *h)))
    }

    /// Total hours per employee across every date.
    pub fn totals_by_employee(&self) -> BTreeMap<String, Decimal> {
        let mut totals = BTreeMap::new();
        for employees in self.by_date.values() {
            for (employee, hours) in employees {
                *totals.entry(employee.clone()).or_insert(Decimal::ZERO) += *hours;
            }
        }
        totals
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }
}

/// The lunch and dinner hours tables produced from one set of time entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoolHours {
    /// Hours worked between 06:00 and 17:00.
    pub lunch: HoursTable,
    /// Hours worked between 17:00 and 06:00.
    pub dinner: HoursTable,
}

impl PoolHours {
    /// The hours table for a pool.
    pub fn for_pool(&self, pool: Pool) -> &HoursTable {
        match pool {
            Pool::Lunch => &self.lunch,
            Pool::Dinner => &self.dinner,
        }
    }
}
