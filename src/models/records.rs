//! Order and time-entry records.
//!
//! Records are read from a [`Table`] in one pass after every required column
//! has been located. Timestamps stay as text here; they are parsed with the
//! run's configured formats during aggregation.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::Table;

/// Table name used in errors raised while reading orders.
pub const ORDERS_TABLE: &str = "orders";

/// Table name used in errors raised while reading time entries.
pub const TIME_ENTRIES_TABLE: &str = "time entries";

/// Column holding the time an order was opened.
pub const OPENED_COLUMN: &str = "Opened";
/// Column holding the tip on an order.
pub const TIP_COLUMN: &str = "Tip";
/// Column holding the auto-gratuity on an order.
pub const GRATUITY_COLUMN: &str = "Gratuity";

/// Column holding the employee name on a time entry.
pub const EMPLOYEE_COLUMN: &str = "Employee";
/// Column holding the employee's job title on a time entry.
pub const JOB_TITLE_COLUMN: &str = "Job Title";
/// Column holding the clock-in time.
pub const IN_DATE_COLUMN: &str = "In Date";
/// Column holding the clock-out time.
pub const OUT_DATE_COLUMN: &str = "Out Date";

/// One closed sales order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// When the order was opened, as exported.
    pub opened: String,
    /// Tip left on the order.
    pub tip: Decimal,
    /// Gratuity added to the order.
    pub gratuity: Decimal,
}

impl OrderRecord {
    /// The amount this order contributes to its pool.
    pub fn pooled_amount(&self) -> EngineResult<Decimal> {
        self.tip
            .checked_add(self.gratuity)
            .ok_or_else(|| EngineError::AmountOverflow {
                context: format!("tip and gratuity of the order opened {}", self.opened),
            })
    }

    /// Reads every order from a table.
    ///
    /// Blank `Tip` or `Gratuity` cells count as zero. Anything else that is
    /// not a number fails the whole read with `InvalidAmount`, as does a
    /// tip and gratuity pair too large to add together.
    pub fn from_table(table: &Table) -> EngineResult<Vec<Self>> {
        let columns = table.require_columns(
            ORDERS_TABLE,
            &[OPENED_COLUMN, TIP_COLUMN, GRATUITY_COLUMN],
        )?;
        let (opened, tip, gratuity) = (columns[0], columns[1], columns[2]);

        (0..table.len())
            .map(|row| {
                let record = Self {
                    opened: table.cell(row, opened).to_string(),
                    tip: parse_amount(table, row, tip, TIP_COLUMN)?,
                    gratuity: parse_amount(table, row, gratuity, GRATUITY_COLUMN)?,
                };
                record
                    .pooled_amount()
                    .map_err(|_| invalid_amount(table, row, gratuity, GRATUITY_COLUMN))?;
                Ok(record)
            })
            .collect()
    }
}

fn parse_amount(table: &Table, row: usize, column: usize, name: &str) -> EngineResult<Decimal> {
    let text = table.cell(row, column);
    if text.is_empty() {
        return Ok(Decimal::ZERO);
    }
    Decimal::from_str(text).map_err(|_| invalid_amount(table, row, column, name))
}

fn invalid_amount(table: &Table, row: usize, column: usize, name: &str) -> EngineError {
    EngineError::InvalidAmount {
        table: ORDERS_TABLE.to_string(),
        row: row + 1,
        column: name.to_string(),
        value: table.cell(row, column).to_string(),
    }
}

/// One clocked shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntryRecord {
    /// The employee who worked the shift.
    pub employee: String,
    /// The job title worked, used as the role for point lookup.
    pub job_title: String,
    /// Clock-in time, as exported.
    pub in_date: String,
    /// Clock-out time, as exported.
    pub out_date: String,
}

impl TimeEntryRecord {
    /// Reads every time entry from a table.
    ///
    /// Employee names and job titles are trimmed. A blank employee name is
    /// an `InvalidTimeEntry`; a blank job title is kept and treated as "no
    /// role" by the role lookup.
    pub fn from_table(table: &Table) -> EngineResult<Vec<Self>> {
        let columns = table.require_columns(
            TIME_ENTRIES_TABLE,
            &[
                EMPLOYEE_COLUMN,
                JOB_TITLE_COLUMN,
                IN_DATE_COLUMN,
                OUT_DATE_COLUMN,
            ],
        )?;
        let (employee, job_title, in_date, out_date) =
            (columns[0], columns[1], columns[2], columns[3]);

        (0..table.len())
            .map(|row| {
                let name = table.cell(row, employee);
                if name.is_empty() {
                    return Err(EngineError::InvalidTimeEntry {
                        row: row + 1,
                        message: "employee name is blank".to_string(),
                    });
                }
                Ok(Self {
                    employee: name.to_string(),
                    job_title: table.cell(row, job_title).to_string(),
                    in_date: table.cell(row, in_date).to_string(),
                    out_date: table.cell(row, out_date).to_string(),
                })
            })
            .collect()
    }
}
