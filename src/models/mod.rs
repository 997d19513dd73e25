//! Core data models for the Tip Pool Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod distribution_result;
mod pool;
mod records;
mod table;
mod tables;

pub use distribution_result::{
    AuditStep, AuditTrace, AuditWarning, DayPoolDistribution, DistributionResult,
    DistributionTotals, EmployeeSummaryRow, WeeklyTipRow,
};
pub use pool::{DayPoolKey, Pool};
pub use records::{
    EMPLOYEE_COLUMN, GRATUITY_COLUMN, IN_DATE_COLUMN, JOB_TITLE_COLUMN, OPENED_COLUMN,
    ORDERS_TABLE, OUT_DATE_COLUMN, OrderRecord, TIME_ENTRIES_TABLE, TIP_COLUMN, TimeEntryRecord,
};
pub use table::Table;
pub use tables::{EmployeeWeeklyCuts, HoursTable, PoolHours, TipPoolTable};
