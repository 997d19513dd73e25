//! Calculation logic for the Tip Pool Engine.
//!
//! This module contains timestamp parsing, lunch/dinner pool detection,
//! order and time-entry aggregation, employee role lookup, per-bucket and
//! weekly distribution, the employee summary report, and the weekly run
//! that ties them together.

mod distribution;
mod employee_summary;
mod order_aggregation;
mod pool_detection;
mod role_lookup;
mod time_aggregation;
mod timestamp;
mod weekly_run;

pub use distribution::{
    DayPoolResult, UNDISTRIBUTED_POOL_WARNING, WeeklyDistribution, distribute_day_pool,
    distribute_week,
};
pub use employee_summary::{TOTAL_ROW_LABEL, format_hours, summarize_employees};
pub use order_aggregation::{aggregate_order_records, aggregate_orders};
pub use pool_detection::{
    DINNER_START_HOUR, LUNCH_START_HOUR, PoolHoursSplit, classify_instant, split_hours,
    split_interval,
};
pub use role_lookup::EmployeeRoles;
pub use time_aggregation::{aggregate_time_entries, aggregate_time_entry_records};
pub use timestamp::TimestampParser;
pub use weekly_run::calculate_weekly_distribution;
