//! Employee summary report.
//!
//! One row per employee with their lunch and dinner tips and hours for the
//! week, closed by a `TOTAL` row.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::models::{DayPoolDistribution, EmployeeSummaryRow, Pool, PoolHours};

/// Employee name used on the closing row.
pub const TOTAL_ROW_LABEL: &str = "TOTAL";

/// Decimal places kept before truncating minutes, so that thirds of an hour
/// don't display a minute short.
const MINUTE_PRECISION: u32 = 6;

/// Builds the per-employee report from distributed buckets and the week's hours.
///
/// Every employee with a time entry gets a row, even if they earned nothing.
/// Hours cover every shift in the week, including days with no tips.
pub fn summarize_employees(
    buckets: &[DayPoolDistribution],
    pool_hours: &PoolHours,
) -> Vec<EmployeeSummaryRow> {
    let lunch_hours = pool_hours.lunch.totals_by_employee();
    let dinner_hours = pool_hours.dinner.totals_by_employee();
    let employees: BTreeSet<&String> = lunch_hours.keys().chain(dinner_hours.keys()).collect();

    let mut rows: Vec<EmployeeSummaryRow> = employees
        .into_iter()
        .map(|employee| {
            let lunch_tips = tips_for(buckets, employee, Pool::Lunch);
            let dinner_tips = tips_for(buckets, employee, Pool::Dinner);
            let lunch = lunch_hours.get(employee).copied().unwrap_or(Decimal::ZERO);
            let dinner = dinner_hours.get(employee).copied().unwrap_or(Decimal::ZERO);
            EmployeeSummaryRow {
                employee: employee.clone(),
                lunch_tips,
                lunch_hours: lunch,
                lunch_hours_display: format_hours(lunch),
                dinner_tips,
                dinner_hours: dinner,
                dinner_hours_display: format_hours(dinner),
                total_tips: lunch_tips + dinner_tips,
            }
        })
        .collect();

    let total = EmployeeSummaryRow {
        employee: TOTAL_ROW_LABEL.to_string(),
        lunch_tips: rows.iter().map(|r| r.lunch_tips).sum(),
        lunch_hours: rows.iter().map(|r| r.lunch_hours).sum(),
        lunch_hours_display: String::new(),
        dinner_tips: rows.iter().map(|r| r.dinner_tips).sum(),
        dinner_hours: rows.iter().map(|r| r.dinner_hours).sum(),
        dinner_hours_display: String::new(),
        total_tips: rows.iter().map(|r| r.total_tips).sum(),
    };
    rows.push(total);
    rows
}

fn tips_for(buckets: &[DayPoolDistribution], employee: &str, pool: Pool) -> Decimal {
    buckets
        .iter()
        .filter(|bucket| bucket.pool == pool)
        .filter_map(|bucket| bucket.cuts.get(employee))
        .copied()
        .sum()
}

/// Renders decimal hours as `HH:MM`, truncating partial minutes.
///
/// # Example
///
/// ```
/// use tip_pool_engine::calculation::format_hours;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_hours(Decimal::new(475, 2)), "04:45");
/// assert_eq!(format_hours(Decimal::ZERO), "00:00");
/// ```
pub fn format_hours(hours: Decimal) -> String {
    let minutes = (hours * Decimal::from(60))
        .round_dp(MINUTE_PRECISION)
        .trunc()
        .to_i64()
        .unwrap_or(0);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
