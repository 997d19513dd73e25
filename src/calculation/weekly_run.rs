//! Weekly distribution run.
//!
//! This module provides the [`calculate_weekly_distribution`] function which
//! orchestrates a full run: it reads both tables, aggregates tips and hours,
//! resolves roles, distributes every bucket and assembles the result with
//! its audit trace.

use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditTrace, DistributionResult, DistributionTotals, OrderRecord, PoolHours, Table,
    TimeEntryRecord, TipPoolTable,
};

use super::{
    EmployeeRoles, TimestampParser, aggregate_order_records, aggregate_time_entry_records,
    distribute_week, summarize_employees,
};

/// Runs a complete weekly tip distribution.
///
/// Both tables are validated before any aggregation starts. Any failure
/// aborts the run; no partial result is ever returned.
///
/// # Arguments
///
/// * `orders` - The orders export (`Opened`, `Tip`, `Gratuity`)
/// * `time_entries` - The time clock export (`Employee`, `Job Title`, `In Date`, `Out Date`)
/// * `point_system` - Name of the point system to use; `None` selects the default
/// * `config` - The loaded engine configuration
///
/// # Example
///
/// ```
/// use tip_pool_engine::calculation::calculate_weekly_distribution;
/// use tip_pool_engine::config::ConfigLoader;
/// use tip_pool_engine::models::Table;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let orders = Table::new(
///     vec!["Opened", "Tip", "Gratuity"],
///     vec![vec!["01/10/2024 12:30", "100", "20"]],
/// );
/// let time_entries = Table::new(
///     vec!["Employee", "Job Title", "In Date", "Out Date"],
///     vec![vec!["Alice", "Server", "01/10/2024 11:00", "01/10/2024 15:00"]],
/// );
///
/// let result = calculate_weekly_distribution(
///     &orders,
///     &time_entries,
///     None,
///     &ConfigLoader::builtin(),
/// )
/// .unwrap();
///
/// assert_eq!(result.point_system, "standard");
/// assert_eq!(result.weekly_cuts["Alice"], Decimal::from_str("115.8").unwrap());
/// ```
pub fn calculate_weekly_distribution(
    orders: &Table,
    time_entries: &Table,
    point_system: Option<&str>,
    config: &ConfigLoader,
) -> EngineResult<DistributionResult> {
    let start_time = Instant::now();
    let settings = config.settings();
    let point_system = config.select_point_system(point_system)?;
    let parser = TimestampParser::from_settings(settings);
    let fee_rate = settings.processing_fee_rate;

    let order_records = OrderRecord::from_table(orders)?;
    let time_entry_records = TimeEntryRecord::from_table(time_entries)?;

    let mut steps: Vec<AuditStep> = Vec::new();

    let tip_pools = aggregate_order_records(&order_records, &parser)?;
    let gross_collected = checked_total(tip_pools.values().copied(), "gross collected")?;
    steps.push(order_aggregation_step(
        1,
        order_records.len(),
        &tip_pools,
        gross_collected,
    ));

    let pool_hours = aggregate_time_entry_records(&time_entry_records, &parser)?;
    steps.push(time_aggregation_step(2, time_entry_records.len(), &pool_hours));

    let roles = EmployeeRoles::from_time_entries(&time_entry_records)?;
    ensure_workers_have_roles(&pool_hours, &roles)?;
    steps.push(role_lookup_step(3, &roles));

    let week = distribute_week(&tip_pools, &pool_hours, point_system, &roles, fee_rate, 4)?;

    let net_pool = checked_total(week.buckets.iter().map(|b| b.net_pool), "net pool")?;
    let distributed = checked_total(week.weekly_cuts.values().copied(), "distributed tips")?;
    let undistributed =
        checked_total(week.buckets.iter().map(|b| b.undistributed), "undistributed tips")?;
    let totals = DistributionTotals {
        gross_collected,
        processing_fees: gross_collected - net_pool,
        net_pool,
        distributed,
        undistributed,
    };

    // Every per-employee figure is bounded by the checked totals above.
    let employee_summary = summarize_employees(&week.buckets, &pool_hours);

    steps.extend(week.audit_steps);
    let totals_step_number = u32::try_from(steps.len()).unwrap_or(u32::MAX).saturating_add(1);
    steps.push(weekly_totals_step(totals_step_number, &totals, week.weekly_cuts.len()));

    let duration_us = u64::try_from(start_time.elapsed().as_micros()).unwrap_or(u64::MAX);

    debug!(
        point_system = %point_system.name,
        buckets = week.buckets.len(),
        employees = week.weekly_cuts.len(),
        distributed = %totals.distributed.normalize(),
        duration_us,
        "Weekly distribution complete"
    );

    Ok(DistributionResult {
        run_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        point_system: point_system.name.clone(),
        processing_fee_rate: fee_rate,
        buckets: week.buckets,
        weekly_cuts: week.weekly_cuts,
        employee_summary,
        totals,
        audit_trace: AuditTrace {
            steps,
            warnings: week.warnings,
            duration_us,
        },
    })
}

fn checked_total(
    amounts: impl IntoIterator<Item = Decimal>,
    context: &str,
) -> EngineResult<Decimal> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |total, amount| total.checked_add(amount))
        .ok_or_else(|| EngineError::AmountOverflow {
            context: context.to_string(),
        })
}

/// Every employee with positive hours must have a role, whether or not
/// their buckets collected tips.
fn ensure_workers_have_roles(pool_hours: &PoolHours, roles: &EmployeeRoles) -> EngineResult<()> {
    let lunch = pool_hours.lunch.totals_by_employee();
    let dinner = pool_hours.dinner.totals_by_employee();
    for (employee, hours) in lunch.iter().chain(dinner.iter()) {
        if *hours > Decimal::ZERO {
            roles.role_of(employee)?;
        }
    }
    Ok(())
}

fn order_aggregation_step(
    step_number: u32,
    order_count: usize,
    tip_pools: &TipPoolTable,
    gross: Decimal,
) -> AuditStep {
    AuditStep {
        step_number,
        rule_id: "order_aggregation".to_string(),
        rule_name: "Order Aggregation".to_string(),
        input: serde_json::json!({ "orders": order_count }),
        output: serde_json::json!({
            "buckets": tip_pools
                .iter()
                .map(|(key, amount)| (key.to_string(), amount.normalize().to_string()))
                .collect::<std::collections::BTreeMap<_, _>>(),
            "gross_collected": gross.normalize().to_string()
        }),
        reasoning: format!(
            "{} orders aggregated into {} day/pool buckets totalling {}",
            order_count,
            tip_pools.len(),
            gross.normalize()
        ),
    }
}

fn time_aggregation_step(step_number: u32, entry_count: usize, pool_hours: &PoolHours) -> AuditStep {
    let lunch: Decimal = pool_hours.lunch.totals_by_employee().values().copied().sum();
    let dinner: Decimal = pool_hours.dinner.totals_by_employee().values().copied().sum();
    AuditStep {
        step_number,
        rule_id: "time_aggregation".to_string(),
        rule_name: "Time Aggregation".to_string(),
        input: serde_json::json!({ "time_entries": entry_count }),
        output: serde_json::json!({
            "lunch_hours": lunch.normalize().to_string(),
            "dinner_hours": dinner.normalize().to_string()
        }),
        reasoning: format!(
            "{} time entries split into {} lunch hours and {} dinner hours",
            entry_count,
            lunch.round_dp(2).normalize(),
            dinner.round_dp(2).normalize()
        ),
    }
}

fn role_lookup_step(step_number: u32, roles: &EmployeeRoles) -> AuditStep {
    AuditStep {
        step_number,
        rule_id: "role_lookup".to_string(),
        rule_name: "Employee Role Lookup".to_string(),
        input: serde_json::json!({ "employees": roles.len() }),
        output: serde_json::json!(
            roles
                .iter()
                .map(|(employee, role)| (employee.to_string(), role.to_string()))
                .collect::<std::collections::BTreeMap<_, _>>()
        ),
        reasoning: format!("Resolved a single job title for {} employees", roles.len()),
    }
}

fn weekly_totals_step(step_number: u32, totals: &DistributionTotals, employees: usize) -> AuditStep {
    AuditStep {
        step_number,
        rule_id: "weekly_totals".to_string(),
        rule_name: "Weekly Totals".to_string(),
        input: serde_json::json!({ "employees": employees }),
        output: serde_json::json!({
            "gross_collected": totals.gross_collected.normalize().to_string(),
            "processing_fees": totals.processing_fees.normalize().to_string(),
            "net_pool": totals.net_pool.normalize().to_string(),
            "distributed": totals.distributed.normalize().to_string(),
            "undistributed": totals.undistributed.normalize().to_string()
        }),
        reasoning: format!(
            "Collected {}, withheld {} in fees, paid {} to {} employees",
            totals.gross_collected.normalize(),
            totals.processing_fees.normalize(),
            totals.distributed.round_dp(2).normalize(),
            employees
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn orders(rows: Vec<Vec<&str>>) -> Table {
        Table::new(vec!["Opened", "Tip", "Gratuity"], rows)
    }

    fn time_entries(rows: Vec<Vec<&str>>) -> Table {
        Table::new(vec!["Employee", "Job Title", "In Date", "Out Date"], rows)
    }

    fn run(orders: &Table, entries: &Table, system: Option<&str>) -> EngineResult<DistributionResult> {
        calculate_weekly_distribution(orders, entries, system, &ConfigLoader::builtin())
    }

    #[test]
    fn test_single_employee_end_to_end() {
        let result = run(
            &orders(vec![vec!["01/10/2024 12:30", "100", "20"]]),
            &time_entries(vec![vec![
                "Alice",
                "Server",
                "01/10/2024 11:00",
                "01/10/2024 15:00",
            ]]),
            None,
        )
        .unwrap();

        assert_eq!(result.buckets.len(), 1);
        assert_eq!(result.buckets[0].value_per_point, dec("28.95"));
        assert_eq!(result.weekly_cuts["Alice"], dec("115.8"));
        assert_eq!(result.totals.gross_collected, dec("120"));
        assert_eq!(result.totals.processing_fees, dec("4.2"));
        assert_eq!(result.totals.undistributed, Decimal::ZERO);
        assert_eq!(result.weekly_tip_rows()[0].weekly_tips, dec("115.80"));
    }

    #[test]
    fn test_audit_steps_are_sequential() {
        let result = run(
            &orders(vec![
                vec!["01/10/2024 12:30", "10", "0"],
                vec!["01/10/2024 19:30", "10", "0"],
            ]),
            &time_entries(vec![vec![
                "Alice",
                "Server",
                "01/10/2024 11:00",
                "01/10/2024 21:00",
            ]]),
            None,
        )
        .unwrap();

        let steps = &result.audit_trace.steps;
        let rule_ids: Vec<&str> = steps.iter().map(|s| s.rule_id.as_str()).collect();
        assert_eq!(
            rule_ids,
            vec![
                "order_aggregation",
                "time_aggregation",
                "role_lookup",
                "day_pool_distribution",
                "day_pool_distribution",
                "weekly_totals"
            ]
        );
        for (index, step) in steps.iter().enumerate() {
            assert_eq!(step.step_number as usize, index + 1);
        }
    }

    #[test]
    fn test_tips_with_nobody_working_are_flagged() {
        let result = run(
            &orders(vec![vec!["01/10/2024 08:00", "40", "0"]]),
            &time_entries(vec![vec![
                "Alice",
                "Server",
                "01/10/2024 18:00",
                "01/10/2024 22:00",
            ]]),
            None,
        )
        .unwrap();

        assert!(result.weekly_cuts.is_empty());
        assert_eq!(result.totals.undistributed, dec("38.6"));
        assert_eq!(result.audit_trace.warnings.len(), 1);
        assert_eq!(result.audit_trace.warnings[0].code, "UNDISTRIBUTED_POOL");
    }

    #[test]
    fn test_flat_point_system_by_name() {
        let config = ConfigLoader::load("./config/tip_pool").unwrap();
        let result = calculate_weekly_distribution(
            &orders(vec![vec!["01/10/2024 12:00", "100", "0"]]),
            &time_entries(vec![
                vec!["Al", "Head Bartender", "01/10/2024 10:00", "01/10/2024 14:00"],
                vec!["Bo", "Busser", "01/10/2024 10:00", "01/10/2024 14:00"],
            ]),
            Some("flat"),
            &config,
        )
        .unwrap();

        assert_eq!(result.point_system, "flat");
        assert_eq!(result.weekly_cuts["Al"], result.weekly_cuts["Bo"]);
        assert_eq!(result.weekly_cuts["Al"], dec("48.25"));
    }

    #[test]
    fn test_unknown_point_system_is_error() {
        let result = run(&orders(vec![]), &time_entries(vec![]), Some("nope"));
        assert!(matches!(result, Err(EngineError::PointSystemNotFound { .. })));
    }

    #[test]
    fn test_worker_without_role_fails_even_without_tips() {
        let result = run(
            &orders(vec![]),
            &time_entries(vec![vec!["Dana", "", "01/10/2024 11:00", "01/10/2024 15:00"]]),
            None,
        );
        match result {
            Err(EngineError::UnresolvedEmployeeRole { employee }) => assert_eq!(employee, "Dana"),
            other => panic!("Expected UnresolvedEmployeeRole, got {:?}", other),
        }
    }

    #[test]
    fn test_week_gross_too_large_is_error_not_panic() {
        let result = run(
            &orders(vec![
                vec!["01/10/2024 12:30", "79228162514264337593543950335", "0"],
                vec!["01/10/2024 19:30", "79228162514264337593543950335", "0"],
            ]),
            &time_entries(vec![]),
            None,
        );
        match result {
            Err(EngineError::AmountOverflow { context }) => {
                assert_eq!(context, "gross collected");
            }
            other => panic!("Expected AmountOverflow, got {:?}", other),
        }
    }

    #[test]
    fn test_time_entry_columns_checked_before_orders_are_aggregated() {
        // The bad order timestamp is never reached.
        let bad_entries = Table::new(vec!["Employee"], vec![vec!["Alice"]]);
        let result = run(
            &orders(vec![vec!["not a time", "1", "0"]]),
            &bad_entries,
            None,
        );
        assert!(matches!(result, Err(EngineError::MissingColumn { .. })));
    }

    #[test]
    fn test_summary_ends_with_total_row() {
        let result = run(
            &orders(vec![vec!["01/10/2024 12:30", "100", "20"]]),
            &time_entries(vec![vec![
                "Alice",
                "Server",
                "01/10/2024 11:00",
                "01/10/2024 15:00",
            ]]),
            None,
        )
        .unwrap();

        let last = result.employee_summary.last().unwrap();
        assert_eq!(last.employee, "TOTAL");
        assert_eq!(last.total_tips, dec("115.8"));
    }
}
