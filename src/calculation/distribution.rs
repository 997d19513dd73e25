//! Tip distribution.
//!
//! Each (date, pool) bucket is shared out on its own: the processing fee is
//! taken off the gross, and what remains is split in proportion to
//! hours × role weight among the employees who worked that pool that day.
//! Bucket cuts are then summed into weekly totals.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::PointSystem;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditWarning, DayPoolDistribution, DayPoolKey, EmployeeWeeklyCuts, HoursTable,
    PoolHours, TipPoolTable,
};

use super::EmployeeRoles;

/// Warning code raised when a bucket's money has nobody to go to.
pub const UNDISTRIBUTED_POOL_WARNING: &str = "UNDISTRIBUTED_POOL";

/// The outcome of distributing one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPoolResult {
    /// How the bucket was shared out.
    pub distribution: DayPoolDistribution,
    /// The audit step recording the distribution.
    pub audit_step: AuditStep,
    /// Set when the bucket had money but no weighted hours.
    pub warning: Option<AuditWarning>,
}

/// Distributes a single day/pool bucket.
///
/// # Arguments
///
/// * `key` - The bucket being distributed
/// * `gross` - Tips and gratuities collected in the bucket
/// * `hours` - The hours table for the bucket's pool
/// * `point_system` - Role weights
/// * `roles` - Job title per employee
/// * `fee_rate` - Fraction of the gross withheld for card processing
/// * `step_number` - The step number for audit trail sequencing
///
/// # Errors
///
/// `UnresolvedEmployeeRole` if someone worked the bucket without a job title.
///
/// # Example
///
/// ```
/// use tip_pool_engine::calculation::{distribute_day_pool, EmployeeRoles};
/// use tip_pool_engine::config::{PointSystem, DEFAULT_PROCESSING_FEE_RATE};
/// use tip_pool_engine::models::{DayPoolKey, HoursTable, Pool, TimeEntryRecord};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
/// let mut hours = HoursTable::default();
/// hours.add(date, "Alice", Decimal::from(4));
/// let roles = EmployeeRoles::from_time_entries(&[TimeEntryRecord {
///     employee: "Alice".to_string(),
///     job_title: "Server".to_string(),
///     in_date: "01/10/2024 11:00".to_string(),
///     out_date: "01/10/2024 15:00".to_string(),
/// }])
/// .unwrap();
///
/// let result = distribute_day_pool(
///     DayPoolKey::new(date, Pool::Lunch),
///     Decimal::from(120),
///     &hours,
///     &PointSystem::standard(),
///     &roles,
///     DEFAULT_PROCESSING_FEE_RATE,
///     1,
/// )
/// .unwrap();
///
/// assert_eq!(result.distribution.value_per_point, Decimal::from_str("28.95").unwrap());
/// assert_eq!(result.distribution.cuts["Alice"], Decimal::from_str("115.8").unwrap());
/// ```
pub fn distribute_day_pool(
    key: DayPoolKey,
    gross: Decimal,
    hours: &HoursTable,
    point_system: &PointSystem,
    roles: &EmployeeRoles,
    fee_rate: Decimal,
    step_number: u32,
) -> EngineResult<DayPoolResult> {
    let overflow = |what: &str| EngineError::AmountOverflow {
        context: format!("{} of the {} pool", what, key),
    };

    let net_pool = gross
        .checked_mul(Decimal::ONE - fee_rate)
        .ok_or_else(|| overflow("net pool"))?;

    let mut contributions: Vec<(&str, Decimal, Decimal)> = Vec::new();
    for (employee, worked) in hours.on_date(key.date).filter(|(_, h)| *h > Decimal::ZERO) {
        let weight = roles.weight_of(employee, point_system)?;
        contributions.push((employee, worked, weight));
    }

    let total_weighted_contribution = contributions
        .iter()
        .try_fold(Decimal::ZERO, |total, (_, worked, weight)| {
            worked
                .checked_mul(*weight)
                .and_then(|points| total.checked_add(points))
        })
        .ok_or_else(|| overflow("weighted hours"))?;

    let value_per_point = if total_weighted_contribution.is_zero() {
        Decimal::ZERO
    } else {
        net_pool
            .checked_div(total_weighted_contribution)
            .ok_or_else(|| overflow("value per point"))?
    };

    let cuts = contributions
        .iter()
        .map(|(employee, worked, weight)| {
            worked
                .checked_mul(*weight)
                .and_then(|points| points.checked_mul(value_per_point))
                .map(|cut| (employee.to_string(), cut))
                .ok_or_else(|| overflow(&format!("cut for {}", employee)))
        })
        .collect::<EngineResult<BTreeMap<String, Decimal>>>()?;

    let undistributed = if total_weighted_contribution.is_zero() {
        net_pool
    } else {
        Decimal::ZERO
    };

    let warning = (undistributed > Decimal::ZERO).then(|| {
        warn!(
            date = %key.date,
            pool = %key.pool,
            net_pool = %net_pool.normalize(),
            "Bucket has tips but no weighted hours; pool left undistributed"
        );
        AuditWarning {
            code: UNDISTRIBUTED_POOL_WARNING.to_string(),
            message: format!(
                "{} collected {} net but nobody with a positive weight worked it",
                key,
                net_pool.normalize()
            ),
            severity: "medium".to_string(),
        }
    });

    let reasoning = if total_weighted_contribution.is_zero() {
        format!(
            "{}: net pool {} has no weighted hours, nothing distributed",
            key,
            net_pool.normalize()
        )
    } else {
        format!(
            "{}: net pool {} / {} weighted hours = {} per point across {} employees",
            key,
            net_pool.normalize(),
            total_weighted_contribution.normalize(),
            value_per_point.normalize(),
            cuts.len()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "day_pool_distribution".to_string(),
        rule_name: "Day Pool Distribution".to_string(),
        input: serde_json::json!({
            "date": key.date.to_string(),
            "pool": key.pool.to_string(),
            "gross_pool": gross.normalize().to_string(),
            "processing_fee_rate": fee_rate.normalize().to_string(),
            "point_system": point_system.name,
            "hours": contributions
                .iter()
                .map(|(employee, worked, _)| (employee.to_string(), worked.normalize().to_string()))
                .collect::<BTreeMap<_, _>>()
        }),
        output: serde_json::json!({
            "net_pool": net_pool.normalize().to_string(),
            "total_weighted_contribution": total_weighted_contribution.normalize().to_string(),
            "value_per_point": value_per_point.normalize().to_string(),
            "cuts": cuts
                .iter()
                .map(|(employee, cut)| (employee.clone(), cut.normalize().to_string()))
                .collect::<BTreeMap<_, _>>(),
            "undistributed": undistributed.normalize().to_string()
        }),
        reasoning,
    };

    Ok(DayPoolResult {
        distribution: DayPoolDistribution {
            date: key.date,
            pool: key.pool,
            gross_pool: gross,
            net_pool,
            total_weighted_contribution,
            value_per_point,
            cuts,
            undistributed,
        },
        audit_step,
        warning,
    })
}

/// The outcome of distributing every bucket in a week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyDistribution {
    /// Total owed to each employee.
    pub weekly_cuts: EmployeeWeeklyCuts,
    /// Every bucket, in date then pool order.
    pub buckets: Vec<DayPoolDistribution>,
    /// One audit step per bucket.
    pub audit_steps: Vec<AuditStep>,
    /// Warnings raised by any bucket.
    pub warnings: Vec<AuditWarning>,
}

/// Distributes every bucket in the tip pool table and sums the cuts.
///
/// Audit steps are numbered from `start_step`. Any bucket error aborts the
/// whole week.
pub fn distribute_week(
    tip_pools: &TipPoolTable,
    pool_hours: &PoolHours,
    point_system: &PointSystem,
    roles: &EmployeeRoles,
    fee_rate: Decimal,
    start_step: u32,
) -> EngineResult<WeeklyDistribution> {
    let mut week = WeeklyDistribution {
        weekly_cuts: EmployeeWeeklyCuts::new(),
        buckets: Vec::with_capacity(tip_pools.len()),
        audit_steps: Vec::with_capacity(tip_pools.len()),
        warnings: Vec::new(),
    };

    for (step, (key, gross)) in (start_step..).zip(tip_pools) {
        let result = distribute_day_pool(
            *key,
            *gross,
            pool_hours.for_pool(key.pool),
            point_system,
            roles,
            fee_rate,
            step,
        )?;

        for (employee, cut) in &result.distribution.cuts {
            let total = week
                .weekly_cuts
                .entry(employee.clone())
                .or_insert(Decimal::ZERO);
            *total = total
                .checked_add(*cut)
                .ok_or_else(|| EngineError::AmountOverflow {
                    context: format!("weekly cuts for {}", employee),
                })?;
        }
        debug!(
            bucket = %result.distribution.key(),
            employees = result.distribution.cuts.len(),
            distributed = %result.distribution.distributed().normalize(),
            "Bucket distributed"
        );
        week.buckets.push(result.distribution);
        week.audit_steps.push(result.audit_step);
        week.warnings.extend(result.warning);
    }

    Ok(week)
}
