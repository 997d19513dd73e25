//! Distribution result models for the Tip Pool Engine.
//!
//! This module contains the [`DistributionResult`] type and its associated
//! structures that capture every output of a weekly run: per-bucket
//! distributions, weekly cuts, the employee summary, totals and an audit
//! trace.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{DayPoolKey, EmployeeWeeklyCuts, Pool};

/// How one day/pool bucket was shared out.
///
/// When nobody with a positive weight worked the bucket,
/// `total_weighted_contribution` and `value_per_point` are zero, `cuts` pays
/// nothing, and `undistributed` equals `net_pool`. That money is not carried
/// into any other bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPoolDistribution {
    /// Calendar date of the bucket.
    pub date: NaiveDate,
    /// Pool of the bucket.
    pub pool: Pool,
    /// Tips and gratuities collected, before the processing fee.
    pub gross_pool: Decimal,
    /// Amount left to share after the processing fee.
    pub net_pool: Decimal,
    /// Sum of hours × weight over everyone who worked the bucket.
    pub total_weighted_contribution: Decimal,
    /// What one weighted hour is worth in this bucket.
    pub value_per_point: Decimal,
    /// Each working employee's share.
    pub cuts: BTreeMap<String, Decimal>,
    /// Net money nobody received.
    pub undistributed: Decimal,
}

impl DayPoolDistribution {
    /// The bucket's aggregation key.
    pub fn key(&self) -> DayPoolKey {
        DayPoolKey::new(self.date, self.pool)
    }

    /// Sum of every cut in the bucket.
    pub fn distributed(&self) -> Decimal {
        self.cuts.values().copied().sum()
    }
}

/// Per-employee lunch/dinner breakdown for the week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeSummaryRow {
    /// Employee name, or `TOTAL` for the closing row.
    pub employee: String,
    /// Tips earned from lunch buckets.
    pub lunch_tips: Decimal,
    /// Lunch hours worked.
    pub lunch_hours: Decimal,
    /// Lunch hours as `HH:MM`; blank on the total row.
    pub lunch_hours_display: String,
    /// Tips earned from dinner buckets.
    pub dinner_tips: Decimal,
    /// Dinner hours worked.
    pub dinner_hours: Decimal,
    /// Dinner hours as `HH:MM`; blank on the total row.
    pub dinner_hours_display: String,
    /// Lunch plus dinner tips.
    pub total_tips: Decimal,
}

/// One line of the two-column weekly payout sheet.
///
/// # Example
///
/// ```
/// use tip_pool_engine::models::WeeklyTipRow;
/// use rust_decimal::Decimal;
///
/// let row = WeeklyTipRow {
///     employee: "Alice".to_string(),
///     weekly_tips: Decimal::new(11580, 2),
/// };
/// let json = serde_json::to_string(&row).unwrap();
/// assert_eq!(json, r#"{"Employee":"Alice","Weekly Tips":"115.80"}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyTipRow {
    /// Employee name.
    #[serde(rename = "Employee")]
    pub employee: String,
    /// Amount owed for the week, rounded to cents.
    #[serde(rename = "Weekly Tips")]
    pub weekly_tips: Decimal,
}

/// Money totals for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionTotals {
    /// Tips and gratuities collected across every bucket.
    pub gross_collected: Decimal,
    /// Amount withheld for card processing.
    pub processing_fees: Decimal,
    /// Gross minus fees.
    pub net_pool: Decimal,
    /// Amount paid out to employees.
    pub distributed: Decimal,
    /// Net money in buckets nobody with a positive weight worked.
    pub undistributed: Decimal,
}

/// A single step in the audit trace recording a calculation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings flag conditions that don't stop the run but need a person to
/// look at them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

/// The complete result of a weekly distribution run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionResult {
    /// Unique identifier for this run.
    pub run_id: Uuid,
    /// When the run was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the run.
    pub engine_version: String,
    /// Name of the point system used.
    pub point_system: String,
    /// Processing fee rate applied to every bucket.
    pub processing_fee_rate: Decimal,
    /// Every bucket that had tips, in date then pool order.
    pub buckets: Vec<DayPoolDistribution>,
    /// Total owed to each employee, unrounded.
    pub weekly_cuts: EmployeeWeeklyCuts,
    /// Lunch/dinner breakdown per employee, closed by a `TOTAL` row.
    pub employee_summary: Vec<EmployeeSummaryRow>,
    /// Money totals.
    pub totals: DistributionTotals,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

impl DistributionResult {
    /// The weekly cuts as payout sheet rows, rounded half away from zero to
    /// cents.
    pub fn weekly_tip_rows(&self) -> Vec<WeeklyTipRow> {
        self.weekly_cuts
            .iter()
            .map(|(employee, amount)| WeeklyTipRow {
                employee: employee.clone(),
                weekly_tips: amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample_bucket() -> DayPoolDistribution {
        let mut cuts = BTreeMap::new();
        cuts.insert("Alice".to_string(), dec("77.2"));
        cuts.insert("Ben".to_string(), dec("38.6"));
        DayPoolDistribution {
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            pool: Pool::Lunch,
            gross_pool: dec("120"),
            net_pool: dec("115.8"),
            total_weighted_contribution: dec("6"),
            value_per_point: dec("19.3"),
            cuts,
            undistributed: Decimal::ZERO,
        }
    }

    fn sample_result(weekly_cuts: EmployeeWeeklyCuts) -> DistributionResult {
        DistributionResult {
            run_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: "0.1.0".to_string(),
            point_system: "standard".to_string(),
            processing_fee_rate: dec("0.035"),
            buckets: vec![sample_bucket()],
            weekly_cuts,
            employee_summary: vec![],
            totals: DistributionTotals {
                gross_collected: dec("120"),
                processing_fees: dec("4.2"),
                net_pool: dec("115.8"),
                distributed: dec("115.8"),
                undistributed: Decimal::ZERO,
            },
            audit_trace: AuditTrace {
                steps: vec![],
                warnings: vec![],
                duration_us: 0,
            },
        }
    }

    #[test]
    fn test_bucket_distributed_sums_cuts() {
        let bucket = sample_bucket();
        assert_eq!(bucket.distributed(), dec("115.8"));
        assert_eq!(
            bucket.key(),
            DayPoolKey::new(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(), Pool::Lunch)
        );
    }

    #[test]
    fn test_weekly_tip_rows_round_to_cents() {
        let mut cuts = EmployeeWeeklyCuts::new();
        cuts.insert("Alice".to_string(), dec("38.6049999"));
        cuts.insert("Ben".to_string(), dec("12.345"));
        let rows = sample_result(cuts).weekly_tip_rows();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].employee, "Alice");
        assert_eq!(rows[0].weekly_tips, dec("38.60"));
        assert_eq!(rows[1].weekly_tips, dec("12.35"));
    }

    #[test]
    fn test_result_serializes_bucket_pool_as_snake_case() {
        let result = sample_result(EmployeeWeeklyCuts::new());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["buckets"][0]["pool"], "lunch");
        assert_eq!(json["buckets"][0]["date"], "2024-01-10");
        assert_eq!(json["point_system"], "standard");
    }

    #[test]
    fn test_audit_trace_round_trips() {
        let trace = AuditTrace {
            steps: vec![AuditStep {
                step_number: 1,
                rule_id: "order_aggregation".to_string(),
                rule_name: "Order Aggregation".to_string(),
                input: serde_json::json!({"orders": 1}),
                output: serde_json::json!({"buckets": 1}),
                reasoning: "1 order into 1 bucket".to_string(),
            }],
            warnings: vec![],
            duration_us: 12,
        };
        let json = serde_json::to_string(&trace).unwrap();
        let back: AuditTrace = serde_json::from_str(&json).unwrap();
        assert_eq!(trace, back);
    }
}
