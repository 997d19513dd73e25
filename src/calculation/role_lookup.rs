//! Employee role lookup.
//!
//! Each employee is paid at the weight of a single job title. The lookup is
//! built once per run from the time entries and fails on the first employee
//! seen under two different titles.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::config::PointSystem;
use crate::error::{EngineError, EngineResult};
use crate::models::TimeEntryRecord;

/// Resolved job title for every employee in a run.
///
/// # Example
///
/// ```
/// use tip_pool_engine::calculation::EmployeeRoles;
/// use tip_pool_engine::config::PointSystem;
/// use tip_pool_engine::models::TimeEntryRecord;
/// use rust_decimal::Decimal;
///
/// let entry = TimeEntryRecord {
///     employee: "Alice".to_string(),
///     job_title: "Head Bartender".to_string(),
///     in_date: "01/10/2024 11:00".to_string(),
///     out_date: "01/10/2024 15:00".to_string(),
/// };
/// let roles = EmployeeRoles::from_time_entries(&[entry]).unwrap();
///
/// assert_eq!(roles.role_of("Alice").unwrap(), "Head Bartender");
/// assert_eq!(
///     roles.weight_of("Alice", &PointSystem::standard()).unwrap(),
///     Decimal::new(125, 2)
/// );
/// assert!(roles.role_of("Zed").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeRoles {
    roles: BTreeMap<String, String>,
}

impl EmployeeRoles {
    /// Builds the lookup from time entries.
    ///
    /// Blank job titles are skipped. Seeing a second, different title for the
    /// same employee is a `ConflictingEmployeeRole` error listing every title
    /// that employee has, in order of first appearance.
    pub fn from_time_entries(entries: &[TimeEntryRecord]) -> EngineResult<Self> {
        let mut roles: BTreeMap<String, String> = BTreeMap::new();
        for entry in entries.iter().filter(|e| !e.job_title.is_empty()) {
            match roles.get(&entry.employee) {
                None => {
                    roles.insert(entry.employee.clone(), entry.job_title.clone());
                }
                Some(existing) if *existing == entry.job_title => {}
                Some(_) => {
                    return Err(EngineError::ConflictingEmployeeRole {
                        employee: entry.employee.clone(),
                        roles: titles_for(entries, &entry.employee),
                    });
                }
            }
        }
        Ok(Self { roles })
    }

    /// The job title of an employee, or `UnresolvedEmployeeRole`.
    pub fn role_of(&self, employee: &str) -> EngineResult<&str> {
        self.roles
            .get(employee)
            .map(String::as_str)
            .ok_or_else(|| EngineError::UnresolvedEmployeeRole {
                employee: employee.to_string(),
            })
    }

    /// The employee's weight under a point system.
    ///
    /// Titles the point system doesn't know weigh zero; employees with no
    /// title at all are an error.
    pub fn weight_of(&self, employee: &str, point_system: &PointSystem) -> EngineResult<Decimal> {
        Ok(point_system.resolve(self.role_of(employee)?))
    }

    /// Number of employees with a role.
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Returns true if no employee has a role.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Every (employee, role) pair, ordered by employee.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.roles.iter().map(|(e, r)| (e.as_str(), r.as_str()))
    }
}

fn titles_for(entries: &[TimeEntryRecord], employee: &str) -> Vec<String> {
    let mut titles: Vec<String> = Vec::new();
    for entry in entries
        .iter()
        .filter(|e| e.employee == employee && !e.job_title.is_empty())
    {
        if !titles.contains(&entry.job_title) {
            titles.push(entry.job_title.clone());
        }
    }
    titles
}
