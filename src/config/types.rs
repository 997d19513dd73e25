//! Configuration types for tip pool distribution.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{EngineError, EngineResult};

/// Credit-card processing deduction taken off every gross pool (3.5%).
pub const DEFAULT_PROCESSING_FEE_RATE: Decimal = Decimal::from_parts(35, 0, 0, false, 3);

/// Name of the point system used when the caller does not pick one.
pub const DEFAULT_POINT_SYSTEM: &str = "standard";

/// Timestamp formats accepted out of the box, tried in order.
///
/// The first is the 24-hour export format (`01/10/2024 12:30`), the second
/// the 12-hour format with a two-digit year (`01/10/24 12:30 PM`).
pub const DEFAULT_TIMESTAMP_FORMATS: [&str; 2] = ["%m/%d/%Y %H:%M", "%m/%d/%y %I:%M %p"];

fn default_processing_fee_rate() -> Decimal {
    DEFAULT_PROCESSING_FEE_RATE
}

fn default_point_system() -> String {
    DEFAULT_POINT_SYSTEM.to_string()
}

fn default_timestamp_formats() -> Vec<String> {
    DEFAULT_TIMESTAMP_FORMATS
        .iter()
        .map(|f| f.to_string())
        .collect()
}

/// Engine-wide policy read from `engine.yaml`.
///
/// Every field has a default, so an empty file yields the house policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Fraction of every gross pool withheld for card processing (e.g. 0.035).
    #[serde(default = "default_processing_fee_rate")]
    pub processing_fee_rate: Decimal,
    /// Point system used when a run does not name one.
    #[serde(default = "default_point_system")]
    pub default_point_system: String,
    /// `chrono` format strings tried in order when parsing timestamps.
    #[serde(default = "default_timestamp_formats")]
    pub timestamp_formats: Vec<String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            processing_fee_rate: default_processing_fee_rate(),
            default_point_system: default_point_system(),
            timestamp_formats: default_timestamp_formats(),
        }
    }
}

impl EngineSettings {
    /// Checks the settings for values the engine cannot work with.
    pub fn validate(&self) -> EngineResult<()> {
        if self.processing_fee_rate < Decimal::ZERO || self.processing_fee_rate > Decimal::ONE {
            return Err(EngineError::InvalidConfig {
                field: "processing_fee_rate".to_string(),
                message: format!(
                    "must be between 0 and 1, got {}",
                    self.processing_fee_rate.normalize()
                ),
            });
        }
        if self.timestamp_formats.is_empty() {
            return Err(EngineError::InvalidConfig {
                field: "timestamp_formats".to_string(),
                message: "at least one format is required".to_string(),
            });
        }
        Ok(())
    }
}

/// A named mapping from job title to point weight.
///
/// Roles that are not listed weigh zero: they may clock hours but draw
/// nothing from the pool.
///
/// # Example
///
/// ```
/// use tip_pool_engine::config::PointSystem;
/// use rust_decimal::Decimal;
///
/// let standard = PointSystem::standard();
/// assert_eq!(standard.resolve("Head Bartender"), Decimal::new(125, 2));
/// assert_eq!(standard.resolve("Dishwasher"), Decimal::ZERO);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointSystem {
    /// The registry key for this system.
    pub name: String,
    /// What the system is for.
    #[serde(default)]
    pub description: String,
    /// Map of job title to weight.
    pub roles: BTreeMap<String, Decimal>,
}

impl PointSystem {
    /// Returns the weight for a job title, or zero when the title is unknown.
    pub fn resolve(&self, role: &str) -> Decimal {
        self.roles
            .get(role.trim())
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// The house weighting used before point systems were selectable.
    pub fn standard() -> Self {
        let roles = [
            ("Head Bartender", Decimal::new(125, 2)),
            ("Bartender", Decimal::ONE),
            ("Captain", Decimal::ONE),
            ("Expeditor", Decimal::ONE),
            ("Server", Decimal::ONE),
            ("Head Barback", Decimal::new(7, 1)),
            ("Runner", Decimal::new(7, 1)),
            ("Barback", Decimal::new(5, 1)),
            ("Busser", Decimal::new(5, 1)),
            ("Maitre'D", Decimal::new(2, 1)),
            ("General Manager", Decimal::ZERO),
            ("Manager", Decimal::ZERO),
            ("Training", Decimal::ZERO),
        ];

        Self {
            name: DEFAULT_POINT_SYSTEM.to_string(),
            description: "House role_pool_points weighting".to_string(),
            roles: roles
                .into_iter()
                .map(|(role, weight)| (role.to_string(), weight))
                .collect(),
        }
    }

    fn validate(&self) -> EngineResult<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::InvalidConfig {
                field: "name".to_string(),
                message: "point system name cannot be blank".to_string(),
            });
        }
        for (role, weight) in &self.roles {
            if *weight < Decimal::ZERO {
                return Err(EngineError::InvalidConfig {
                    field: format!("{}.roles.{}", self.name, role),
                    message: format!("weight must not be negative, got {}", weight.normalize()),
                });
            }
        }
        Ok(())
    }
}

/// The set of point systems available to a run.
#[derive(Debug, Clone)]
pub struct PointSystemRegistry {
    systems: BTreeMap<String, PointSystem>,
    default_name: String,
}

impl PointSystemRegistry {
    /// Builds a registry, validating every system and the default name.
    pub fn new(systems: Vec<PointSystem>, default_name: &str) -> EngineResult<Self> {
        let mut map = BTreeMap::new();
        for system in systems {
            system.validate()?;
            if map.contains_key(&system.name) {
                return Err(EngineError::InvalidConfig {
                    field: "point_systems".to_string(),
                    message: format!("duplicate point system '{}'", system.name),
                });
            }
            map.insert(system.name.clone(), system);
        }

        if !map.contains_key(default_name) {
            return Err(EngineError::InvalidConfig {
                field: "default_point_system".to_string(),
                message: format!("'{}' is not a registered point system", default_name),
            });
        }

        Ok(Self {
            systems: map,
            default_name: default_name.to_string(),
        })
    }

    /// Returns the named system, or the default when `name` is `None`.
    pub fn select(&self, name: Option<&str>) -> EngineResult<&PointSystem> {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.default_name);
        self.systems
            .get(name)
            .ok_or_else(|| EngineError::PointSystemNotFound {
                name: name.to_string(),
            })
    }

    /// Name of the default system.
    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    /// All registered systems, ordered by name.
    pub fn systems(&self) -> impl Iterator<Item = &PointSystem> {
        self.systems.values()
    }
}

impl Default for PointSystemRegistry {
    /// A registry holding only the standard system, which is also the default.
    fn default() -> Self {
        let standard = PointSystem::standard();
        let default_name = standard.name.clone();
        let mut systems = BTreeMap::new();
        systems.insert(default_name.clone(), standard);
        Self {
            systems,
            default_name,
        }
    }
}

/// The complete engine configuration: policy plus point systems.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    settings: EngineSettings,
    registry: PointSystemRegistry,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(settings: EngineSettings, registry: PointSystemRegistry) -> Self {
        Self { settings, registry }
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Returns the point system registry.
    pub fn point_systems(&self) -> &PointSystemRegistry {
        &self.registry
    }
}
