//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the engine
//! policy and point systems from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{EngineConfig, EngineSettings, PointSystem, PointSystemRegistry};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/tip_pool/
/// ├── engine.yaml            # Fee rate, default point system, timestamp formats
/// └── point_systems/
///     ├── standard.yaml      # One point system per file
///     └── flat.yaml
/// ```
///
/// # Example
///
/// ```no_run
/// use tip_pool_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/tip_pool").unwrap();
/// let system = loader.select_point_system(None).unwrap();
/// println!("Default point system: {}", system.name);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if `engine.yaml` or the `point_systems` directory is
    /// missing, if any file is not valid YAML, or if the loaded values fail
    /// validation (fee rate outside 0..=1, negative weights, unknown default
    /// system, no timestamp formats).
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let settings = Self::load_yaml::<EngineSettings>(&path.join("engine.yaml"))?;
        settings.validate()?;

        let systems = Self::load_point_systems(&path.join("point_systems"))?;
        let registry = PointSystemRegistry::new(systems, &settings.default_point_system)?;

        tracing::debug!(
            path = %path.display(),
            point_systems = registry.systems().count(),
            "Loaded tip pool configuration"
        );

        Ok(Self {
            config: EngineConfig::new(settings, registry),
        })
    }

    /// Returns the built-in configuration: house policy and the standard
    /// point system only.
    pub fn builtin() -> Self {
        Self {
            config: EngineConfig::new(EngineSettings::default(), PointSystemRegistry::default()),
        }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads every point system file from the point systems directory.
    fn load_point_systems(dir: &Path) -> EngineResult<Vec<PointSystem>> {
        let dir_str = dir.display().to_string();

        if !dir.exists() {
            return Err(EngineError::ConfigNotFound { path: dir_str });
        }

        let entries = fs::read_dir(dir).map_err(|_| EngineError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut systems = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: dir_str.clone(),
            })?;

            let path = entry.path();
            if path
                .extension()
                .is_some_and(|ext| ext == "yaml" || ext == "yml")
            {
                systems.push(Self::load_yaml::<PointSystem>(&path)?);
            }
        }

        if systems.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no point system files found)", dir_str),
            });
        }

        Ok(systems)
    }

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &EngineSettings {
        self.config.settings()
    }

    /// Gets a point system by name, falling back to the configured default.
    ///
    /// # Example
    ///
    /// ```
    /// use tip_pool_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::builtin();
    /// let system = loader.select_point_system(None)?;
    /// assert_eq!(system.name, "standard");
    /// # Ok::<(), tip_pool_engine::error::EngineError>(())
    /// ```
    pub fn select_point_system(&self, name: Option<&str>) -> EngineResult<&PointSystem> {
        self.config.point_systems().select(name)
    }

    /// Returns the point system registry.
    pub fn point_systems(&self) -> &PointSystemRegistry {
        self.config.point_systems()
    }
}
