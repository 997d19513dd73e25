//! Configuration loading and management for the Tip Pool Engine.
//!
//! This module loads the engine policy (processing fee, default point
//! system, accepted timestamp formats) and the registry of point systems
//! from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use tip_pool_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/tip_pool").unwrap();
//! println!("Fee rate: {}", config.settings().processing_fee_rate);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    DEFAULT_POINT_SYSTEM, DEFAULT_PROCESSING_FEE_RATE, DEFAULT_TIMESTAMP_FORMATS, EngineConfig,
    EngineSettings, PointSystem, PointSystemRegistry,
};
