//! Request types for the Tip Pool Engine API.
//!
//! This module defines the JSON request structure for the `/distribute` endpoint.

use serde::{Deserialize, Serialize};

use crate::models::Table;

/// Request body for the `/distribute` endpoint.
///
/// Both tables arrive exactly as exported: a list of column headers and rows
/// of text cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionRequest {
    /// The orders export.
    pub orders: Table,
    /// The time clock export.
    pub time_entries: Table,
    /// The point system to use; the configured default when absent.
    #[serde(default)]
    pub point_system: Option<String>,
}
