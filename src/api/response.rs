//! Response types for the Tip Pool Engine API.
//!
//! This module defines the error response structures, the point system
//! listing, and the mapping from engine errors to HTTP statuses.

use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{PointSystem, PointSystemRegistry};
use crate::error::EngineError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// The offending input value, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        // Bad tables are the caller's problem; bad configuration is ours.
        let status = if error.is_config_error() {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::BAD_REQUEST
        };
        ApiErrorResponse {
            status,
            error: ApiError {
                code: error.kind().to_string(),
                message: error.to_string(),
                details: error.offending_value(),
            },
        }
    }
}

/// One entry in the `/point-systems` listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointSystemSummary {
    /// Registry name.
    pub name: String,
    /// What the system is for.
    pub description: String,
    /// Role weights.
    pub roles: BTreeMap<String, Decimal>,
}

impl From<&PointSystem> for PointSystemSummary {
    fn from(system: &PointSystem) -> Self {
        Self {
            name: system.name.clone(),
            description: system.description.clone(),
            roles: system.roles.clone(),
        }
    }
}

/// Response body for `GET /point-systems`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointSystemsResponse {
    /// The system used when a request names none.
    pub default: String,
    /// Every registered system, ordered by name.
    pub point_systems: Vec<PointSystemSummary>,
}

impl From<&PointSystemRegistry> for PointSystemsResponse {
    fn from(registry: &PointSystemRegistry) -> Self {
        Self {
            default: registry.default_name().to_string(),
            point_systems: registry.systems().map(PointSystemSummary::from).collect(),
        }
    }
}
