//! HTTP API module for the Tip Pool Engine.
//!
//! This module provides the REST API endpoints for running a weekly tip
//! distribution and listing the available point systems.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::DistributionRequest;
pub use response::{ApiError, ApiErrorResponse, PointSystemSummary, PointSystemsResponse};
pub use state::AppState;
