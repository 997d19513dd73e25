//! HTTP request handlers for the Tip Pool Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::calculate_weekly_distribution;

use super::request::DistributionRequest;
use super::response::{ApiError, ApiErrorResponse, PointSystemsResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/distribute", post(distribute_handler))
        .route("/point-systems", get(point_systems_handler))
        .with_state(state)
}

/// Handler for POST /distribute endpoint.
///
/// Accepts the week's orders and time entries and returns the distribution.
async fn distribute_handler(
    State(state): State<AppState>,
    payload: Result<Json<DistributionRequest>, JsonRejection>,
) -> impl IntoResponse {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing distribution request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::validation_error(body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "application/json")],
                Json(error),
            )
                .into_response();
        }
    };

    let start_time = Instant::now();
    match calculate_weekly_distribution(
        &request.orders,
        &request.time_entries,
        request.point_system.as_deref(),
        state.config(),
    ) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                run_id = %result.run_id,
                point_system = %result.point_system,
                orders = request.orders.len(),
                time_entries = request.time_entries.len(),
                distributed = %result.totals.distributed.normalize(),
                duration_us = start_time.elapsed().as_micros(),
                "Distribution completed successfully"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(result),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                kind = err.kind(),
                error = %err,
                "Distribution failed"
            );
            let api_error: ApiErrorResponse = err.into();
            (
                api_error.status,
                [(header::CONTENT_TYPE, "application/json")],
                Json(api_error.error),
            )
                .into_response()
        }
    }
}

/// Handler for GET /point-systems endpoint.
///
/// Lists every registered point system and the default.
async fn point_systems_handler(State(state): State<AppState>) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    let response = PointSystemsResponse::from(state.config().point_systems());
    info!(
        correlation_id = %correlation_id,
        count = response.point_systems.len(),
        "Listing point systems"
    );
    (StatusCode::OK, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use crate::models::{DistributionResult, Table};
    use axum::{body::Body, http::Request};
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        let config = ConfigLoader::load("./config/tip_pool").expect("Failed to load config");
        AppState::new(config)
    }

    fn create_valid_request() -> DistributionRequest {
        DistributionRequest {
            orders: Table::new(
                vec!["Opened", "Tip", "Gratuity"],
                vec![vec!["01/10/2024 12:30", "100", "20"]],
            ),
            time_entries: Table::new(
                vec!["Employee", "Job Title", "In Date", "Out Date"],
                vec![vec!["Alice", "Server", "01/10/2024 11:00", "01/10/2024 15:00"]],
            ),
            point_system: None,
        }
    }

    fn post_json(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/distribute")
            .header("Content-Type", "application/json")
            .body(body.into())
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_request_returns_200() {
        let router = create_router(create_test_state());
        let body = serde_json::to_string(&create_valid_request()).unwrap();

        let response = router.oneshot(post_json(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let content_type = response.headers().get("content-type").unwrap();
        assert_eq!(content_type, "application/json");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let result: DistributionResult = serde_json::from_slice(&body).unwrap();
        assert_eq!(result.weekly_cuts["Alice"], Decimal::from_str("115.8").unwrap());
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let router = create_router(create_test_state());

        let response = router.oneshot(post_json("{invalid json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_orders_returns_validation_error() {
        let router = create_router(create_test_state());
        let body = r#"{"time_entries": {"columns": ["Employee"]}}"#;

        let response = router.oneshot(post_json(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert!(error.message.contains("orders"));
    }

    #[tokio::test]
    async fn test_missing_column_returns_400_with_column() {
        let router = create_router(create_test_state());
        let mut request = create_valid_request();
        request.orders = Table::new(vec!["Opened", "Tip"], Vec::<Vec<&str>>::new());
        let body = serde_json::to_string(&request).unwrap();

        let response = router.oneshot(post_json(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "MISSING_COLUMN");
        assert_eq!(error.details.as_deref(), Some("Gratuity"));
    }

    #[tokio::test]
    async fn test_oversized_amounts_return_400_instead_of_panicking() {
        let router = create_router(create_test_state());
        let mut request = create_valid_request();
        request.orders = Table::new(
            vec!["Opened", "Tip", "Gratuity"],
            vec![
                vec!["01/10/2024 12:30", "79228162514264337593543950335", "0"],
                vec!["01/10/2024 12:45", "1", "0"],
            ],
        );
        let body = serde_json::to_string(&request).unwrap();

        let response = router.oneshot(post_json(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "INVALID_AMOUNT");
        assert_eq!(error.details.as_deref(), Some("the 2024-01-10 Lunch pool"));
    }

    #[tokio::test]
    async fn test_point_systems_lists_configured_systems() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/point-systems")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let listing: PointSystemsResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(listing.default, "standard");
        let names: Vec<&str> = listing.point_systems.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["flat", "standard"]);
    }
}
