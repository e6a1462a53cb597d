use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};

use crate::analytics::{AnalyticsFilter, AnalyticsQuery, AnalyticsSink};
use crate::notify::NotificationPublisher;
use crate::service::{FundabilityService, FundabilityServiceError};

pub const FUNDABILITY_PATH: &str = "/api/v1/fundability";
pub const ANALYTICS_PATH: &str = "/api/v1/fundability/analytics";

/// Router exposing the scoring and analytics endpoints.
pub fn fundability_router<S, N>(service: Arc<FundabilityService<S, N>>) -> Router
where
    S: AnalyticsSink + 'static,
    N: NotificationPublisher + 'static,
{
    Router::new()
        .route(FUNDABILITY_PATH, post(assess_handler::<S, N>))
        .route(ANALYTICS_PATH, get(analytics_handler::<S, N>))
        .with_state(service)
}

pub(crate) async fn assess_handler<S, N>(
    State(service): State<Arc<FundabilityService<S, N>>>,
    body: Bytes,
) -> Response
where
    S: AnalyticsSink + 'static,
    N: NotificationPublisher + 'static,
{
    let raw: Value = match serde_json::from_slice(&body) {
        Ok(raw) => raw,
        Err(error) => {
            return validation_failed(vec![format!("request body is not valid JSON: {error}")]);
        }
    };

    match service.assess(&raw) {
        Ok(snapshot) => (StatusCode::OK, axum::Json(snapshot)).into_response(),
        Err(FundabilityServiceError::Validation(errors)) => {
            validation_failed(errors.into_details())
        }
        Err(error @ FundabilityServiceError::Internal(_)) => {
            internal_error(&error, service.exposes_internal_errors())
        }
    }
}

pub(crate) async fn analytics_handler<S, N>(
    State(service): State<Arc<FundabilityService<S, N>>>,
    Query(query): Query<AnalyticsQuery>,
) -> Response
where
    S: AnalyticsSink + 'static,
    N: NotificationPublisher + 'static,
{
    match AnalyticsFilter::from_query(&query) {
        Ok(filter) => {
            let summary = service.summarize(&filter);
            (StatusCode::OK, axum::Json(summary)).into_response()
        }
        Err(errors) => validation_failed(errors.into_details()),
    }
}

fn validation_failed(details: Vec<String>) -> Response {
    let payload = json!({
        "error": "Validation failed",
        "details": details,
    });
    (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
}

pub(crate) fn internal_error(error: &FundabilityServiceError, expose_details: bool) -> Response {
    tracing::error!(%error, "fundability request failed");
    let details: Vec<String> = if expose_details {
        vec![error.to_string()]
    } else {
        Vec::new()
    };
    let payload = json!({
        "error": "Internal server error",
        "details": details,
    });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
