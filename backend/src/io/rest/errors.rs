use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use crate::domain::models::{AggregationError, ServiceError};

/// Translate a record-service failure into an HTTP response
pub fn service_error_response(operation: &str, err: ServiceError) -> Response {
    match err {
        ServiceError::Validation(e) => {
            warn!("{} rejected: {}", operation, e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
        ServiceError::NotFound(what) => {
            warn!("{}: {} not found", operation, what);
            (StatusCode::NOT_FOUND, format!("{} not found", what)).into_response()
        }
        ServiceError::Storage(e) => {
            error!("{} failed: {:#}", operation, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Error").into_response()
        }
    }
}

/// Translate an aggregation failure into an HTTP response
pub fn aggregation_error_response(operation: &str, err: AggregationError) -> Response {
    match err {
        AggregationError::Window(e) => {
            warn!("{} rejected: {}", operation, e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
        AggregationError::Storage(e) => {
            error!("{} failed: {:#}", operation, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Could not load data").into_response()
        }
    }
}
