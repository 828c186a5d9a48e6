//! Error taxonomy for the `cityair` backend service.
//!
//! Four failure classes cover the whole pipeline: request validation,
//! upstream API rejection, transport failure, and persistence failure.
//! The client and store raise these directly, the ingestion service
//! forwards them unchanged, and the route layer maps them onto HTTP
//! status codes via [`IntoResponse`].

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde_json::json;
use thiserror::Error;

// ---

/// Typed failures raised by the ingestion and query pipeline.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or out-of-range request coordinates.
    #[error("validation error: {0}")]
    Validation(String),

    /// The upstream API answered with a non-success status or an
    /// unparseable payload.
    #[error("upstream air quality API error: {0}")]
    Upstream(String),

    /// Transport-level failure reaching the upstream API.
    #[error("network error reaching upstream: {0}")]
    Network(#[from] reqwest::Error),

    /// Persistence failure in the air quality store.
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AppError>;

// ---

impl IntoResponse for AppError {
    /// Map failures to HTTP responses: validation errors become 422,
    /// everything else a 500 carrying only the error message.
    fn into_response(self) -> Response {
        // ---
        let status = match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        }

        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn validation_maps_to_422() {
        // ---
        let response = AppError::Validation("latitude and longitude are required".into())
            .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn upstream_maps_to_500() {
        // ---
        let response = AppError::Upstream("fail".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
