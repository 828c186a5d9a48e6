//! Health check endpoint for the cityair backend.
//!
//! `GET /health` lets container orchestrators and CI verify the service
//! is up without touching the database or the upstream API. The gateway
//! (`routes/mod.rs`) merges this subrouter into the top-level router.

use axum::{routing::get, Json, Router};
use serde::Serialize;

/// JSON response body for the `/health` endpoint.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Handle `GET /health`. Deliberately lightweight: no database, no
/// upstream call.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Create a subrouter containing the `/health` route, generic over the
/// application state so it merges cleanly with the gateway router.
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health))
}
