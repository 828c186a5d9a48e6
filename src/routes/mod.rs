use std::sync::Arc;

use axum::Router;

use crate::client::IqAirClient;
use crate::service::AirQualityService;

mod air_quality;
mod health;

// ---

/// Shared state for all request handlers. The nearest-city endpoint talks
/// to the upstream client directly; the historical endpoint goes through
/// the ingestion service's query path.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<IqAirClient>,
    pub service: Arc<AirQualityService>,
}

pub fn router(client: Arc<IqAirClient>, service: Arc<AirQualityService>) -> Router {
    // ---
    Router::new()
        .merge(air_quality::router())
        .merge(health::router())
        .with_state(AppState { client, service })
}
