//! Air quality read endpoints.
//!
//! Two GET routes backed by the ingestion pipeline:
//! - `/air-quality/nearest` — live pollution snapshot for the city nearest
//!   to the given coordinates, fetched straight from the upstream API.
//! - `/air-quality/most-polluted-time` — date and time of the peak
//!   recorded AQI for the exact coordinate, from persisted history.
//!
//! Both validate their query coordinates (422 on missing or out-of-range
//! values); upstream and storage failures map to 500 via [`AppError`].

use axum::{extract::Query, extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AppError, Result};
use crate::models::{Coordinates, Pollution};
use crate::routes::AppState;

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/air-quality/nearest", get(nearest))
        .route("/air-quality/most-polluted-time", get(most_polluted_time))
}

/// Raw query parameters; both coordinates are optional at the HTTP layer
/// so their absence can surface as a 422 rather than a generic 400.
#[derive(Debug, Deserialize)]
struct CoordinateParams {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

fn parse_coordinates(params: &CoordinateParams) -> Result<Coordinates> {
    // ---
    match (params.latitude, params.longitude) {
        (Some(latitude), Some(longitude)) => Coordinates::new(latitude, longitude),
        _ => Err(AppError::Validation(
            "latitude and longitude are required".into(),
        )),
    }
}

// ---

#[derive(Debug, Serialize)]
struct NearestCityBody {
    result: PollutionResult,
}

#[derive(Debug, Serialize)]
struct PollutionResult {
    pollution: Pollution,
}

/// Handle `GET /air-quality/nearest?latitude=&longitude=`.
async fn nearest(
    Query(params): Query<CoordinateParams>,
    State(state): State<AppState>,
) -> Result<Json<NearestCityBody>> {
    // ---
    let coordinates = parse_coordinates(&params)?;

    info!(
        latitude = coordinates.latitude,
        longitude = coordinates.longitude,
        "GET /air-quality/nearest"
    );

    let snapshot = state.client.fetch_nearest_city(&coordinates).await?;

    Ok(Json(NearestCityBody {
        result: PollutionResult {
            pollution: snapshot.current.pollution,
        },
    }))
}

// ---

#[derive(Debug, Serialize)]
struct MostPollutedTimeBody {
    date: Option<String>,
    time: Option<String>,
}

impl MostPollutedTimeBody {
    fn from_timestamp(timestamp: Option<DateTime<Utc>>) -> Self {
        // ---
        Self {
            date: timestamp.map(|t| t.format("%Y-%m-%d").to_string()),
            time: timestamp.map(|t| t.format("%H:%M").to_string()),
        }
    }
}

/// Handle `GET /air-quality/most-polluted-time?latitude=&longitude=`.
async fn most_polluted_time(
    Query(params): Query<CoordinateParams>,
    State(state): State<AppState>,
) -> Result<Json<MostPollutedTimeBody>> {
    // ---
    let coordinates = parse_coordinates(&params)?;

    info!(
        latitude = coordinates.latitude,
        longitude = coordinates.longitude,
        "GET /air-quality/most-polluted-time"
    );

    let timestamp = state.service.most_polluted_time(&coordinates).await?;
    Ok(Json(MostPollutedTimeBody::from_timestamp(timestamp)))
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn missing_coordinates_are_rejected() {
        // ---
        let neither = CoordinateParams {
            latitude: None,
            longitude: None,
        };
        assert!(matches!(
            parse_coordinates(&neither),
            Err(AppError::Validation(_))
        ));

        let only_latitude = CoordinateParams {
            latitude: Some(48.8566),
            longitude: None,
        };
        assert!(matches!(
            parse_coordinates(&only_latitude),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        // ---
        let params = CoordinateParams {
            latitude: Some(91.0),
            longitude: Some(2.3522),
        };
        assert!(matches!(
            parse_coordinates(&params),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn valid_coordinates_parse() {
        // ---
        let params = CoordinateParams {
            latitude: Some(48.8566),
            longitude: Some(2.3522),
        };
        let coordinates = parse_coordinates(&params).unwrap();
        assert_eq!(coordinates.latitude, 48.8566);
        assert_eq!(coordinates.longitude, 2.3522);
    }

    #[test]
    fn most_polluted_body_formats_date_and_time() {
        // ---
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 5, 9, 7, 33).unwrap();
        let body = MostPollutedTimeBody::from_timestamp(Some(timestamp));

        assert_eq!(body.date.as_deref(), Some("2024-01-05"));
        assert_eq!(body.time.as_deref(), Some("09:07"));
    }

    #[test]
    fn most_polluted_body_is_null_without_history() {
        // ---
        let body = MostPollutedTimeBody::from_timestamp(None);

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "date": null, "time": null }));
    }
}
