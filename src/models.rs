//! Data models for the air quality pipeline.
//!
//! Three layers live here:
//! - the IQAir "nearest city" response types as deserialized off the wire,
//! - the transient [`Coordinates`] value object used for ingestion input
//!   and query filtering,
//! - the persisted [`AirQualityRecord`] and its insert-side counterpart
//!   [`NewAirQualityRecord`], plus the snapshot-to-record mapping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};

// ---

/// A latitude/longitude pair. Used both as ingestion input and as the
/// exact-match filter key for queries; never persisted on its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Build a validated coordinate pair.
    ///
    /// Fails with [`AppError::Validation`] when latitude falls outside
    /// [-90, 90] or longitude outside [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        // ---
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(AppError::Validation(format!(
                "latitude {latitude} out of range [-90, 90]"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(AppError::Validation(format!(
                "longitude {longitude} out of range [-180, 180]"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

// ---

/// Top-level IQAir response envelope. `data` stays untyped until the
/// status field has been checked, because failure responses carry a
/// different shape under `data`.
#[derive(Debug, Deserialize)]
pub struct NearestCityResponse {
    pub status: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// One point-in-time reading for the city nearest to the requested
/// coordinates, as returned under `data` on success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearestCityData {
    pub city: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: String,
    pub location: Location,
    pub current: CurrentConditions,
}

/// GeoJSON point: `coordinates` is `[longitude, latitude]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub coordinates: [f64; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub pollution: Pollution,
    pub weather: Weather,
}

/// Pollution block. US-standard fields are mandatory; the China-standard
/// pair is absent from some responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pollution {
    /// Measurement timestamp reported by the source.
    pub ts: DateTime<Utc>,
    /// AQI value, US EPA standard.
    pub aqius: i32,
    /// Main pollutant code, US standard (e.g. "p2" for PM2.5).
    pub mainus: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aqicn: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maincn: Option<String>,
}

/// Weather block accompanying the pollution reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weather {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<DateTime<Utc>>,
    /// Temperature in Celsius.
    pub tp: f64,
    /// Atmospheric pressure in hPa.
    pub pr: f64,
    /// Humidity percentage.
    pub hu: f64,
    /// Wind speed in m/s.
    pub ws: f64,
    /// Wind direction as an angle (N=0, E=90, S=180, W=270).
    pub wd: f64,
    /// Weather icon code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ic: Option<String>,
}

// ---

/// A persisted air quality reading. Records are append-only: created by
/// the ingestion service, never updated or deleted here.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AirQualityRecord {
    pub id: Uuid,
    pub city: String,
    pub state: Option<String>,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub aqi: i32,
    pub main_pollutant: String,
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub wind_speed: f64,
    pub wind_direction: f64,
    /// Measurement timestamp from the source API.
    pub recorded_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Raw upstream payload, retained for audit and debugging.
    pub body: serde_json::Value,
}

/// Insert-side record, before the store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewAirQualityRecord {
    pub city: String,
    pub state: Option<String>,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub aqi: i32,
    pub main_pollutant: String,
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub wind_speed: f64,
    pub wind_direction: f64,
    pub recorded_at: DateTime<Utc>,
    pub body: serde_json::Value,
}

impl NearestCityData {
    /// Flatten a snapshot into a storable record.
    ///
    /// AQI and main pollutant come from the US-standard fields,
    /// `recorded_at` from the pollution timestamp, and the full snapshot
    /// is serialized into `body`. GeoJSON coordinate order is
    /// `[longitude, latitude]`.
    pub fn to_record(&self) -> Result<NewAirQualityRecord> {
        // ---
        let body = serde_json::to_value(self)
            .map_err(|e| AppError::Upstream(format!("unserializable snapshot: {e}")))?;

        Ok(NewAirQualityRecord {
            city: self.city.clone(),
            state: self.state.clone(),
            country: self.country.clone(),
            latitude: self.location.coordinates[1],
            longitude: self.location.coordinates[0],
            aqi: self.current.pollution.aqius,
            main_pollutant: self.current.pollution.mainus.clone(),
            temperature: self.current.weather.tp,
            humidity: self.current.weather.hu,
            pressure: self.current.weather.pr,
            wind_speed: self.current.weather.ws,
            wind_direction: self.current.weather.wd,
            recorded_at: self.current.pollution.ts,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    const PARIS_SNAPSHOT: &str = r#"{
        "status": "success",
        "data": {
            "city": "Paris",
            "state": "Ile-de-France",
            "country": "France",
            "location": { "type": "Point", "coordinates": [2.3522, 48.8566] },
            "current": {
                "pollution": {
                    "ts": "2024-01-01T12:00:00Z",
                    "aqius": 42, "mainus": "p2",
                    "aqicn": 15, "maincn": "p2"
                },
                "weather": {
                    "ts": "2024-01-01T12:00:00Z",
                    "tp": 15, "pr": 1013, "hu": 65, "ws": 5.2, "wd": 180,
                    "ic": "01d"
                }
            }
        }
    }"#;

    fn parse_snapshot(raw: &str) -> NearestCityData {
        // ---
        let envelope: NearestCityResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.status, "success");
        serde_json::from_value(envelope.data).unwrap()
    }

    #[test]
    fn snapshot_parses_from_envelope() {
        // ---
        let data = parse_snapshot(PARIS_SNAPSHOT);

        assert_eq!(data.city, "Paris");
        assert_eq!(data.state.as_deref(), Some("Ile-de-France"));
        assert_eq!(data.country, "France");
        assert_eq!(data.current.pollution.aqius, 42);
        assert_eq!(data.current.pollution.aqicn, Some(15));
        assert_eq!(data.current.weather.ic.as_deref(), Some("01d"));
    }

    #[test]
    fn snapshot_maps_to_record() {
        // ---
        let data = parse_snapshot(PARIS_SNAPSHOT);
        let record = data.to_record().unwrap();

        assert_eq!(record.city, "Paris");
        assert_eq!(record.aqi, 42);
        assert_eq!(record.main_pollutant, "p2");
        assert_eq!(record.temperature, 15.0);
        assert_eq!(record.humidity, 65.0);
        assert_eq!(record.pressure, 1013.0);
        assert_eq!(record.wind_speed, 5.2);
        assert_eq!(record.wind_direction, 180.0);

        // GeoJSON order is [longitude, latitude]
        assert_eq!(record.latitude, 48.8566);
        assert_eq!(record.longitude, 2.3522);

        assert_eq!(
            record.recorded_at,
            "2024-01-01T12:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
        assert_eq!(record.body["city"], "Paris");
    }

    #[test]
    fn sparse_snapshot_still_maps() {
        // ---
        // Minimal payload: no state/country, no China-standard pollution
        // fields, no weather timestamp or icon.
        let raw = r#"{
            "status": "success",
            "data": {
                "city": "Paris",
                "current": {
                    "pollution": {"aqius": 42, "mainus": "p2", "ts": "2024-01-01T12:00:00Z"},
                    "weather": {"tp": 15, "hu": 65, "pr": 1013, "ws": 5.2, "wd": 180}
                },
                "location": {"coordinates": [2.3522, 48.8566]}
            }
        }"#;

        let record = parse_snapshot(raw).to_record().unwrap();

        assert_eq!(record.aqi, 42);
        assert_eq!(record.main_pollutant, "p2");
        assert_eq!(record.temperature, 15.0);
        assert_eq!(record.state, None);
        assert_eq!(record.country, "");
        assert_eq!(record.latitude, 48.8566);
        assert_eq!(record.longitude, 2.3522);
    }

    #[test]
    fn coordinates_validate_ranges() {
        // ---
        assert!(Coordinates::new(48.8566, 2.3522).is_ok());
        assert!(Coordinates::new(90.0, 180.0).is_ok());
        assert!(Coordinates::new(-90.0, -180.0).is_ok());

        assert!(matches!(
            Coordinates::new(90.1, 0.0),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            Coordinates::new(0.0, -180.5),
            Err(AppError::Validation(_))
        ));
    }
}
