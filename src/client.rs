//! HTTP client for the IQAir "nearest city" API.
//!
//! Issues an authenticated GET for the city closest to a coordinate pair
//! and decodes the response into a typed snapshot. Transport failures
//! surface as [`AppError::Network`]; a non-"success" status field or an
//! unparseable payload surfaces as [`AppError::Upstream`]. Nothing is
//! swallowed — the caller decides what a failure means.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::models::{Coordinates, NearestCityData, NearestCityResponse};

/// Bounded request timeout for upstream calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---

/// Asynchronous client for the IQAir nearest-city endpoint.
pub struct IqAirClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl IqAirClient {
    /// Build a client with the 10s request timeout baked in.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        // ---
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    /// Fetch the current pollution and weather snapshot for the city
    /// nearest to `coordinates`.
    ///
    /// Calls `GET {base_url}/nearest_city?lat=&lon=&key=`. The response
    /// envelope's `status` field is checked before the `data` block is
    /// decoded, because failure responses reuse `data` for an error shape.
    pub async fn fetch_nearest_city(&self, coordinates: &Coordinates) -> Result<NearestCityData> {
        // ---
        let url = format!("{}/nearest_city", self.base_url);

        debug!(
            latitude = coordinates.latitude,
            longitude = coordinates.longitude,
            "fetching nearest-city air quality"
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", coordinates.latitude.to_string()),
                ("lon", coordinates.longitude.to_string()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(AppError::Network)?;

        let envelope: NearestCityResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("malformed nearest-city response: {e}")))?;

        if envelope.status != "success" {
            warn!(status = %envelope.status, "nearest-city request rejected upstream");
            return Err(AppError::Upstream(envelope.status));
        }

        serde_json::from_value(envelope.data)
            .map_err(|e| AppError::Upstream(format!("malformed nearest-city payload: {e}")))
    }
}
