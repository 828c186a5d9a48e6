//! Ingestion and query orchestration.
//!
//! Glues the upstream client and the store together: one write path that
//! fetches, maps, and persists a snapshot, and one read path that answers
//! "when was this coordinate most polluted". No failure is handled here —
//! client and store errors propagate unchanged so the caller (the
//! scheduler, or a request handler) decides what a failure means.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::client::IqAirClient;
use crate::error::Result;
use crate::models::Coordinates;
use crate::store::AirQualityStore;

// ---

pub struct AirQualityService {
    client: Arc<IqAirClient>,
    store: AirQualityStore,
}

impl AirQualityService {
    pub fn new(client: Arc<IqAirClient>, store: AirQualityStore) -> Self {
        Self { client, store }
    }

    /// Fetch the nearest-city snapshot for `coordinates`, flatten it into
    /// a record, and persist it. Exactly one record is written per
    /// successful call; on any failure nothing is written and the typed
    /// error propagates to the caller.
    pub async fn ingest(&self, coordinates: &Coordinates) -> Result<()> {
        // ---
        let snapshot = self.client.fetch_nearest_city(coordinates).await?;
        let record = snapshot.to_record()?;
        let stored = self.store.insert(&record).await?;

        info!(
            id = %stored.id,
            city = %stored.city,
            aqi = stored.aqi,
            main_pollutant = %stored.main_pollutant,
            "ingested air quality record"
        );
        Ok(())
    }

    /// Timestamp of the peak recorded AQI at `coordinates`, or `None`
    /// when nothing has been ingested for that exact coordinate.
    ///
    /// Returns the record's `created_at`, not `recorded_at` — this
    /// mirrors the upstream system's semantics (see DESIGN.md).
    pub async fn most_polluted_time(
        &self,
        coordinates: &Coordinates,
    ) -> Result<Option<DateTime<Utc>>> {
        // ---
        let record = self.store.find_max_aqi(coordinates).await?;
        Ok(record.map(|r| r.created_at))
    }
}
