//! Persistence layer for ingested air quality records.
//!
//! Thin wrapper around a `PgPool`: one insert path and one query path.
//! Records are append-only; no update or delete statement exists here.

use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{AirQualityRecord, Coordinates, NewAirQualityRecord};

// ---

/// Store for `city_air_quality` rows.
#[derive(Clone)]
pub struct AirQualityStore {
    pool: PgPool,
}

impl AirQualityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a new record, assigning a fresh id; `created_at` and
    /// `updated_at` come from column defaults. Returns the stored row.
    ///
    /// Fails with [`crate::error::AppError::Storage`] on constraint
    /// violation or connectivity failure.
    pub async fn insert(&self, record: &NewAirQualityRecord) -> Result<AirQualityRecord> {
        // ---
        let stored = sqlx::query_as::<_, AirQualityRecord>(
            r#"
            INSERT INTO city_air_quality (
                id, city, state, country, latitude, longitude,
                aqi, main_pollutant, temperature, humidity, pressure,
                wind_speed, wind_direction, recorded_at, body
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&record.city)
        .bind(&record.state)
        .bind(&record.country)
        .bind(record.latitude)
        .bind(record.longitude)
        .bind(record.aqi)
        .bind(&record.main_pollutant)
        .bind(record.temperature)
        .bind(record.humidity)
        .bind(record.pressure)
        .bind(record.wind_speed)
        .bind(record.wind_direction)
        .bind(record.recorded_at)
        .bind(&record.body)
        .fetch_one(&self.pool)
        .await?;

        debug!(id = %stored.id, aqi = stored.aqi, city = %stored.city, "stored air quality record");
        Ok(stored)
    }

    /// Find the record with the highest AQI among rows matching the
    /// coordinate exactly (no tolerance or rounding on either axis).
    ///
    /// Ties on AQI break deterministically: most recent `recorded_at`
    /// wins. Returns `None` when no record matches.
    pub async fn find_max_aqi(&self, coordinates: &Coordinates) -> Result<Option<AirQualityRecord>> {
        // ---
        let record = sqlx::query_as::<_, AirQualityRecord>(
            r#"
            SELECT * FROM city_air_quality
            WHERE latitude = $1 AND longitude = $2
            ORDER BY aqi DESC, recorded_at DESC
            LIMIT 1
            "#,
        )
        .bind(coordinates.latitude)
        .bind(coordinates.longitude)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}

// Integration tests requiring a live PostgreSQL instance (DATABASE_URL).
// Run with: cargo test --features integration-tests
#[cfg(all(test, feature = "integration-tests"))]
mod tests {
    // ---
    use super::*;
    use chrono::{Duration, Utc};
    use sqlx::postgres::PgPoolOptions;

    async fn test_store() -> AirQualityStore {
        // ---
        let db_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect(&db_url)
            .await
            .expect("failed to connect to test database");
        crate::schema::create_schema(&pool).await.unwrap();
        AirQualityStore::new(pool)
    }

    fn record_at(coordinates: &Coordinates, aqi: i32) -> NewAirQualityRecord {
        // ---
        NewAirQualityRecord {
            city: "Paris".into(),
            state: Some("Ile-de-France".into()),
            country: "France".into(),
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
            aqi,
            main_pollutant: "p2".into(),
            temperature: 15.0,
            humidity: 65.0,
            pressure: 1013.0,
            wind_speed: 5.2,
            wind_direction: 180.0,
            recorded_at: Utc::now(),
            body: serde_json::json!({"city": "Paris"}),
        }
    }

    // Each test uses its own synthetic coordinate so runs do not
    // interfere with each other or with previously ingested data.
    fn unique_coordinates() -> Coordinates {
        // ---
        let salt = Uuid::new_v4().as_u128() % 1_000_000;
        Coordinates::new(10.0 + salt as f64 * 1e-7, 20.0 + salt as f64 * 1e-7).unwrap()
    }

    #[tokio::test]
    async fn insert_assigns_id_and_timestamps() {
        // ---
        let store = test_store().await;
        let coords = unique_coordinates();

        let stored = store.insert(&record_at(&coords, 42)).await.unwrap();

        assert_eq!(stored.aqi, 42);
        assert_eq!(stored.city, "Paris");
        assert_eq!(stored.created_at, stored.updated_at);
        assert!(stored.recorded_at <= stored.created_at);
    }

    #[tokio::test]
    async fn find_max_aqi_picks_highest() {
        // ---
        let store = test_store().await;
        let coords = unique_coordinates();

        for aqi in [10, 42, 7] {
            store.insert(&record_at(&coords, aqi)).await.unwrap();
        }

        let hit = store.find_max_aqi(&coords).await.unwrap().unwrap();
        assert_eq!(hit.aqi, 42);
    }

    #[tokio::test]
    async fn find_max_aqi_tie_breaks_on_recency() {
        // ---
        let store = test_store().await;
        let coords = unique_coordinates();

        let mut older = record_at(&coords, 42);
        older.recorded_at = Utc::now() - Duration::hours(2);
        store.insert(&older).await.unwrap();

        let newer = store.insert(&record_at(&coords, 42)).await.unwrap();

        let hit = store.find_max_aqi(&coords).await.unwrap().unwrap();
        assert_eq!(hit.id, newer.id);
    }

    #[tokio::test]
    async fn find_max_aqi_returns_none_without_match() {
        // ---
        let store = test_store().await;
        let coords = unique_coordinates();

        assert!(store.find_max_aqi(&coords).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn coordinate_filter_is_exact() {
        // ---
        let store = test_store().await;
        let coords = unique_coordinates();
        store.insert(&record_at(&coords, 42)).await.unwrap();

        let nearby = Coordinates::new(coords.latitude + 1e-6, coords.longitude).unwrap();
        assert!(store.find_max_aqi(&nearby).await.unwrap().is_none());
    }
}
