//! Database schema management for `cityair`.
//!
//! Ensures required tables and indexes exist before serving requests.
//! Applied once on startup from `main.rs`.

use anyhow::Result;
use sqlx::PgPool;

// ---

/// Create or update the database schema (idempotent).
///
/// Creates the `city_air_quality` table holding ingested readings. Safe to
/// call on every startup; no-op if objects already exist.
///
/// Errors are propagated if any SQL execution fails.
pub async fn create_schema(pool: &PgPool) -> Result<()> {
    // ---
    let mut tx = pool.begin().await?;

    // Append-only table of ingested readings. `updated_at` mirrors
    // `created_at` because no update path exists.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS city_air_quality (
            id             UUID PRIMARY KEY,
            city           TEXT             NOT NULL,
            state          TEXT,
            country        TEXT             NOT NULL DEFAULT '',
            latitude       DOUBLE PRECISION NOT NULL,
            longitude      DOUBLE PRECISION NOT NULL,
            aqi            INTEGER          NOT NULL CHECK (aqi >= 0),
            main_pollutant TEXT             NOT NULL,
            temperature    DOUBLE PRECISION NOT NULL,
            humidity       DOUBLE PRECISION NOT NULL,
            pressure       DOUBLE PRECISION NOT NULL,
            wind_speed     DOUBLE PRECISION NOT NULL,
            wind_direction DOUBLE PRECISION NOT NULL,
            recorded_at    TIMESTAMPTZ      NOT NULL,
            created_at     TIMESTAMPTZ      NOT NULL DEFAULT NOW(),
            updated_at     TIMESTAMPTZ      NOT NULL DEFAULT NOW(),
            body           JSONB            NOT NULL
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    // Exact-match coordinate filter used by find_max_aqi
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_city_air_quality_coordinates
            ON city_air_quality (latitude, longitude);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_city_air_quality_aqi
            ON city_air_quality (aqi);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}
