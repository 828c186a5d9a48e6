//! Configuration loader for the `cityair` backend service.
//!
//! This module centralizes all runtime configuration values and their
//! defaults, loading from environment variables (with optional `.env` file
//! support provided by the caller). Missing required values fail startup
//! immediately rather than being warned about and limped past.

use std::env;

use anyhow::{anyhow, Result};

/// Parse an optional integer environment variable with a default value.
macro_rules! parse_env_u32 {
    ($var_name:expr, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<u32>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse a required string environment variable.
macro_rules! require_env {
    ($var_name:expr) => {
        env::var($var_name)
            .map_err(|_| anyhow!("{} must be set in .env or environment", $var_name))?
    };
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent
/// configuration snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// PostgreSQL connection string.
    pub db_url: String,

    /// Maximum number of database connections in the pool.
    pub db_pool_max: u32,

    /// IQAir API base URL.
    pub iqair_base_url: String,

    /// IQAir API key, sent as the `key` query parameter.
    pub iqair_api_key: String,

    /// HTTP listen port.
    pub port: u16,
}

/// Load configuration from environment variables with defaults.
///
/// Required:
/// - `DATABASE_URL` – PostgreSQL connection string
/// - `IQAIR_BASE_URL` – IQAir API base URL
/// - `IQAIR_API_KEY` – IQAir API key
///
/// Optional:
/// - `DB_POOL_MAX` – max DB connections (default: 5)
/// - `PORT` – HTTP listen port (default: 8080)
///
/// Returns an error if any required variable is missing or invalid.
pub fn load_from_env() -> Result<Config> {
    // ---
    let db_url = require_env!("DATABASE_URL");
    let iqair_base_url = require_env!("IQAIR_BASE_URL");
    let iqair_api_key = require_env!("IQAIR_API_KEY");
    let db_pool_max = parse_env_u32!("DB_POOL_MAX", 5);
    let port = u16::try_from(parse_env_u32!("PORT", 8080))
        .map_err(|_| anyhow!("PORT out of range"))?;

    Ok(Config {
        db_url,
        db_pool_max,
        iqair_base_url,
        iqair_api_key,
        port,
    })
}

impl Config {
    /// Log the loaded configuration for debugging purposes.
    ///
    /// Masks the database password and the IQAir API key while showing
    /// all configuration values that were loaded.
    pub fn log_config(&self) {
        // ---
        // Mask the password in the database URL for security
        let masked_db_url = if let Some(at_pos) = self.db_url.rfind('@') {
            if let Some(colon_pos) = self.db_url[..at_pos].rfind(':') {
                format!(
                    "{}:****{}",
                    &self.db_url[..colon_pos],
                    &self.db_url[at_pos..]
                )
            } else {
                self.db_url.clone()
            }
        } else {
            self.db_url.clone()
        };

        tracing::info!("Configuration loaded:");
        tracing::info!("  DATABASE_URL   : {}", masked_db_url);
        tracing::info!("  IQAIR_BASE_URL : {}", self.iqair_base_url);
        tracing::info!("  IQAIR_API_KEY  : ****");
        tracing::info!("  DB_POOL_MAX    : {}", self.db_pool_max);
        tracing::info!("  PORT           : {}", self.port);
    }
}
