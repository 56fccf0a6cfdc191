//! ID card service configuration.

use std::env;

use common::{DatabaseConfig, LoggingConfig};

/// ID card service configuration.
#[derive(Debug, Clone, Default)]
pub struct IdCardServiceConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

impl IdCardServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            database: DatabaseConfig {
                url: env::var("IDCARD_DATABASE_URL")
                    .or_else(|_| env::var("DATABASE_URL"))
                    .unwrap_or(defaults.database.url),
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.database.max_connections),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.database.min_connections),
            },
            logging: LoggingConfig {
                level: env::var("RUST_LOG").unwrap_or(defaults.logging.level),
            },
        }
    }

    /// Override the database URL (e.g. from a CLI flag).
    pub fn with_database_url(mut self, url: impl Into<String>) -> Self {
        self.database.url = url.into();
        self
    }
}
