//! Commands module - CLI command implementations.
//!
//! Each command is implemented in its own module for separation of concerns.

pub mod migrate;
pub mod requests;
pub mod users;

use serde::Serialize;

use common::{AppError, AppResult};

use crate::config::IdCardServiceConfig;
use crate::infra::Database;
use crate::service::Services;

/// Connect, apply pending migrations and wire the services.
async fn connect_services(config: &IdCardServiceConfig) -> AppResult<Services> {
    let db = Database::connect(&config.database)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;
    Ok(Services::new(&db))
}

/// Print a command result as pretty JSON on stdout.
fn print_json<T: Serialize + ?Sized>(value: &T) -> AppResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::internal(format!("Failed to render output: {}", e)))?;
    println!("{}", rendered);
    Ok(())
}
