pub mod room;
#[cfg(test)]
pub mod memory;

use crate::config::BackendConfig;
use crate::models::{RoomCode, RoomSummary};
use crate::postgrest::PostgrestClient;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),
}

/// Everything the lobby and the cleanup job need from the `programs` table
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Point lookup by room code, selecting only the lobby columns
    async fn find_summary(&self, code: &RoomCode) -> Result<Option<RoomSummary>, StoreError>;

    /// Mark active rooms idle since before `idle_before` as inactive, stamping `ended_at = now`.
    /// Returns the ids of the updated rows.
    async fn deactivate_idle(
        &self,
        idle_before: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Vec<String>, StoreError>;

    /// Delete inactive/ended rooms that ended or were created before `cutoff`.
    /// Returns the ids of the deleted rows.
    async fn purge_ended(&self, cutoff: DateTime<Utc>) -> Result<Vec<String>, StoreError>;

    /// Cheap connectivity probe against the table
    async fn ping(&self) -> Result<(), StoreError>;
}

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
}

/// Build the room store for the configured backend
pub async fn connect(backend: &BackendConfig) -> anyhow::Result<Arc<dyn RoomStore>> {
    use anyhow::Context;

    match backend {
        BackendConfig::Rest { url, api_key } => {
            tracing::info!("Using database REST API at {}", url);
            let client = PostgrestClient::new(url, api_key)
                .context("Failed to build database REST client")?;
            Ok(Arc::new(client))
        }
        BackendConfig::Postgres { database_url } => {
            tracing::info!("Connecting to Postgres");
            let pool = create_pool(database_url).await
                .context("Failed to create database pool")?;

            tracing::info!("Running database migrations");
            run_migrations(&pool).await
                .context("Failed to run migrations")?;

            Ok(Arc::new(room::PgRoomStore::new(pool)))
        }
    }
}
