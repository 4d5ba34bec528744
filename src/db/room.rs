use super::{RoomStore, StoreError};
use crate::models::room::PURGEABLE_STATUSES;
use crate::models::{RoomCode, RoomStatus, RoomSummary};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// Room store backed by a direct Postgres connection
pub struct PgRoomStore {
    pool: PgPool,
}

impl PgRoomStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoomStore for PgRoomStore {
    async fn find_summary(&self, code: &RoomCode) -> Result<Option<RoomSummary>, StoreError> {
        let room = sqlx::query_as::<_, RoomSummary>(
            "SELECT id, title, created_by FROM programs WHERE id = $1"
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await?;
        Ok(room)
    }

    async fn deactivate_idle(
        &self,
        idle_before: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Vec<String>, StoreError> {
        let ids = sqlx::query_scalar::<_, String>(
            "UPDATE programs SET status = $1, ended_at = $2
             WHERE status = $3 AND last_activity < $4
             RETURNING id"
        )
        .bind(RoomStatus::Inactive.as_str())
        .bind(now)
        .bind(RoomStatus::Active.as_str())
        .bind(idle_before)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    async fn purge_ended(&self, cutoff: DateTime<Utc>) -> Result<Vec<String>, StoreError> {
        let statuses: Vec<&str> = PURGEABLE_STATUSES.iter().map(|s| s.as_str()).collect();
        let ids = sqlx::query_scalar::<_, String>(
            "DELETE FROM programs
             WHERE status = ANY($1) AND (ended_at < $2 OR created_at < $2)
             RETURNING id"
        )
        .bind(statuses)
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT id FROM programs LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;
        Ok(())
    }
}
