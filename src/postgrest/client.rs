use super::types::{self, ApiError, RowId, StatusPatch};
use crate::db::{RoomStore, StoreError};
use crate::models::room::PURGEABLE_STATUSES;
use crate::models::{RoomCode, RoomStatus, RoomSummary};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

const TABLE: &str = "programs";

/// Client for the REST API (PostgREST) of the hosted database
#[derive(Clone)]
pub struct PostgrestClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl PostgrestClient {
    pub fn new(url: &str, api_key: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, TABLE)
    }

    /// Attach the API key the way the hosted gateway expects it
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    /// Send a request and decode a JSON body, turning non-2xx into StoreError::Api
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, StoreError> {
        let response = self.authorize(request).send().await?;
        let response = check_status(response).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))
    }
}

async fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ApiError>(&body) {
        Ok(err) => err.describe(),
        Err(_) if body.is_empty() => status.to_string(),
        Err(_) => body,
    };

    Err(StoreError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl RoomStore for PostgrestClient {
    async fn find_summary(&self, code: &RoomCode) -> Result<Option<RoomSummary>, StoreError> {
        let request = self
            .client
            .get(self.table_url())
            .query(&types::summary_query(code.as_str()));

        let rooms: Vec<RoomSummary> = self.send(request).await?;
        Ok(rooms.into_iter().next())
    }

    async fn deactivate_idle(
        &self,
        idle_before: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Vec<String>, StoreError> {
        let request = self
            .client
            .patch(self.table_url())
            .query(&types::idle_filter(idle_before))
            .header("Prefer", "return=representation")
            .json(&StatusPatch {
                status: RoomStatus::Inactive,
                ended_at: now,
            });

        let rows: Vec<RowId> = self.send(request).await?;
        Ok(rows.into_iter().map(|row| row.id).collect())
    }

    async fn purge_ended(&self, cutoff: DateTime<Utc>) -> Result<Vec<String>, StoreError> {
        let request = self
            .client
            .delete(self.table_url())
            .query(&types::purge_filter(PURGEABLE_STATUSES, cutoff))
            .header("Prefer", "return=representation");

        let rows: Vec<RowId> = self.send(request).await?;
        Ok(rows.into_iter().map(|row| row.id).collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let request = self
            .client
            .get(self.table_url())
            .query(&types::probe_query());

        let _: Vec<serde_json::Value> = self.send(request).await?;
        Ok(())
    }
}
