use crate::models::RoomStatus;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Body of the PATCH that marks idle rooms inactive
#[derive(Debug, Serialize)]
pub struct StatusPatch {
    pub status: RoomStatus,
    pub ended_at: DateTime<Utc>,
}

/// Row shape requested back from mutations (`select=id`); only the count matters
#[derive(Debug, Deserialize)]
pub struct RowId {
    pub id: String,
}

/// Error body returned by PostgREST on non-2xx responses
#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl ApiError {
    /// Flatten into a single line for logs and StoreError
    pub fn describe(&self) -> String {
        let mut text = self.message.clone();
        if let Some(code) = &self.code {
            text = format!("{} [{}]", text, code);
        }
        if let Some(details) = &self.details {
            text = format!("{} ({})", text, details);
        }
        if let Some(hint) = &self.hint {
            text = format!("{}; hint: {}", text, hint);
        }
        text
    }
}

/// Timestamps go into filters as RFC 3339 with millisecond precision and a `Z` suffix
pub fn timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `id=eq.1234`, limited to the lobby columns
pub fn summary_query(code: &str) -> Vec<(&'static str, String)> {
    vec![
        ("select", "id,title,created_by".to_string()),
        ("id", format!("eq.{}", code)),
        ("limit", "1".to_string()),
    ]
}

/// Active rooms whose last activity is older than `idle_before`
pub fn idle_filter(idle_before: DateTime<Utc>) -> Vec<(&'static str, String)> {
    vec![
        ("status", format!("eq.{}", RoomStatus::Active)),
        ("last_activity", format!("lt.{}", timestamp(idle_before))),
        ("select", "id".to_string()),
    ]
}

/// Purgeable rooms that ended, or were created, before `cutoff`
pub fn purge_filter(statuses: &[RoomStatus], cutoff: DateTime<Utc>) -> Vec<(&'static str, String)> {
    let statuses = statuses
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(",");
    let cutoff = timestamp(cutoff);
    vec![
        ("status", format!("in.({})", statuses)),
        ("or", format!("(ended_at.lt.{},created_at.lt.{})", cutoff, cutoff)),
        ("select", "id".to_string()),
    ]
}

pub fn probe_query() -> Vec<(&'static str, String)> {
    vec![
        ("select", "id".to_string()),
        ("limit", "1".to_string()),
    ]
}
