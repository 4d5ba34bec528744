//! Room lifecycle policy: ages out idle rooms and purges old ones.
//!
//! The job is triggered from outside (a scheduler hitting the cleanup endpoint).
//! Its two steps are independent and convergent, so overlapping or repeated
//! runs only ever re-apply the same thresholds.

use crate::config::LifecyclePolicy;
use crate::db::RoomStore;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Outcome of one cleanup run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupReport {
    pub marked_inactive: usize,
    pub deleted: usize,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CleanupError {
    #[error("Cannot compute cleanup threshold {threshold} before {now}")]
    Threshold {
        threshold: Duration,
        now: DateTime<Utc>,
    },
}

fn cutoff(now: DateTime<Utc>, threshold: Duration) -> Result<DateTime<Utc>, CleanupError> {
    now.checked_sub_signed(threshold)
        .ok_or(CleanupError::Threshold { threshold, now })
}

/// Run both cleanup steps against the store.
///
/// A store error in either step is logged and counted as zero; the other
/// step still runs. Only an uncomputable threshold fails the run.
pub async fn run(
    store: &dyn RoomStore,
    policy: &LifecyclePolicy,
    now: DateTime<Utc>,
) -> Result<CleanupReport, CleanupError> {
    let idle_before = cutoff(now, policy.idle_after)?;
    let retain_cutoff = cutoff(now, policy.retain_for)?;

    let marked_inactive = match store.deactivate_idle(idle_before, now).await {
        Ok(ids) => {
            tracing::debug!("Marked inactive: {:?}", ids);
            tracing::info!("Marked {} rooms as inactive", ids.len());
            ids.len()
        }
        Err(e) => {
            tracing::error!("Error marking rooms inactive: {}", e);
            0
        }
    };

    let deleted = match store.purge_ended(retain_cutoff).await {
        Ok(ids) => {
            tracing::debug!("Deleted: {:?}", ids);
            tracing::info!("Deleted {} old rooms", ids.len());
            ids.len()
        }
        Err(e) => {
            tracing::error!("Error deleting old rooms: {}", e);
            0
        }
    };

    Ok(CleanupReport {
        marked_inactive,
        deleted,
        timestamp: now,
    })
}
