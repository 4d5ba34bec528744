use super::{RoomStore, StoreError};
use crate::models::room::PURGEABLE_STATUSES;
use crate::models::{Room, RoomCode, RoomStatus, RoomSummary};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// In-process room store for tests. Filters mirror the SQL used by the real
/// backends, including NULL timestamps never comparing as older.
#[derive(Default)]
pub struct MemoryRoomStore {
    rooms: Mutex<Vec<Room>>,
    queries: AtomicUsize,
    fail_lookup: AtomicBool,
    fail_deactivate: AtomicBool,
    fail_purge: AtomicBool,
}

impl MemoryRoomStore {
    pub fn with_rooms(rooms: Vec<Room>) -> Self {
        Self {
            rooms: Mutex::new(rooms),
            ..Default::default()
        }
    }

    pub fn rooms(&self) -> Vec<Room> {
        self.rooms.lock().unwrap().clone()
    }

    pub fn get(&self, id: &str) -> Option<Room> {
        self.rooms.lock().unwrap().iter().find(|r| r.id == id).cloned()
    }

    /// Number of calls that reached the store
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn fail_lookup(&self) {
        self.fail_lookup.store(true, Ordering::SeqCst);
    }

    pub fn fail_deactivate(&self) {
        self.fail_deactivate.store(true, Ordering::SeqCst);
    }

    pub fn fail_purge(&self) {
        self.fail_purge.store(true, Ordering::SeqCst);
    }

    fn hit(&self, fail: &AtomicBool) -> Result<(), StoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if fail.load(Ordering::SeqCst) {
            return Err(StoreError::Api {
                status: 503,
                message: "connection refused".to_string(),
            });
        }
        Ok(())
    }
}

fn before(ts: Option<DateTime<Utc>>, cutoff: DateTime<Utc>) -> bool {
    ts.is_some_and(|ts| ts < cutoff)
}

#[async_trait]
impl RoomStore for MemoryRoomStore {
    async fn find_summary(&self, code: &RoomCode) -> Result<Option<RoomSummary>, StoreError> {
        self.hit(&self.fail_lookup)?;
        Ok(self.get(code.as_str()).map(|room| RoomSummary {
            id: room.id,
            title: room.title,
            created_by: room.created_by,
        }))
    }

    async fn deactivate_idle(
        &self,
        idle_before: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Vec<String>, StoreError> {
        self.hit(&self.fail_deactivate)?;
        let mut rooms = self.rooms.lock().unwrap();
        let mut updated = Vec::new();
        for room in rooms.iter_mut() {
            if room.status == RoomStatus::Active && before(room.last_activity, idle_before) {
                room.status = RoomStatus::Inactive;
                room.ended_at = Some(now);
                updated.push(room.id.clone());
            }
        }
        Ok(updated)
    }

    async fn purge_ended(&self, cutoff: DateTime<Utc>) -> Result<Vec<String>, StoreError> {
        self.hit(&self.fail_purge)?;
        let mut rooms = self.rooms.lock().unwrap();
        let (deleted, kept): (Vec<Room>, Vec<Room>) = rooms.drain(..).partition(|room| {
            PURGEABLE_STATUSES.contains(&room.status)
                && (before(room.ended_at, cutoff) || before(Some(room.created_at), cutoff))
        });
        *rooms = kept;
        Ok(deleted.into_iter().map(|room| room.id).collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.hit(&self.fail_lookup)
    }
}
