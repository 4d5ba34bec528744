use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// A row of the `programs` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub status: RoomStatus,
    pub last_activity: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

/// The columns the lobby page needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RoomSummary {
    pub id: String,
    pub title: String,
    pub created_by: String,
}

/// Room status as stored in the `status` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Active,
    Inactive,
    Ended,
    Completed,
    Cancelled,
}

/// Statuses the cleanup job is allowed to delete
pub const PURGEABLE_STATUSES: &[RoomStatus] = &[RoomStatus::Inactive, RoomStatus::Ended];

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Active => "active",
            RoomStatus::Inactive => "inactive",
            RoomStatus::Ended => "ended",
            RoomStatus::Completed => "completed",
            RoomStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown room status: {0}")]
pub struct UnknownStatus(String);

impl FromStr for RoomStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(RoomStatus::Active),
            "inactive" => Ok(RoomStatus::Inactive),
            "ended" => Ok(RoomStatus::Ended),
            "completed" => Ok(RoomStatus::Completed),
            "cancelled" => Ok(RoomStatus::Cancelled),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A room code as typed by a user: exactly four ASCII digits
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomCode(String);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid room code - must be 4 digits")]
pub struct InvalidRoomCode;

impl RoomCode {
    pub const LEN: usize = 4;

    pub fn parse(code: &str) -> Result<Self, InvalidRoomCode> {
        if code.len() == Self::LEN && code.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(code.to_string()))
        } else {
            Err(InvalidRoomCode)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
