use crate::AppState;
use crate::db::{RoomStore, StoreError};
use crate::models::RoomCode;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

/// Data the lobby page renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LobbyPage {
    pub code: String,
    pub room: LobbyRoom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyRoom {
    pub id: String,
    pub title: String,
    pub created_by: String,
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("Invalid room code - must be 4 digits")]
    BadRequest,

    #[error("Room not found")]
    NotFound,

    #[error("Failed to load room")]
    Internal(#[source] StoreError),
}

impl LookupError {
    pub fn status(&self) -> StatusCode {
        match self {
            LookupError::BadRequest => StatusCode::BAD_REQUEST,
            LookupError::NotFound => StatusCode::NOT_FOUND,
            LookupError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for LookupError {
    fn into_response(self) -> Response {
        // The cause stays in the logs; clients only get the generic message
        if let LookupError::Internal(ref cause) = self {
            tracing::error!("Failed to load room: {}", cause);
        }
        (self.status(), Json(json!({ "message": self.to_string() }))).into_response()
    }
}

/// Validate a room code and load the lobby view of that room
pub async fn lookup_room(store: &dyn RoomStore, code: &str) -> Result<LobbyPage, LookupError> {
    let code = RoomCode::parse(code).map_err(|_| LookupError::BadRequest)?;

    let room = store
        .find_summary(&code)
        .await
        .map_err(LookupError::Internal)?
        .ok_or(LookupError::NotFound)?;

    Ok(LobbyPage {
        code: code.to_string(),
        room: LobbyRoom {
            id: room.id,
            title: room.title,
            created_by: room.created_by,
        },
    })
}

/// GET /lobby/:code
pub async fn handle_lobby(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
) -> Response {
    // A segment that is not valid UTF-8 is as malformed as any other bad code
    let code = match path {
        Ok(Path(code)) => code,
        Err(rejection) => {
            tracing::debug!("Rejected room code path: {}", rejection.body_text());
            return LookupError::BadRequest.into_response();
        }
    };

    match lookup_room(state.store.as_ref(), &code).await {
        Ok(page) => {
            tracing::info!("Loaded lobby for room {}", page.code);
            Json(page).into_response()
        }
        Err(err @ LookupError::BadRequest) => {
            tracing::debug!("Rejected malformed room code {:?}", code);
            err.into_response()
        }
        Err(err @ LookupError::NotFound) => {
            tracing::info!("Room {} not found", code);
            err.into_response()
        }
        Err(err @ LookupError::Internal(_)) => err.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryRoomStore;
    use crate::models::{Room, RoomStatus};
    use chrono::Utc;

    fn trivia_night() -> Room {
        let now = Utc::now();
        Room {
            id: "1234".to_string(),
            title: "Trivia Night".to_string(),
            description: Some("Bring a pencil".to_string()),
            created_by: "u1".to_string(),
            created_at: now,
            status: RoomStatus::Active,
            last_activity: Some(now),
            ended_at: None,
        }
    }

    #[tokio::test]
    async fn test_lookup_existing_room() {
        let store = MemoryRoomStore::with_rooms(vec![trivia_night()]);

        let page = lookup_room(&store, "1234").await.unwrap();

        assert_eq!(
            page,
            LobbyPage {
                code: "1234".to_string(),
                room: LobbyRoom {
                    id: "1234".to_string(),
                    title: "Trivia Night".to_string(),
                    created_by: "u1".to_string(),
                },
            }
        );
    }

    #[tokio::test]
    async fn test_malformed_codes_never_reach_the_store() {
        let store = MemoryRoomStore::with_rooms(vec![trivia_night()]);

        for code in ["", "123", "12345", "abcd", "12 4", "-123"] {
            let err = lookup_room(&store, code).await.unwrap_err();
            assert!(matches!(err, LookupError::BadRequest), "code {:?}", code);
        }
        assert_eq!(store.queries(), 0);
    }

    #[tokio::test]
    async fn test_missing_room_is_not_found() {
        let store = MemoryRoomStore::with_rooms(vec![trivia_night()]);

        let err = lookup_room(&store, "9999").await.unwrap_err();

        assert!(matches!(err, LookupError::NotFound));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_store_failure_is_internal_error() {
        let store = MemoryRoomStore::with_rooms(vec![trivia_night()]);
        store.fail_lookup();

        let err = lookup_room(&store, "1234").await.unwrap_err();

        assert!(matches!(err, LookupError::Internal(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to load room");
    }

    #[test]
    fn test_page_serializes_created_by_in_camel_case() {
        let page = LobbyPage {
            code: "1234".to_string(),
            room: LobbyRoom {
                id: "1234".to_string(),
                title: "Trivia Night".to_string(),
                created_by: "u1".to_string(),
            },
        };

        assert_eq!(
            serde_json::to_value(&page).unwrap(),
            json!({
                "code": "1234",
                "room": { "id": "1234", "title": "Trivia Night", "createdBy": "u1" }
            })
        );
    }
}
