pub mod room;

pub use room::{Room, RoomCode, RoomStatus, RoomSummary};
