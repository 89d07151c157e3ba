//! ChatRoom entity - private channel between a trip host and an accepted requester

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Serialize, Debug, Clone, FromRow)]
pub struct ChatRoom {
    pub room_id: i32,
    pub trip_id: i32,
    pub host_id: i32,
    pub requester_id: i32,
    pub created_at: DateTime<Utc>,
}

impl ChatRoom {
    /// The only two users allowed to read or write in the room
    pub fn has_participant(&self, user_id: i32) -> bool {
        self.host_id == user_id || self.requester_id == user_id
    }

    /// The other participant, seen from `user_id`
    pub fn peer_of(&self, user_id: i32) -> i32 {
        if self.host_id == user_id {
            self.requester_id
        } else {
            self.host_id
        }
    }
}

/// Room joined with both participants' names and the trip destination
#[derive(Debug, Clone, FromRow)]
pub struct RoomOverview {
    #[sqlx(flatten)]
    pub room: ChatRoom,
    pub host_name: String,
    pub requester_name: String,
    pub destination: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> ChatRoom {
        ChatRoom {
            room_id: 1,
            trip_id: 7,
            host_id: 10,
            requester_id: 20,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_participants_are_exactly_host_and_requester() {
        let room = room();
        assert!(room.has_participant(10));
        assert!(room.has_participant(20));
        assert!(!room.has_participant(30));
    }

    #[test]
    fn test_peer_of() {
        let room = room();
        assert_eq!(room.peer_of(10), 20);
        assert_eq!(room.peer_of(20), 10);
    }
}
