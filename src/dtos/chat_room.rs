//! Chat room DTOs

use crate::entities::{ChatRoom, RoomOverview};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChatRoomDTO {
    pub room_id: i32,
    pub trip_id: i32,
    pub host_id: i32,
    pub requester_id: i32,
    pub created_at: DateTime<Utc>,
}

impl From<ChatRoom> for ChatRoomDTO {
    fn from(value: ChatRoom) -> Self {
        Self {
            room_id: value.room_id,
            trip_id: value.trip_id,
            host_id: value.host_id,
            requester_id: value.requester_id,
            created_at: value.created_at,
        }
    }
}

/// Room as listed for one of its participants
#[derive(Serialize, Deserialize, Debug)]
pub struct RoomSummaryDTO {
    #[serde(flatten)]
    pub room: ChatRoomDTO,
    pub destination: String,
    pub peer_id: i32,
    pub peer_name: String,
}

impl RoomSummaryDTO {
    pub fn for_user(overview: RoomOverview, user_id: i32) -> Self {
        let RoomOverview {
            room,
            host_name,
            requester_name,
            destination,
        } = overview;
        let peer_id = room.peer_of(user_id);
        let peer_name = if peer_id == room.host_id {
            host_name
        } else {
            requester_name
        };
        Self {
            room: ChatRoomDTO::from(room),
            destination,
            peer_id,
            peer_name,
        }
    }
}
