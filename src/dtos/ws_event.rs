//! WebSocket Event DTOs

use crate::dtos::MessageDTO;
use serde::{Deserialize, Serialize};

/// Frames the server pushes to a connected client.
/// Serde serializes this as:
/// { "type": "newMessage", "data": { ... } }
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum WsEventDTO {
    NewMessage(MessageDTO),
    RoomJoined { room_id: i32 },
    RoomLeft { room_id: i32 },
    Error { code: u16, message: String },
}

/// Frames a client sends to manage its room subscriptions:
/// { "type": "joinRoom", "room_id": 3 }
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientEventDTO {
    JoinRoom { room_id: i32 },
    LeaveRoom { room_id: i32 },
}
