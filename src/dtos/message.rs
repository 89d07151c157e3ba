//! Message DTOs

use crate::entities::MessageWithSender;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Message as returned by the history endpoint and pushed to live subscribers
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MessageDTO {
    pub message_id: i32,
    pub room_id: i32,
    pub sender_id: i32,
    pub sender_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<MessageWithSender> for MessageDTO {
    fn from(value: MessageWithSender) -> Self {
        Self {
            message_id: value.message.message_id,
            room_id: value.message.room_id,
            sender_id: value.message.sender_id,
            sender_name: value.sender_name,
            content: value.message.content,
            created_at: value.message.created_at,
        }
    }
}

/// Body of a send-message call
#[derive(Deserialize, Debug, Clone, Validate)]
pub struct SendMessageDTO {
    #[validate(length(min = 1, max = 5000, message = "Message content must be between 1 and 5000 characters"))]
    pub content: String,
}

/// DTO to create a new message (without message_id)
#[derive(Debug, Clone)]
pub struct CreateMessageDTO {
    pub room_id: i32,
    pub sender_id: i32,
    pub content: String,
}
