//! Message entity

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Serialize, Debug, Clone, FromRow)]
pub struct Message {
    pub message_id: i32,
    pub room_id: i32,
    pub sender_id: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct MessageWithSender {
    #[sqlx(flatten)]
    pub message: Message,
    pub sender_name: String,
}
