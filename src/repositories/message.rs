//! MessageRepository - message store

use super::Create;
use crate::dtos::CreateMessageDTO;
use crate::entities::{Message, MessageWithSender};
use chrono::Utc;
use sqlx::{Error, SqlitePool};
use tracing::{debug, instrument};

pub struct MessageRepository {
    connection_pool: SqlitePool,
}

impl MessageRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// All messages of a room in persisted order, with the sender's username.
    /// The row id is the order; timestamps are taken at insert and follow it.
    #[instrument(skip(self))]
    pub async fn find_many_by_room_id(&self, room_id: &i32) -> Result<Vec<MessageWithSender>, Error> {
        let messages = sqlx::query_as::<_, MessageWithSender>(
            r#"
            SELECT m.message_id, m.room_id, m.sender_id, m.content, m.created_at,
                   u.username AS sender_name
            FROM messages m
            JOIN users u ON u.user_id = m.sender_id
            WHERE m.room_id = ?
            ORDER BY m.message_id ASC
            "#,
        )
        .bind(room_id)
        .fetch_all(&self.connection_pool)
        .await?;

        debug!("Loaded {} messages", messages.len());
        Ok(messages)
    }
}

impl Create<Message, CreateMessageDTO> for MessageRepository {
    #[instrument(skip(self, data), fields(room_id = %data.room_id, sender_id = %data.sender_id))]
    async fn create(&self, data: &CreateMessageDTO) -> Result<Message, Error> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO messages (room_id, sender_id, content, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(data.room_id)
        .bind(data.sender_id)
        .bind(&data.content)
        .bind(now)
        .execute(&self.connection_pool)
        .await?;

        let new_id = result.last_insert_rowid() as i32;

        Ok(Message {
            message_id: new_id,
            room_id: data.room_id,
            sender_id: data.sender_id,
            content: data.content.clone(),
            created_at: now,
        })
    }
}
