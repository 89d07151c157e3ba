//! ChatRoomRepository - chat room registry

use super::Read;
use crate::entities::{ChatRoom, RoomOverview};
use sqlx::{Error, SqlitePool};
use tracing::{debug, instrument};

// Rooms are only ever created by JoinRequestRepository::accept_and_provision.
pub struct ChatRoomRepository {
    connection_pool: SqlitePool,
}

impl ChatRoomRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Every room where the user is host or requester
    #[instrument(skip(self))]
    pub async fn find_overviews_for_user(&self, user_id: &i32) -> Result<Vec<RoomOverview>, Error> {
        let rooms = sqlx::query_as::<_, RoomOverview>(
            r#"
            SELECT c.room_id, c.trip_id, c.host_id, c.requester_id, c.created_at,
                   h.username AS host_name, q.username AS requester_name, t.destination
            FROM chat_rooms c
            JOIN users h ON h.user_id = c.host_id
            JOIN users q ON q.user_id = c.requester_id
            JOIN trips t ON t.trip_id = c.trip_id
            WHERE c.host_id = ? OR c.requester_id = ?
            ORDER BY c.room_id ASC
            "#,
        )
        .bind(user_id)
        .bind(user_id)
        .fetch_all(&self.connection_pool)
        .await?;

        debug!("User participates in {} rooms", rooms.len());
        Ok(rooms)
    }
}

impl Read<ChatRoom, i32> for ChatRoomRepository {
    #[instrument(skip(self), fields(room_id = %id))]
    async fn read(&self, id: &i32) -> Result<Option<ChatRoom>, Error> {
        let room = sqlx::query_as::<_, ChatRoom>(
            r#"
            SELECT room_id, trip_id, host_id, requester_id, created_at
            FROM chat_rooms
            WHERE room_id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(room)
    }
}
