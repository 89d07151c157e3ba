//! JoinRequestRepository - join-request workflow and transactional acceptance

use super::{Create, Read};
use crate::dtos::CreateJoinRequestDTO;
use crate::entities::{ChatRoom, JoinRequest, PendingRequest, RequestStatus};
use chrono::Utc;
use sqlx::{Error, SqlitePool};
use tracing::{debug, info, instrument, warn};

pub struct JoinRequestRepository {
    connection_pool: SqlitePool,
}

impl JoinRequestRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Pending requests addressed to a host, with requester name and trip destination
    #[instrument(skip(self))]
    pub async fn find_pending_for_host(&self, host_id: &i32) -> Result<Vec<PendingRequest>, Error> {
        let requests = sqlx::query_as::<_, PendingRequest>(
            r#"
            SELECT r.request_id, r.trip_id, r.requester_id, r.host_id, r.message, r.status,
                   r.created_at, u.username AS requester_name, t.destination
            FROM join_requests r
            JOIN users u ON u.user_id = r.requester_id
            JOIN trips t ON t.trip_id = r.trip_id
            WHERE r.host_id = ? AND r.status = 'pending'
            ORDER BY r.created_at ASC, r.request_id ASC
            "#,
        )
        .bind(host_id)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(requests)
    }

    /// Check if the requester already has a pending request for the trip
    #[instrument(skip(self))]
    pub async fn has_pending_request(&self, trip_id: &i32, requester_id: &i32) -> Result<bool, Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM join_requests WHERE trip_id = ? AND requester_id = ? AND status = 'pending'",
        )
        .bind(trip_id)
        .bind(requester_id)
        .fetch_one(&self.connection_pool)
        .await?;

        Ok(count > 0)
    }

    /// Accepts a pending request and provisions the roster entry and chat room.
    ///
    /// Everything runs in one transaction. The status update is conditional on
    /// `status = 'pending'`, so of two concurrent acceptances only one commits.
    ///
    /// # Returns
    /// * `Ok(Some(room))` - request accepted, room of (trip, host, requester)
    /// * `Ok(None)` - the request was no longer pending, nothing written
    #[instrument(skip(self, request), fields(request_id = %request.request_id))]
    pub async fn accept_and_provision(&self, request: &JoinRequest) -> Result<Option<ChatRoom>, Error> {
        debug!("Accepting join request");
        let now = Utc::now();
        let mut tx = self.connection_pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE join_requests SET status = ? WHERE request_id = ? AND status = 'pending'",
        )
        .bind(RequestStatus::Accepted)
        .bind(request.request_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            warn!("Join request is no longer pending, rolling back");
            tx.rollback().await?;
            return Ok(None);
        }

        sqlx::query(
            r#"
            INSERT INTO trip_participants (trip_id, user_id, joined_at)
            VALUES (?, ?, ?)
            ON CONFLICT (trip_id, user_id) DO NOTHING
            "#,
        )
        .bind(request.trip_id)
        .bind(request.requester_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        // a room left by an earlier acceptance of the same pair is reused
        sqlx::query(
            r#"
            INSERT INTO chat_rooms (trip_id, host_id, requester_id, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (trip_id, host_id, requester_id) DO NOTHING
            "#,
        )
        .bind(request.trip_id)
        .bind(request.host_id)
        .bind(request.requester_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let room = sqlx::query_as::<_, ChatRoom>(
            r#"
            SELECT room_id, trip_id, host_id, requester_id, created_at
            FROM chat_rooms
            WHERE trip_id = ? AND host_id = ? AND requester_id = ?
            "#,
        )
        .bind(request.trip_id)
        .bind(request.host_id)
        .bind(request.requester_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(room_id = room.room_id, "Join request accepted, participant and chat room provisioned");
        Ok(Some(room))
    }

    /// Rejects a pending request.
    ///
    /// # Returns
    /// * `Ok(true)` - request rejected
    /// * `Ok(false)` - the request was no longer pending
    #[instrument(skip(self))]
    pub async fn reject(&self, request_id: &i32) -> Result<bool, Error> {
        let updated = sqlx::query(
            "UPDATE join_requests SET status = ? WHERE request_id = ? AND status = 'pending'",
        )
        .bind(RequestStatus::Rejected)
        .bind(request_id)
        .execute(&self.connection_pool)
        .await?;

        Ok(updated.rows_affected() == 1)
    }
}

impl Create<JoinRequest, CreateJoinRequestDTO> for JoinRequestRepository {
    #[instrument(skip(self, data), fields(trip_id = %data.trip_id, requester_id = %data.requester_id))]
    async fn create(&self, data: &CreateJoinRequestDTO) -> Result<JoinRequest, Error> {
        let now = Utc::now();
        let status = RequestStatus::Pending;

        let result = sqlx::query(
            r#"
            INSERT INTO join_requests (trip_id, requester_id, host_id, message, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(data.trip_id)
        .bind(data.requester_id)
        .bind(data.host_id)
        .bind(&data.message)
        .bind(status)
        .bind(now)
        .execute(&self.connection_pool)
        .await?;

        let new_id = result.last_insert_rowid() as i32;
        info!("Join request created with id {}", new_id);

        Ok(JoinRequest {
            request_id: new_id,
            trip_id: data.trip_id,
            requester_id: data.requester_id,
            host_id: data.host_id,
            message: data.message.clone(),
            status,
            created_at: now,
        })
    }
}

impl Read<JoinRequest, i32> for JoinRequestRepository {
    #[instrument(skip(self), fields(request_id = %id))]
    async fn read(&self, id: &i32) -> Result<Option<JoinRequest>, Error> {
        let request = sqlx::query_as::<_, JoinRequest>(
            r#"
            SELECT request_id, trip_id, requester_id, host_id, message, status, created_at
            FROM join_requests
            WHERE request_id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(request)
    }
}
