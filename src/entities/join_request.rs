//! JoinRequest entity

use super::enums::RequestStatus;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Serialize, Debug, Clone, FromRow)]
pub struct JoinRequest {
    pub request_id: i32,
    pub trip_id: i32,
    pub requester_id: i32,
    // copied from the trip so the host inbox is a single indexed lookup
    pub host_id: i32,
    pub message: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

/// Pending request as shown in the host's inbox
#[derive(Debug, Clone, FromRow)]
pub struct PendingRequest {
    #[sqlx(flatten)]
    pub request: JoinRequest,
    pub requester_name: String,
    pub destination: String,
}
