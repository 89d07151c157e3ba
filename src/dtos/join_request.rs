//! Join request DTOs

use crate::dtos::ChatRoomDTO;
use crate::entities::{JoinRequest, PendingRequest, RequestStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug)]
pub struct JoinRequestDTO {
    pub request_id: i32,
    pub trip_id: i32,
    pub requester_id: i32,
    pub host_id: i32,
    pub message: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

impl From<JoinRequest> for JoinRequestDTO {
    fn from(value: JoinRequest) -> Self {
        Self {
            request_id: value.request_id,
            trip_id: value.trip_id,
            requester_id: value.requester_id,
            host_id: value.host_id,
            message: value.message,
            status: value.status,
            created_at: value.created_at,
        }
    }
}

/// Entry of the host's inbox
#[derive(Serialize, Deserialize, Debug)]
pub struct PendingRequestDTO {
    #[serde(flatten)]
    pub request: JoinRequestDTO,
    pub requester_name: String,
    pub destination: String,
}

impl From<PendingRequest> for PendingRequestDTO {
    fn from(value: PendingRequest) -> Self {
        Self {
            request: JoinRequestDTO::from(value.request),
            requester_name: value.requester_name,
            destination: value.destination,
        }
    }
}

/// Body of a request-to-join call
#[derive(Deserialize, Debug, Clone, Validate)]
pub struct JoinRequestBodyDTO {
    #[validate(length(min = 1, max = 1000, message = "Message must be between 1 and 1000 characters"))]
    pub message: String,
}

/// DTO to create a new join request (status starts as pending)
#[derive(Debug, Clone)]
pub struct CreateJoinRequestDTO {
    pub trip_id: i32,
    pub requester_id: i32,
    pub host_id: i32,
    pub message: String,
}

/// Outcome of resolving a request; `room` is set only on acceptance
#[derive(Serialize, Deserialize, Debug)]
pub struct ResolveOutcomeDTO {
    pub request_id: i32,
    pub status: RequestStatus,
    pub room: Option<ChatRoomDTO>,
}
