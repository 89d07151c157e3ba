//! Join request services - asking to join a trip and the host's decision

use crate::core::{AppError, AppState};
use crate::dtos::{
    ChatRoomDTO, CreateJoinRequestDTO, JoinRequestBodyDTO, JoinRequestDTO, PendingRequestDTO,
    ResolveOutcomeDTO,
};
use crate::entities::{ResolveAction, User};
use crate::repositories::{Create, Read};
use axum::{
    Extension,
    extract::{Json, Path, State},
    http::StatusCode,
};
use axum_macros::debug_handler;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

#[debug_handler]
#[instrument(skip(state, current_user, body), fields(trip_id = %trip_id, user_id = %current_user.user_id))]
pub async fn request_to_join(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(trip_id): Path<i32>,
    Json(body): Json<JoinRequestBodyDTO>,
) -> Result<(StatusCode, Json<JoinRequestDTO>), AppError> {
    debug!("Submitting join request");
    // 1. Validate the message, blank after trimming is rejected
    // 2. The trip must exist
    // 3. Hosts cannot join their own trip
    // 4. Existing participants and requesters with a pending request get a conflict
    // 5. Store the pending request, denormalizing the trip's host
    body.validate()?;
    if body.message.trim().is_empty() {
        warn!("Blank join request message");
        return Err(AppError::bad_request("Message cannot be empty"));
    }

    let trip = state.trip.read(&trip_id).await?.ok_or_else(|| {
        warn!("Trip not found");
        AppError::not_found("Trip not found")
    })?;

    if trip.host_id == current_user.user_id {
        warn!("Host tried to join their own trip");
        return Err(AppError::bad_request("You cannot request to join your own trip"));
    }

    if state
        .trip
        .is_participant(&trip_id, &current_user.user_id)
        .await?
    {
        warn!("User already participates in the trip");
        return Err(AppError::conflict("You already participate in this trip"));
    }

    if state
        .request
        .has_pending_request(&trip_id, &current_user.user_id)
        .await?
    {
        warn!("Pending request already exists");
        return Err(AppError::conflict("A pending request for this trip already exists"));
    }

    let request = state
        .request
        .create(&CreateJoinRequestDTO {
            trip_id,
            requester_id: current_user.user_id,
            host_id: trip.host_id,
            message: body.message,
        })
        .await?;

    info!(request_id = request.request_id, "Join request submitted");
    Ok((StatusCode::CREATED, Json(JoinRequestDTO::from(request))))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn list_pending_requests(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> Result<Json<Vec<PendingRequestDTO>>, AppError> {
    let requests: Vec<PendingRequestDTO> = state
        .request
        .find_pending_for_host(&current_user.user_id)
        .await?
        .into_iter()
        .map(PendingRequestDTO::from)
        .collect();

    debug!("Host has {} pending requests", requests.len());
    Ok(Json(requests))
}

#[debug_handler]
#[instrument(skip(state, current_user), fields(request_id = %request_id, action = %action, user_id = %current_user.user_id))]
pub async fn resolve_request(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path((request_id, action)): Path<(i32, String)>,
) -> Result<Json<ResolveOutcomeDTO>, AppError> {
    debug!("Resolving join request");
    // 1. Parse the action
    // 2. Load the request, only its host may resolve it
    // 3. A request that is no longer pending cannot be resolved again
    // 4. Accept: status, roster entry and chat room in one transaction
    //    Reject: conditional status update only
    // 5. Losing a race against a concurrent resolution is a conflict
    let action = ResolveAction::parse(&action).ok_or_else(|| {
        warn!("Invalid action");
        AppError::bad_request("Action must be 'accept' or 'reject'")
    })?;

    let request = state.request.read(&request_id).await?.ok_or_else(|| {
        warn!("Join request not found");
        AppError::not_found("Join request not found")
    })?;

    if request.host_id != current_user.user_id {
        warn!("Only the host can resolve a join request");
        return Err(AppError::forbidden("Only the trip host can resolve this request"));
    }

    if request.status.is_terminal() {
        warn!(status = ?request.status, "Join request already resolved");
        return Err(AppError::invalid_state("Join request has already been resolved")
            .with_details(format!("Current status: {:?}", request.status)));
    }

    let room = match action {
        ResolveAction::Accept => {
            let room = state
                .request
                .accept_and_provision(&request)
                .await?
                .ok_or_else(|| {
                    warn!("Join request resolved concurrently");
                    AppError::conflict("Join request was resolved concurrently")
                })?;
            Some(ChatRoomDTO::from(room))
        }
        ResolveAction::Reject => {
            if !state.request.reject(&request_id).await? {
                warn!("Join request resolved concurrently");
                return Err(AppError::conflict("Join request was resolved concurrently"));
            }
            None
        }
    };

    info!(status = ?action.target_status(), "Join request resolved");
    Ok(Json(ResolveOutcomeDTO {
        request_id,
        status: action.target_status(),
        room,
    }))
}
