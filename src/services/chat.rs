//! Chat services - room list, history and sending

use crate::core::{AppError, AppState};
use crate::dtos::{CreateMessageDTO, MessageDTO, RoomSummaryDTO, SendMessageDTO};
use crate::entities::{ChatRoom, User};
use crate::repositories::Create;
use axum::{
    Extension,
    extract::{Json, State},
    http::StatusCode,
};
use axum_macros::debug_handler;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn list_rooms(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> Result<Json<Vec<RoomSummaryDTO>>, AppError> {
    let rooms: Vec<RoomSummaryDTO> = state
        .room
        .find_overviews_for_user(&current_user.user_id)
        .await?
        .into_iter()
        .map(|overview| RoomSummaryDTO::for_user(overview, current_user.user_id))
        .collect();

    info!("Retrieved {} rooms", rooms.len());
    Ok(Json(rooms))
}

#[instrument(skip(state, room), fields(room_id = %room.room_id))]
pub async fn get_room_messages(
    State(state): State<Arc<AppState>>,
    Extension(room): Extension<ChatRoom>, // participation checked by room_participant_middleware
) -> Result<Json<Vec<MessageDTO>>, AppError> {
    let messages: Vec<MessageDTO> = state
        .msg
        .find_many_by_room_id(&room.room_id)
        .await?
        .into_iter()
        .map(MessageDTO::from)
        .collect();

    debug!("Retrieved {} messages", messages.len());
    Ok(Json(messages))
}

#[debug_handler]
#[instrument(skip(state, current_user, room, body), fields(room_id = %room.room_id, user_id = %current_user.user_id))]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Extension(room): Extension<ChatRoom>, // participation checked by room_participant_middleware
    Json(body): Json<SendMessageDTO>,
) -> Result<(StatusCode, Json<MessageDTO>), AppError> {
    debug!("Sending message");
    // 1. Reject text that is blank after trimming, content is stored as sent
    // 2. Persist the message under the room's send lock
    // 3. Publish the stored payload to the room's live subscribers before releasing it
    body.validate()?;
    if body.content.trim().is_empty() {
        warn!("Blank message");
        return Err(AppError::bad_request("Message content cannot be empty"));
    }

    let send_lock = state.rooms_online.send_lock(&room.room_id);
    let _sequenced = send_lock.lock().await;

    let message = state
        .msg
        .create(&CreateMessageDTO {
            room_id: room.room_id,
            sender_id: current_user.user_id,
            content: body.content,
        })
        .await?;

    let dto = MessageDTO {
        message_id: message.message_id,
        room_id: message.room_id,
        sender_id: message.sender_id,
        sender_name: current_user.username,
        content: message.content,
        created_at: message.created_at,
    };

    let receivers = state.rooms_online.publish(&room.room_id, Arc::new(dto.clone()));
    info!(message_id = dto.message_id, receivers, "Message stored and published");

    Ok((StatusCode::CREATED, Json(dto)))
}
