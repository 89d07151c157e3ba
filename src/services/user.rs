//! User services - profile, directory and companion matches

use crate::core::{AppError, AppState};
use crate::dtos::{MatchDTO, ProfileDTO, UpdateProfileDTO, UserDTO};
use crate::entities::User;
use crate::matching::rank_matches;
use crate::repositories::Update;
use axum::{
    Extension,
    extract::{Json, State},
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

#[instrument(skip(current_user), fields(user_id = %current_user.user_id))]
pub async fn get_profile(Extension(current_user): Extension<User>) -> Json<ProfileDTO> {
    Json(ProfileDTO::from(current_user))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.user_id))]
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Json(body): Json<UpdateProfileDTO>,
) -> Result<Json<ProfileDTO>, AppError> {
    debug!("Updating profile");
    // 1. Validate the partial update
    // 2. If the username changes, it must not belong to someone else
    // 3. Write only the provided fields and return the fresh profile
    body.validate()?;

    if let Some(ref username) = body.username {
        if *username != current_user.username
            && state.user.find_by_username(username).await?.is_some()
        {
            warn!("Username already taken");
            return Err(AppError::conflict("Username already exists"));
        }
    }

    let updated = state.user.update(&current_user.user_id, &body).await?;

    info!("Profile updated");
    Ok(Json(ProfileDTO::from(updated)))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> Result<Json<Vec<UserDTO>>, AppError> {
    let users: Vec<UserDTO> = state
        .user
        .find_all_except(&current_user.user_id)
        .await?
        .into_iter()
        .map(UserDTO::from)
        .collect();

    debug!("Listed {} users", users.len());
    Ok(Json(users))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn list_matches(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> Result<Json<Vec<MatchDTO>>, AppError> {
    let candidates = state.user.find_all_except(&current_user.user_id).await?;
    let matches = rank_matches(&current_user, candidates);

    info!("Computed {} matches", matches.len());
    Ok(Json(matches))
}
