//! Auth services - signup, login and session introspection

use crate::core::auth::{TOKEN_COOKIE, TOKEN_LIFETIME_HOURS};
use crate::core::{AppError, AppState, encode_jwt};
use crate::dtos::{CreateUserDTO, LoginDTO, RegisterDTO, UserDTO};
use crate::entities::User;
use crate::repositories::Create;
use axum::{
    Extension,
    extract::{Json, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use validator::Validate;

#[instrument(skip(state, body), fields(username = %body.username))]
pub async fn login_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginDTO>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Login attempt");
    // 1. Reject empty credentials before touching the database
    // 2. Look the user up by username, 401 if missing
    // 3. Verify the password against the stored hash, 401 on mismatch
    // 4. Sign a JWT with id and username
    // 5. Return it as an HttpOnly cookie and as a Bearer Authorization header
    if body.username.is_empty() || body.password.is_empty() {
        warn!("Empty credentials");
        return Err(AppError::unauthorized("Invalid username or password"));
    }

    let user = state
        .user
        .find_by_username(&body.username)
        .await?
        .ok_or_else(|| {
            warn!("Login for unknown user");
            AppError::unauthorized("Invalid username or password")
        })?;

    if !user.verify_password(&body.password) {
        warn!("Wrong password");
        return Err(AppError::unauthorized("Invalid username or password"));
    }

    let token = encode_jwt(user.username.clone(), user.user_id, &state.jwt_secret)?;

    let cookie_value = format!(
        "{}={}; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age={}",
        TOKEN_COOKIE,
        token,
        TOKEN_LIFETIME_HOURS * 60 * 60
    );

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie_value)
            .map_err(|_| AppError::internal_server_error("Failed to build session cookie"))?,
    );
    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| AppError::internal_server_error("Failed to build authorization header"))?,
    );

    info!("User logged in");
    Ok((StatusCode::OK, headers, Json(UserDTO::from(user))))
}

#[instrument(skip(state, body), fields(username = %body.username))]
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterDTO>,
) -> Result<(StatusCode, Json<UserDTO>), AppError> {
    debug!("Registering new user");
    // 1. Validate the body
    // 2. Conflict if the username is taken
    // 3. Hash the password with the configured cost
    // 4. Store the user and return its public view
    body.validate()?;

    if state.user.find_by_username(&body.username).await?.is_some() {
        warn!("Username already exists");
        return Err(AppError::conflict("Username already exists"));
    }

    let password_hash = User::hash_password(&body.password, state.bcrypt_cost).map_err(|e| {
        error!("Failed to hash password: {:?}", e);
        AppError::internal_server_error("Failed to hash password")
    })?;

    let new_user = CreateUserDTO {
        username: body.username,
        password: password_hash,
        email: body.email,
        mobile: body.mobile,
        gender: body.gender,
        language: body.language,
        dob: body.dob,
        travel_styles: body.travel_styles,
        interests: body.interests,
    };

    let created_user = state.user.create(&new_user).await?;

    info!(user_id = created_user.user_id, "User registered");
    Ok((StatusCode::CREATED, Json(UserDTO::from(created_user))))
}

#[instrument(skip(current_user), fields(user_id = %current_user.user_id))]
pub async fn current_session(Extension(current_user): Extension<User>) -> Json<UserDTO> {
    Json(UserDTO::from(current_user))
}
