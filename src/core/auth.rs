//! Authentication - JWT sessions and the request middlewares built on them

use crate::core::{AppError, AppState};
use crate::entities::{ChatRoom, User};
use crate::repositories::Read;
use axum::extract::State;
use axum::{Error, body::Body, extract::Request, http, http::Response, middleware::Next};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Session lifetime, also used as the cookie Max-Age
pub const TOKEN_LIFETIME_HOURS: i64 = 24;

/// Name of the cookie carrying the session token
pub const TOKEN_COOKIE: &str = "token";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub exp: usize, // Expiry time of the token
    pub iat: usize, // Issued at time of the token
    pub id: i32,
    pub username: String,
}

#[instrument(skip(secret), fields(username = %username, id = %id))]
pub fn encode_jwt(username: String, id: i32, secret: &str) -> Result<String, Error> {
    debug!("Encoding JWT token for user");
    let now = Utc::now();
    let exp: usize = (now + Duration::hours(TOKEN_LIFETIME_HOURS)).timestamp() as usize;
    let iat: usize = now.timestamp() as usize;
    let claim = Claims {
        iat,
        exp,
        username,
        id,
    };

    encode(
        &Header::default(),
        &claim,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| {
        error!("Failed to encode JWT token: {:?}", e);
        Error::new("Error in encoding jwt token")
    })
}

#[instrument(skip(jwt_token, secret))]
pub fn decode_jwt(jwt_token: &str, secret: &str) -> Result<TokenData<Claims>, Error> {
    decode(
        jwt_token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|e| {
        debug!("Failed to decode JWT token: {:?}", e);
        Error::new("Error in decoding jwt token")
    })
}

/// Session token from `Authorization: Bearer <token>`, falling back to the `token` cookie
fn extract_token(req: &Request) -> Result<Option<String>, AppError> {
    if let Some(header) = req.headers().get(http::header::AUTHORIZATION) {
        let value = header.to_str().map_err(|_| {
            warn!("Invalid authorization header format");
            AppError::unauthorized("Invalid authorization header")
        })?;
        let mut parts = value.split_whitespace();
        return match (parts.next(), parts.next()) {
            (Some(scheme), Some(token)) if scheme.eq_ignore_ascii_case("bearer") => {
                Ok(Some(token.to_string()))
            }
            _ => {
                warn!("Authorization header is not a bearer token");
                Err(AppError::unauthorized("Authorization header must be 'Bearer <token>'"))
            }
        };
    }

    let token = req
        .headers()
        .get_all(http::header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TOKEN_COOKIE)
        .map(|(_, token)| token.to_string());

    Ok(token)
}

/// Resolves the session into a `User` extension; 401 when absent or invalid
#[instrument(skip(state, req, next))]
pub async fn authentication_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    debug!("Running authentication middleware");
    let token = extract_token(&req)?.ok_or_else(|| {
        warn!("Missing session token");
        AppError::unauthorized("Please add the JWT token to the header")
    })?;

    let token_data = decode_jwt(&token, &state.jwt_secret).map_err(|_| {
        warn!("Failed to decode JWT token");
        AppError::unauthorized("Unable to decode token")
    })?;

    // Looked up by id so a profile rename keeps the session valid
    let current_user = state
        .user
        .read(&token_data.claims.id)
        .await?
        .ok_or_else(|| {
            warn!("User not found in database: {}", token_data.claims.id);
            AppError::unauthorized("You are not an authorized user")
        })?;

    debug!("User authenticated: {}", current_user.username);
    req.extensions_mut().insert(current_user);
    Ok(next.run(req).await)
}

/// Verifies the current user is one of the two participants of the room in the path
/// and inserts the `ChatRoom` as an extension for the handler.
#[instrument(skip(state, req, next))]
pub async fn room_participant_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    debug!("Running room participant middleware");
    // 1. The authentication middleware must already have run
    let current_user = req
        .extensions()
        .get::<User>()
        .ok_or_else(|| {
            warn!("User not found in request extensions");
            AppError::unauthorized("User not authenticated")
        })?
        .clone();

    // 2. First numeric path segment is the room id
    let room_id: i32 = req
        .uri()
        .path()
        .split('/')
        .find_map(|segment| segment.parse::<i32>().ok())
        .ok_or_else(|| {
            warn!("Room ID not found in path: {}", req.uri().path());
            AppError::bad_request("Room ID not found in path")
        })?;

    // 3. Load the room and check participation
    let room = state
        .room
        .read(&room_id)
        .await?
        .ok_or_else(|| {
            warn!("Room {} not found", room_id);
            AppError::not_found("Chat room not found")
        })?;

    require_participant(&room, current_user.user_id)?;

    // 4. Handlers read the room from the extensions
    req.extensions_mut().insert(room);

    Ok(next.run(req).await)
}

/// Forbidden unless `user_id` is the room's host or requester
pub fn require_participant(room: &ChatRoom, user_id: i32) -> Result<(), AppError> {
    if !room.has_participant(user_id) {
        warn!("User {} is not a participant of room {}", user_id, room.room_id);
        return Err(AppError::forbidden("You are not a participant of this chat room"));
    }
    info!("User {} verified as participant of room {}", user_id, room.room_id);
    Ok(())
}
