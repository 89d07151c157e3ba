//! Services module - HTTP handlers, one sub-module per resource

pub mod auth;
pub mod chat;
pub mod join_request;
pub mod trip;
pub mod user;

pub use auth::{current_session, login_user, register_user};
pub use chat::{get_room_messages, list_rooms, send_message};
pub use join_request::{list_pending_requests, request_to_join, resolve_request};
pub use trip::{get_trip, host_trip, search_trips};
pub use user::{get_profile, list_matches, list_users, update_profile};

use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

/// Root endpoint - health check
pub async fn root(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, "Server is running!")
}
