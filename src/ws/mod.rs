//! WebSocket Module - real-time delivery of chat messages
//!
//! - HTTP -> WebSocket upgrade behind the authentication middleware
//! - per-connection reader and writer tasks (`connection`)
//! - per-room broadcast registry (`roommap`)

pub mod connection;
pub mod roommap;

pub use connection::handle_socket;
pub use roommap::RoomMap;

use crate::{AppState, entities::User};
use axum::{
    Extension,
    extract::{State, ws::WebSocketUpgrade},
    response::Response,
};
use std::sync::Arc;
use tracing::{info, instrument};

/// Messages buffered per room before a slow subscriber starts lagging
pub const BROADCAST_CHANNEL_CAPACITY: usize = 100;

/// Minimum spacing between two frames read from the same client
pub const RATE_LIMITER_MILLIS: u64 = 10;

/// Idle connections are closed after this long without a client frame
pub const TIMEOUT_DURATION_SECONDS: u64 = 300;

#[instrument(skip(ws, state, current_user), fields(user_id = current_user.user_id))]
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> Response {
    let user_id = current_user.user_id;
    info!("Upgrading connection to WebSocket");
    ws.on_upgrade(move |socket| handle_socket(socket, state, user_id))
}
