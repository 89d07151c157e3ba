//! WebSocket Connection Management

use crate::dtos::{ClientEventDTO, MessageDTO, WsEventDTO};
use crate::repositories::Read;
use crate::ws::{RATE_LIMITER_MILLIS, TIMEOUT_DURATION_SECONDS};
use crate::AppState;
use axum::extract::ws::{Message, Utf8Bytes, WebSocket};
use axum::http::StatusCode;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::time::{Duration, interval, timeout};
use tokio_stream::StreamMap;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, error, info, instrument, warn};

/// Signals from the reader task to the writer task of the same connection
#[derive(Debug)]
pub enum InternalSignal {
    AddRoom(i32),
    RemoveRoom(i32),
    Error(StatusCode, String),
    Shutdown,
}

#[instrument(skip(ws, state))]
pub async fn handle_socket(ws: WebSocket, state: Arc<AppState>, user_id: i32) {
    info!("WebSocket connection established");

    let (ws_tx, ws_rx) = ws.split();

    // reader -> writer; unbounded so that no signal is lost
    let (int_tx, int_rx) = unbounded_channel::<InternalSignal>();

    tokio::spawn(listen_ws(user_id, ws_rx, int_tx, state.clone()));
    tokio::spawn(write_ws(user_id, ws_tx, int_rx, state));
}

#[instrument(skip(websocket_tx, event))]
async fn send_event(
    websocket_tx: &mut SplitSink<WebSocket, Message>,
    event: &WsEventDTO,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(event).map_err(|e| {
        error!("Failed to serialize event: {:?}", e);
        axum::Error::new(e)
    })?;
    websocket_tx.send(Message::Text(Utf8Bytes::from(json))).await
}

#[instrument(skip(websocket_tx, internal_rx, state))]
pub async fn write_ws(
    user_id: i32,
    mut websocket_tx: SplitSink<WebSocket, Message>,
    mut internal_rx: UnboundedReceiver<InternalSignal>,
    state: Arc<AppState>,
) {
    info!("Write task started");

    let mut stream_map: StreamMap<i32, BroadcastStream<Arc<MessageDTO>>> = StreamMap::new();

    'external: loop {
        tokio::select! {
            Some((room_id, result)) = tokio_stream::StreamExt::next(&mut stream_map) => {
                match result {
                    Ok(msg) => {
                        let event = WsEventDTO::NewMessage(MessageDTO::clone(&msg));
                        if send_event(&mut websocket_tx, &event).await.is_err() {
                            warn!("Failed to push message, closing connection");
                            break 'external;
                        }
                    }
                    // delivery is at-most-once, missed messages are in the history endpoint
                    Err(e) => warn!(room_id, "Subscriber lagging, skipping: {:?}", e),
                }
            }

            signal = internal_rx.recv() => {
                match signal {
                    Some(InternalSignal::AddRoom(room_id)) => {
                        if !stream_map.contains_key(&room_id) {
                            let rx = state.rooms_online.subscribe(&room_id);
                            stream_map.insert(room_id, BroadcastStream::new(rx));
                            info!(room_id, "Subscribed to room");
                        }
                        if send_event(&mut websocket_tx, &WsEventDTO::RoomJoined { room_id }).await.is_err() {
                            break 'external;
                        }
                    }
                    Some(InternalSignal::RemoveRoom(room_id)) => {
                        if stream_map.remove(&room_id).is_some() {
                            state.rooms_online.unsubscribe(&room_id);
                            info!(room_id, "Unsubscribed from room");
                        }
                        if send_event(&mut websocket_tx, &WsEventDTO::RoomLeft { room_id }).await.is_err() {
                            break 'external;
                        }
                    }
                    Some(InternalSignal::Error(status, message)) => {
                        warn!(error_message = %message, "Sending error to client");
                        let event = WsEventDTO::Error { code: status.as_u16(), message };
                        if send_event(&mut websocket_tx, &event).await.is_err() {
                            break 'external;
                        }
                    }
                    Some(InternalSignal::Shutdown) | None => {
                        info!("Reader gone, closing writer");
                        break 'external;
                    }
                }
            }
        }
    }

    // drop every receiver before pruning the rooms it kept alive
    let rooms: Vec<i32> = stream_map.keys().copied().collect();
    drop(stream_map);
    for room_id in rooms {
        state.rooms_online.unsubscribe(&room_id);
    }

    let _ = websocket_tx.close().await;
    info!("Write task terminated");
}

/// Turns one client frame into a signal for the writer.
/// Joining a room requires being one of its two participants.
#[instrument(skip(state, text))]
async fn process_frame(state: &AppState, user_id: i32, text: &str) -> InternalSignal {
    let event = match serde_json::from_str::<ClientEventDTO>(text) {
        Ok(event) => event,
        Err(e) => {
            warn!("Failed to deserialize client frame: {:?}", e);
            return InternalSignal::Error(StatusCode::BAD_REQUEST, "Malformed frame".to_string());
        }
    };

    match event {
        ClientEventDTO::JoinRoom { room_id } => match state.room.read(&room_id).await {
            Ok(Some(room)) if room.has_participant(user_id) => InternalSignal::AddRoom(room_id),
            Ok(Some(_)) => {
                warn!(room_id, "Subscription refused, not a participant");
                InternalSignal::Error(
                    StatusCode::FORBIDDEN,
                    format!("You are not a participant of room {}", room_id),
                )
            }
            Ok(None) => InternalSignal::Error(
                StatusCode::NOT_FOUND,
                format!("Room {} not found", room_id),
            ),
            Err(e) => {
                error!("Failed to load room: {:?}", e);
                InternalSignal::Error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        },
        ClientEventDTO::LeaveRoom { room_id } => InternalSignal::RemoveRoom(room_id),
    }
}

#[instrument(skip(websocket_rx, internal_tx, state))]
pub async fn listen_ws(
    user_id: i32,
    mut websocket_rx: SplitStream<WebSocket>,
    internal_tx: UnboundedSender<InternalSignal>,
    state: Arc<AppState>,
) {
    info!("Listen task started");

    let mut rate_limiter = interval(Duration::from_millis(RATE_LIMITER_MILLIS));
    let timeout_duration = Duration::from_secs(TIMEOUT_DURATION_SECONDS);

    loop {
        match timeout(timeout_duration, StreamExt::next(&mut websocket_rx)).await {
            Ok(Some(msg_result)) => {
                rate_limiter.tick().await;

                let msg = match msg_result {
                    Ok(m) => m,
                    Err(e) => {
                        warn!("WebSocket error: {:?}", e);
                        break;
                    }
                };

                match msg {
                    Message::Text(text) => {
                        debug!("Frame received from client");
                        let signal = process_frame(&state, user_id, text.as_str()).await;
                        if internal_tx.send(signal).is_err() {
                            break;
                        }
                    }
                    Message::Close(_) => {
                        info!("Close message received");
                        break;
                    }
                    _ => {}
                }
            }
            Ok(None) => {
                info!("WebSocket stream ended");
                break;
            }
            Err(_) => {
                warn!(timeout_secs = TIMEOUT_DURATION_SECONDS, "Connection timeout");
                break;
            }
        }
    }

    let _ = internal_tx.send(InternalSignal::Shutdown);
    info!("Listen task terminated");
}
