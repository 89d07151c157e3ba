use crate::dtos::MessageDTO;
use crate::ws::BROADCAST_CHANNEL_CAPACITY;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, broadcast};
use tokio::sync::broadcast::{Receiver, Sender};
use tracing::{debug, info, instrument};

/// Registry of the rooms that currently have live subscribers.
///
/// `subscribe` and `unsubscribe` are the only operations that add or remove
/// channels; `publish` never mutates the map.
pub struct RoomMap {
    channels: DashMap<i32, Sender<Arc<MessageDTO>>>,
    send_locks: DashMap<i32, Arc<Mutex<()>>>,
}

impl Default for RoomMap {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomMap {
    pub fn new() -> Self {
        RoomMap {
            channels: DashMap::new(),
            send_locks: DashMap::new(),
        }
    }

    /// Per-room lock held across store-then-publish, so live subscribers
    /// receive a room's messages in the order they were persisted
    pub fn send_lock(&self, room_id: &i32) -> Arc<Mutex<()>> {
        self.send_locks.entry(*room_id).or_default().clone()
    }

    /// Returns a receiver for the room, opening its channel if needed
    #[instrument(skip(self))]
    pub fn subscribe(&self, room_id: &i32) -> Receiver<Arc<MessageDTO>> {
        self.channels
            .entry(*room_id)
            .or_insert_with(|| {
                info!("Creating new broadcast channel for room");
                // Arc so every receiver shares one copy of the payload
                broadcast::channel::<Arc<MessageDTO>>(BROADCAST_CHANNEL_CAPACITY).0
            })
            .subscribe()
    }

    /// Closes the room's channel once its last receiver has been dropped.
    /// Callers drop their receiver first. Returns whether the channel was removed.
    #[instrument(skip(self))]
    pub fn unsubscribe(&self, room_id: &i32) -> bool {
        let removed = self
            .channels
            .remove_if(room_id, |_, tx| tx.receiver_count() == 0)
            .is_some();
        if removed {
            info!("Room has no subscribers left, channel closed");
        }
        removed
    }

    /// Fans a persisted message out to the room's live subscribers.
    /// Returns how many receivers got it; 0 when nobody is listening.
    #[instrument(skip(self, msg), fields(message_id = msg.message_id))]
    pub fn publish(&self, room_id: &i32, msg: Arc<MessageDTO>) -> usize {
        let delivered = self
            .channels
            .get(room_id)
            .map(|tx| tx.send(msg).unwrap_or(0))
            .unwrap_or(0);
        debug!(receivers = delivered, "Message published");
        delivered
    }

    pub fn subscriber_count(&self, room_id: &i32) -> usize {
        self.channels
            .get(room_id)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }
}
