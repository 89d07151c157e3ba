//! Entities module - Domain entities
//!
//! Every entity maps onto a table (or a joined read of tables) in the database.

pub mod chat_room;
pub mod enums;
pub mod join_request;
pub mod message;
pub mod trip;
pub mod user;

// Re-exports for easier imports
pub use chat_room::{ChatRoom, RoomOverview};
pub use enums::{RequestStatus, ResolveAction};
pub use join_request::{JoinRequest, PendingRequest};
pub use message::{Message, MessageWithSender};
pub use trip::{Participant, Trip, TripWithHost};
pub use user::User;
