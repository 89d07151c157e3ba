//! DTOs module - Data Transfer Objects
//!
//! DTOs separate the external representation (API) from the internal one (entities).

pub mod chat_room;
pub mod join_request;
pub mod message;
pub mod query;
pub mod trip;
pub mod user;
pub mod ws_event;

// Re-exports
pub use chat_room::{ChatRoomDTO, RoomSummaryDTO};
pub use join_request::{
    CreateJoinRequestDTO, JoinRequestBodyDTO, JoinRequestDTO, PendingRequestDTO,
    ResolveOutcomeDTO,
};
pub use message::{CreateMessageDTO, MessageDTO, SendMessageDTO};
pub use query::TripSearchQuery;
pub use trip::{CreateTripDTO, NewTripDTO, ParticipantDTO, TripDTO, TripDetailDTO};
pub use user::{
    CreateUserDTO, LoginDTO, MatchDTO, ProfileDTO, RegisterDTO, UpdateProfileDTO, UserDTO,
};
pub use ws_event::{ClientEventDTO, WsEventDTO};
