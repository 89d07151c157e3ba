//! Repositories module - one repository per table
//!
//! Every repository owns a clone of the SQLite pool and exposes the generic
//! `Create`/`Read`/`Update` traits plus the table-specific lookups the services
//! need. Queries are bound at runtime with `sqlx::query_as` and mapped through
//! `FromRow`, so building the crate does not require a live database.
//! Multi-table writes (accepting a join request) run inside one transaction.

pub mod chat_room;
pub mod join_request;
pub mod message;
pub mod traits;
pub mod trip;
pub mod user;

// Re-export traits for easier imports
pub use traits::{Create, Read, Update};

pub use chat_room::ChatRoomRepository;
pub use join_request::JoinRequestRepository;
pub use message::MessageRepository;
pub use trip::TripRepository;
pub use user::UserRepository;
