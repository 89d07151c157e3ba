//! Core Module - infrastructure shared by the whole server
//!
//! - Authentication and JWT
//! - Configuration
//! - Error handling
//! - Application state

pub mod auth;
pub mod config;
pub mod error;
pub mod state;

pub use auth::{
    Claims, authentication_middleware, decode_jwt, encode_jwt, require_participant,
    room_participant_middleware,
};
pub use config::Config;
pub use error::AppError;
pub use state::AppState;
