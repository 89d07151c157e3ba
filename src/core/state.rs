//! Application State - shared by every route, middleware and socket task

use crate::repositories::{
    ChatRoomRepository, JoinRequestRepository, MessageRepository, TripRepository,
    UserRepository,
};
use crate::ws::roommap::RoomMap;
use sqlx::SqlitePool;

pub struct AppState {
    pub user: UserRepository,
    pub trip: TripRepository,
    pub request: JoinRequestRepository,
    pub room: ChatRoomRepository,
    pub msg: MessageRepository,

    /// Secret key for JWT tokens
    pub jwt_secret: String,

    /// Work factor for new password hashes
    pub bcrypt_cost: u32,

    /// Live subscribers of every room with at least one open socket
    pub rooms_online: RoomMap,
}

impl AppState {
    /// Builds every repository on the shared pool.
    ///
    /// # Arguments
    /// * `pool` - SQLite connection pool
    /// * `jwt_secret` - key used to sign session tokens
    pub fn new(pool: SqlitePool, jwt_secret: String) -> Self {
        Self {
            user: UserRepository::new(pool.clone()),
            trip: TripRepository::new(pool.clone()),
            request: JoinRequestRepository::new(pool.clone()),
            room: ChatRoomRepository::new(pool.clone()),
            msg: MessageRepository::new(pool),
            jwt_secret,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            rooms_online: RoomMap::new(),
        }
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }
}
