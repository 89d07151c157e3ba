#![allow(dead_code)]

use axum_test::TestServer;
use axum_test::http::HeaderName;
use sqlx::SqlitePool;
use std::sync::Arc;
use tripmate::core::AppState;

pub const TEST_JWT_SECRET: &str = "tripmate-integration-test-secret";

/// Builds an AppState for tests, with the cheapest bcrypt cost
///
/// # Arguments
/// * `pool` - SQLite pool prepared by `#[sqlx::test]`
pub fn create_test_state(pool: SqlitePool) -> Arc<AppState> {
    Arc::new(AppState::new(pool, TEST_JWT_SECRET.to_string()).with_bcrypt_cost(4))
}

/// Builds a TestServer around the full router
pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = tripmate::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// Signs a JWT valid for 24 hours
pub fn create_test_jwt(user_id: i32, username: &str, jwt_secret: &str) -> String {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Claims {
        id: i32,
        username: String,
        exp: usize,
        iat: usize,
    }

    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::hours(24))
        .expect("valid timestamp")
        .timestamp() as usize;

    let claims = Claims {
        id: user_id,
        username: username.to_string(),
        exp: expiration,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .expect("Failed to create JWT token")
}

/// `Authorization` header for a fixture user
pub fn auth_header(user_id: i32, username: &str) -> (HeaderName, String) {
    let token = create_test_jwt(user_id, username, TEST_JWT_SECRET);
    (
        HeaderName::from_static("authorization"),
        format!("Bearer {}", token),
    )
}

pub async fn count_participants(pool: &SqlitePool, trip_id: i32, user_id: i32) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM trip_participants WHERE trip_id = ? AND user_id = ?")
        .bind(trip_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
        .expect("count participants")
}

pub async fn count_rooms(pool: &SqlitePool, trip_id: i32, host_id: i32, requester_id: i32) -> i64 {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM chat_rooms WHERE trip_id = ? AND host_id = ? AND requester_id = ?",
    )
    .bind(trip_id)
    .bind(host_id)
    .bind(requester_id)
    .fetch_one(pool)
    .await
    .expect("count rooms")
}
