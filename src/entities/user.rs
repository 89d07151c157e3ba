//! User entity - with password helpers

use bcrypt::{hash, verify};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use sqlx::types::Json;
use std::collections::BTreeSet;

#[derive(Serialize, Debug, Clone, FromRow)]
pub struct User {
    pub user_id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub email: String,
    pub mobile: Option<String>,
    pub gender: Option<String>,
    pub language: Option<String>,
    pub dob: Option<NaiveDate>,
    pub travel_styles: Json<BTreeSet<String>>,
    pub interests: Json<BTreeSet<String>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Verify if target_password matches the stored hashed password
    pub fn verify_password(&self, target_password: &str) -> bool {
        verify(target_password, &self.password).unwrap_or(false)
    }

    /// Hash a password using bcrypt with the configured cost
    pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
        let hash = hash(password, cost)?;
        Ok(hash)
    }
}
