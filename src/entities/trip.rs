//! Trip entity and the joined reads built on it

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Serialize, Debug, Clone, FromRow)]
pub struct Trip {
    pub trip_id: i32,
    pub host_id: i32,
    pub destination: String,
    pub vehicle: String,
    pub budget: f64,
    // start <= end is left to the caller
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub preferences: Option<String>,
    pub description: Option<String>,
    /// opaque reference to an uploaded image
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Trip joined with its host's public fields
#[derive(Debug, Clone, FromRow)]
pub struct TripWithHost {
    #[sqlx(flatten)]
    pub trip: Trip,
    pub host_username: String,
    pub host_mobile: Option<String>,
}

/// Non-host member of a trip, read from the roster
#[derive(Debug, Clone, FromRow)]
pub struct Participant {
    pub user_id: i32,
    pub username: String,
}
