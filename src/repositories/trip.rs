//! TripRepository - trip catalog and participation roster reads

use super::{Create, Read};
use crate::dtos::CreateTripDTO;
use crate::entities::{Participant, Trip, TripWithHost};
use chrono::Utc;
use sqlx::{Error, QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info, instrument};

const TRIP_WITH_HOST_SELECT: &str = r#"
    SELECT t.trip_id, t.host_id, t.destination, t.vehicle, t.budget, t.start_date,
           t.end_date, t.preferences, t.description, t.image, t.created_at,
           u.username AS host_username, u.mobile AS host_mobile
    FROM trips t
    JOIN users u ON u.user_id = t.host_id
"#;

/// Case-insensitive substring match, folding case the same way on both sides.
/// SQLite's `LOWER` and `LIKE` only fold ASCII, so this runs in Rust.
fn destination_matches(destination: &str, lowered_fragment: &str) -> bool {
    destination.to_lowercase().contains(lowered_fragment)
}

pub struct TripRepository {
    connection_pool: SqlitePool,
}

impl TripRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Search trips by destination substring and budget ceiling, newest first.
    /// A `None` filter is not applied.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        location: Option<&str>,
        max_budget: Option<f64>,
    ) -> Result<Vec<TripWithHost>, Error> {
        let mut query_builder = QueryBuilder::<Sqlite>::new(TRIP_WITH_HOST_SELECT);

        if let Some(budget) = max_budget {
            query_builder.push(" WHERE t.budget <= ");
            query_builder.push_bind(budget);
        }
        query_builder.push(" ORDER BY t.created_at DESC, t.trip_id DESC");

        let mut trips = query_builder
            .build_query_as::<TripWithHost>()
            .fetch_all(&self.connection_pool)
            .await?;

        if let Some(location) = location {
            let fragment = location.to_lowercase();
            trips.retain(|t| destination_matches(&t.trip.destination, &fragment));
        }

        debug!("Search matched {} trips", trips.len());
        Ok(trips)
    }

    /// Trip joined with its host's username and mobile
    #[instrument(skip(self))]
    pub async fn find_with_host(&self, trip_id: &i32) -> Result<Option<TripWithHost>, Error> {
        let mut query_builder = QueryBuilder::<Sqlite>::new(TRIP_WITH_HOST_SELECT);
        query_builder.push(" WHERE t.trip_id = ");
        query_builder.push_bind(*trip_id);

        let trip = query_builder
            .build_query_as::<TripWithHost>()
            .fetch_optional(&self.connection_pool)
            .await?;

        Ok(trip)
    }

    /// Non-host members of a trip, in joining order
    #[instrument(skip(self))]
    pub async fn find_participants(&self, trip_id: &i32) -> Result<Vec<Participant>, Error> {
        let participants = sqlx::query_as::<_, Participant>(
            r#"
            SELECT u.user_id, u.username
            FROM trip_participants p
            JOIN users u ON u.user_id = p.user_id
            WHERE p.trip_id = ?
            ORDER BY p.joined_at ASC, u.user_id ASC
            "#,
        )
        .bind(trip_id)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(participants)
    }

    #[instrument(skip(self))]
    pub async fn is_participant(&self, trip_id: &i32, user_id: &i32) -> Result<bool, Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM trip_participants WHERE trip_id = ? AND user_id = ?",
        )
        .bind(trip_id)
        .bind(user_id)
        .fetch_one(&self.connection_pool)
        .await?;

        Ok(count > 0)
    }
}

impl Create<Trip, CreateTripDTO> for TripRepository {
    #[instrument(skip(self, data), fields(host_id = %data.host_id))]
    async fn create(&self, data: &CreateTripDTO) -> Result<Trip, Error> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO trips (host_id, destination, vehicle, budget, start_date, end_date,
                               preferences, description, image, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(data.host_id)
        .bind(&data.destination)
        .bind(&data.vehicle)
        .bind(data.budget)
        .bind(data.start_date)
        .bind(data.end_date)
        .bind(&data.preferences)
        .bind(&data.description)
        .bind(&data.image)
        .bind(now)
        .execute(&self.connection_pool)
        .await?;

        let new_id = result.last_insert_rowid() as i32;
        info!("Trip created with id {}", new_id);

        Ok(Trip {
            trip_id: new_id,
            host_id: data.host_id,
            destination: data.destination.clone(),
            vehicle: data.vehicle.clone(),
            budget: data.budget,
            start_date: data.start_date,
            end_date: data.end_date,
            preferences: data.preferences.clone(),
            description: data.description.clone(),
            image: data.image.clone(),
            created_at: now,
        })
    }
}

impl Read<Trip, i32> for TripRepository {
    #[instrument(skip(self), fields(trip_id = %id))]
    async fn read(&self, id: &i32) -> Result<Option<Trip>, Error> {
        let trip = sqlx::query_as::<_, Trip>(
            r#"
            SELECT trip_id, host_id, destination, vehicle, budget, start_date, end_date,
                   preferences, description, image, created_at
            FROM trips
            WHERE trip_id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(trip)
    }
}
