//! Trip DTOs - Data Transfer Objects for hosting and browsing trips

use crate::entities::{Participant, TripWithHost};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Trip as listed by the search endpoint
#[derive(Serialize, Deserialize, Debug)]
pub struct TripDTO {
    pub trip_id: i32,
    pub host_id: i32,
    pub host_username: String,
    pub destination: String,
    pub vehicle: String,
    pub budget: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub preferences: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<TripWithHost> for TripDTO {
    fn from(value: TripWithHost) -> Self {
        let TripWithHost {
            trip,
            host_username,
            ..
        } = value;
        Self {
            trip_id: trip.trip_id,
            host_id: trip.host_id,
            host_username,
            destination: trip.destination,
            vehicle: trip.vehicle,
            budget: trip.budget,
            start_date: trip.start_date,
            end_date: trip.end_date,
            preferences: trip.preferences,
            description: trip.description,
            image: trip.image,
            created_at: trip.created_at,
        }
    }
}

/// One line of a trip's participant list
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ParticipantDTO {
    pub user_id: i32,
    pub username: String,
    /// Only the host's contact number is shown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    pub is_host: bool,
}

impl From<Participant> for ParticipantDTO {
    fn from(value: Participant) -> Self {
        Self {
            user_id: value.user_id,
            username: value.username,
            mobile: None,
            is_host: false,
        }
    }
}

/// Trip detail with its participants, host first
#[derive(Serialize, Deserialize, Debug)]
pub struct TripDetailDTO {
    #[serde(flatten)]
    pub trip: TripDTO,
    pub participants: Vec<ParticipantDTO>,
}

impl TripDetailDTO {
    /// Builds the participant view: the host, labelled "(host)", then the roster
    pub fn new(trip: TripWithHost, members: Vec<Participant>) -> Self {
        let host = ParticipantDTO {
            user_id: trip.trip.host_id,
            username: format!("{} (host)", trip.host_username),
            mobile: trip.host_mobile.clone(),
            is_host: true,
        };

        let mut participants = Vec::with_capacity(members.len() + 1);
        participants.push(host);
        participants.extend(members.into_iter().map(ParticipantDTO::from));

        Self {
            trip: TripDTO::from(trip),
            participants,
        }
    }
}

/// Body of a host-a-trip request
#[derive(Deserialize, Debug, Clone, Validate)]
pub struct NewTripDTO {
    #[validate(length(min = 1, max = 255, message = "Destination must be between 1 and 255 characters"))]
    pub destination: String,

    #[validate(length(min = 1, max = 64, message = "Vehicle must be between 1 and 64 characters"))]
    pub vehicle: String,

    #[validate(range(min = 0.0, message = "Budget cannot be negative"))]
    pub budget: f64,

    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    #[validate(length(max = 2000))]
    pub preferences: Option<String>,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    #[validate(length(max = 512))]
    pub image: Option<String>,
}

/// DTO to create a new trip (without trip_id)
#[derive(Debug, Clone)]
pub struct CreateTripDTO {
    pub host_id: i32,
    pub destination: String,
    pub vehicle: String,
    pub budget: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub preferences: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl CreateTripDTO {
    pub fn from_new(host_id: i32, body: NewTripDTO) -> Self {
        Self {
            host_id,
            destination: body.destination,
            vehicle: body.vehicle,
            budget: body.budget,
            start_date: body.start_date,
            end_date: body.end_date,
            preferences: body.preferences,
            description: body.description,
            image: body.image,
        }
    }
}

