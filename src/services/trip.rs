//! Trip services - browse, inspect and host trips

use crate::core::{AppError, AppState};
use crate::dtos::{CreateTripDTO, NewTripDTO, TripDTO, TripDetailDTO, TripSearchQuery};
use crate::entities::User;
use crate::repositories::Create;
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// Lists trips, newest first. Blank filters are the same as missing ones.
#[instrument(skip(state))]
pub async fn search_trips(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TripSearchQuery>,
) -> Result<Json<Vec<TripDTO>>, AppError> {
    debug!("Searching trips");
    let budget = params.budget().map_err(|err| {
        warn!("Budget filter is not a number");
        err
    })?;

    let trips: Vec<TripDTO> = state
        .trip
        .search(params.location(), budget)
        .await?
        .into_iter()
        .map(TripDTO::from)
        .collect();

    info!("Found {} trips", trips.len());
    Ok(Json(trips))
}

#[instrument(skip(state), fields(trip_id = %trip_id))]
pub async fn get_trip(
    State(state): State<Arc<AppState>>,
    Path(trip_id): Path<i32>,
) -> Result<Json<TripDetailDTO>, AppError> {
    let trip = state
        .trip
        .find_with_host(&trip_id)
        .await?
        .ok_or_else(|| {
            warn!("Trip not found");
            AppError::not_found("Trip not found")
        })?;

    let members = state.trip.find_participants(&trip_id).await?;
    debug!("Trip has {} participants besides the host", members.len());

    Ok(Json(TripDetailDTO::new(trip, members)))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.user_id))]
pub async fn host_trip(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Json(body): Json<NewTripDTO>,
) -> Result<(StatusCode, Json<TripDTO>), AppError> {
    debug!("Hosting new trip");
    body.validate()?;

    if body.destination.trim().is_empty() || body.vehicle.trim().is_empty() {
        warn!("Blank destination or vehicle");
        return Err(AppError::bad_request("Destination and vehicle cannot be blank"));
    }

    let created = state
        .trip
        .create(&CreateTripDTO::from_new(current_user.user_id, body))
        .await?;

    let trip = state
        .trip
        .find_with_host(&created.trip_id)
        .await?
        .ok_or_else(|| AppError::internal_server_error("Trip disappeared after creation"))?;

    info!(trip_id = created.trip_id, "Trip hosted");
    Ok((StatusCode::CREATED, Json(TripDTO::from(trip))))
}
