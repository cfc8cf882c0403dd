//! Location API endpoints

use api_types::location::{
    LocationCreated, LocationListResponse, LocationNew, LocationUpdate, LocationView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use engine::{Location, LocationNewCmd, LocationUpdateCmd, Principal};

fn map_location(location: Location) -> LocationView {
    LocationView {
        id: location.id,
        user_id: location.user_id,
        title: location.title,
        open_time: location.open_time,
        close_time: location.close_time,
        description: location.description,
    }
}

/// `POST /locations`
pub async fn create(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Json(payload): Json<LocationNew>,
) -> Result<(StatusCode, Json<LocationCreated>), ServerError> {
    let mut cmd = LocationNewCmd::new(payload.title, payload.open_time, payload.close_time);
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }
    let id = state.engine.new_location(&principal, cmd).await?;
    Ok((StatusCode::CREATED, Json(LocationCreated { id })))
}

/// `GET /locations`
pub async fn list(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
) -> Result<Json<LocationListResponse>, ServerError> {
    let locations = state.engine.locations(&principal).await?;
    Ok(Json(LocationListResponse {
        locations: locations.into_iter().map(map_location).collect(),
    }))
}

/// `GET /locations/{id}`
pub async fn get(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LocationView>, ServerError> {
    let location = state.engine.location(&principal, id).await?;
    Ok(Json(map_location(location)))
}

/// `PUT /locations/{id}`
pub async fn update(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LocationUpdate>,
) -> Result<StatusCode, ServerError> {
    let mut cmd = LocationUpdateCmd::new(id, payload.title, payload.open_time, payload.close_time);
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }
    state.engine.update_location(&principal, cmd).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /locations/{id}`
pub async fn remove(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_location(&principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
