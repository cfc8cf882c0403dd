//! Trip API endpoints

use api_types::summary::{BreakdownView, SummaryView};
use api_types::trip::{TripCreated, TripListResponse, TripNew, TripUpdate, TripView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use engine::{ExpenseSummary, Money, Principal, Trip, TripNewCmd, TripUpdateCmd};

fn map_trip(trip: Trip) -> TripView {
    TripView {
        id: trip.id,
        user_id: trip.user_id,
        title: trip.title,
        destination: trip.destination,
        start_date: trip.start_date,
        end_date: trip.end_date,
        budget_cents: trip.budget.cents(),
        notes: trip.notes,
        location_ids: trip.location_ids,
    }
}

fn map_summary(trip_id: Uuid, summary: Option<ExpenseSummary>) -> SummaryView {
    match summary {
        Some(summary) => SummaryView {
            trip_id,
            total_cents: summary.total.cents(),
            category_breakdown: BreakdownView {
                transport: summary.category_breakdown.transport.cents(),
                accommodation: summary.category_breakdown.accommodation.cents(),
                food: summary.category_breakdown.food.cents(),
                activity: summary.category_breakdown.activity.cents(),
                other: summary.category_breakdown.other.cents(),
            },
            generated_at: Some(summary.generated_at),
        },
        // A trip that never saw an expense write still answers with a
        // well-formed, all-zero summary.
        None => SummaryView {
            trip_id,
            total_cents: 0,
            category_breakdown: BreakdownView {
                transport: 0,
                accommodation: 0,
                food: 0,
                activity: 0,
                other: 0,
            },
            generated_at: None,
        },
    }
}

/// `POST /trips`
pub async fn create(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Json(payload): Json<TripNew>,
) -> Result<(StatusCode, Json<TripCreated>), ServerError> {
    let mut cmd = TripNewCmd::new(
        payload.title,
        payload.destination,
        payload.start_date,
        payload.end_date,
        Money::new(payload.budget_cents),
    );
    if let Some(notes) = payload.notes {
        cmd = cmd.notes(notes);
    }
    if let Some(location_ids) = payload.location_ids {
        cmd = cmd.location_ids(location_ids);
    }
    let id = state.engine.new_trip(&principal, cmd).await?;
    Ok((StatusCode::CREATED, Json(TripCreated { id })))
}

/// `GET /trips`
pub async fn list(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
) -> Result<Json<TripListResponse>, ServerError> {
    let trips = state.engine.trips(&principal).await?;
    Ok(Json(TripListResponse {
        trips: trips.into_iter().map(map_trip).collect(),
    }))
}

/// `GET /trips/{id}`
pub async fn get(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TripView>, ServerError> {
    let trip = state.engine.trip(&principal, id).await?;
    Ok(Json(map_trip(trip)))
}

/// `PUT /trips/{id}`
pub async fn update(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TripUpdate>,
) -> Result<StatusCode, ServerError> {
    let mut cmd = TripUpdateCmd::new(
        id,
        payload.title,
        payload.destination,
        payload.start_date,
        payload.end_date,
        Money::new(payload.budget_cents),
    );
    if let Some(notes) = payload.notes {
        cmd = cmd.notes(notes);
    }
    if let Some(location_ids) = payload.location_ids {
        cmd = cmd.location_ids(location_ids);
    }
    state.engine.update_trip(&principal, cmd).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /trips/{id}`
pub async fn remove(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_trip(&principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /trips/{id}/summary`
pub async fn summary(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SummaryView>, ServerError> {
    let summary = state.engine.trip_summary(&principal, id).await?;
    Ok(Json(map_summary(id, summary)))
}
