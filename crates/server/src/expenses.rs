//! Expense API endpoints

use api_types::expense::{
    ExpenseCreated, ExpenseListQuery, ExpenseListResponse, ExpenseNew, ExpenseUpdate, ExpenseView,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use engine::{Expense, ExpenseNewCmd, ExpenseUpdateCmd, Money, Principal};

fn map_category(category: api_types::ExpenseCategory) -> engine::ExpenseCategory {
    match category {
        api_types::ExpenseCategory::Transport => engine::ExpenseCategory::Transport,
        api_types::ExpenseCategory::Accommodation => engine::ExpenseCategory::Accommodation,
        api_types::ExpenseCategory::Food => engine::ExpenseCategory::Food,
        api_types::ExpenseCategory::Activity => engine::ExpenseCategory::Activity,
        api_types::ExpenseCategory::Other => engine::ExpenseCategory::Other,
    }
}

fn map_category_back(category: engine::ExpenseCategory) -> api_types::ExpenseCategory {
    match category {
        engine::ExpenseCategory::Transport => api_types::ExpenseCategory::Transport,
        engine::ExpenseCategory::Accommodation => api_types::ExpenseCategory::Accommodation,
        engine::ExpenseCategory::Food => api_types::ExpenseCategory::Food,
        engine::ExpenseCategory::Activity => api_types::ExpenseCategory::Activity,
        engine::ExpenseCategory::Other => api_types::ExpenseCategory::Other,
    }
}

fn map_expense(expense: Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        trip_id: expense.trip_id,
        user_id: expense.user_id,
        category: map_category_back(expense.category),
        amount_cents: expense.amount.cents(),
        description: expense.description,
        date: expense.date,
    }
}

/// `POST /expenses`
pub async fn create(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseCreated>), ServerError> {
    let mut cmd = ExpenseNewCmd::new(
        payload.trip_id,
        map_category(payload.category),
        Money::new(payload.amount_cents),
        payload.date,
    );
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }
    let id = state.engine.new_expense(&principal, cmd).await?;
    Ok((StatusCode::CREATED, Json(ExpenseCreated { id })))
}

/// `GET /expenses` - accepts an optional `?trip_id=` filter.
pub async fn list(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Query(query): Query<ExpenseListQuery>,
) -> Result<Json<ExpenseListResponse>, ServerError> {
    let expenses = state.engine.expenses(&principal, query.trip_id).await?;
    Ok(Json(ExpenseListResponse {
        expenses: expenses.into_iter().map(map_expense).collect(),
    }))
}

/// `GET /expenses/{id}`
pub async fn get(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ExpenseView>, ServerError> {
    let expense = state.engine.expense(&principal, id).await?;
    Ok(Json(map_expense(expense)))
}

/// `PUT /expenses/{id}` - the trip association is fixed at creation.
pub async fn update(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ExpenseUpdate>,
) -> Result<StatusCode, ServerError> {
    let mut cmd = ExpenseUpdateCmd::new(
        id,
        map_category(payload.category),
        Money::new(payload.amount_cents),
        payload.date,
    );
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }
    state.engine.update_expense(&principal, cmd).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /expenses/{id}`
pub async fn remove(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_expense(&principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
