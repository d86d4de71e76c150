//! HTTP handlers for coffee tasting records

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared::Coffee;
use uuid::Uuid;

use crate::{
    error::AppResult,
    services::{coffee::CoffeeInput, CoffeeService},
    AppState,
};

/// Create a new coffee entry
pub async fn create_coffee(
    State(state): State<AppState>,
    Json(input): Json<CoffeeInput>,
) -> AppResult<(StatusCode, Json<Coffee>)> {
    let service = CoffeeService::new(state.coffee_store);
    let coffee = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(coffee)))
}

/// List all coffee entries
pub async fn list_coffees(State(state): State<AppState>) -> AppResult<Json<Vec<Coffee>>> {
    let service = CoffeeService::new(state.coffee_store);
    let coffees = service.list().await?;
    Ok(Json(coffees))
}

/// Get a single coffee entry
pub async fn get_coffee(
    State(state): State<AppState>,
    Path(coffee_id): Path<Uuid>,
) -> AppResult<Json<Coffee>> {
    let service = CoffeeService::new(state.coffee_store);
    let coffee = service.get(coffee_id).await?;
    Ok(Json(coffee))
}

/// Update a coffee entry
pub async fn update_coffee(
    State(state): State<AppState>,
    Path(coffee_id): Path<Uuid>,
    Json(input): Json<CoffeeInput>,
) -> AppResult<Json<Coffee>> {
    let service = CoffeeService::new(state.coffee_store);
    let coffee = service.update(coffee_id, input).await?;
    Ok(Json(coffee))
}

/// Delete a coffee entry
pub async fn delete_coffee(
    State(state): State<AppState>,
    Path(coffee_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = CoffeeService::new(state.coffee_store);
    service.delete(coffee_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
