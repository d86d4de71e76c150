//! HTTP handlers for companion mapping and the dex

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use shared::CoffeeCompanion;
use uuid::Uuid;

use crate::{
    error::AppResult,
    services::{CoffeeService, CompanionService},
    AppState,
};

fn companion_service(state: &AppState) -> CompanionService {
    CompanionService::new(
        state.companion_store.clone(),
        state.classifier.clone(),
        state.refiner.clone(),
    )
}

/// Run the mapping pipeline for a coffee and persist the result
pub async fn generate_companion(
    State(state): State<AppState>,
    Path(coffee_id): Path<Uuid>,
) -> AppResult<(StatusCode, Json<CoffeeCompanion>)> {
    let coffee = CoffeeService::new(state.coffee_store.clone())
        .get(coffee_id)
        .await?;

    let mapping = companion_service(&state).assign_companion(&coffee).await?;
    Ok((StatusCode::CREATED, Json(mapping)))
}

/// Get the companion mapping for a coffee
pub async fn get_coffee_companion(
    State(state): State<AppState>,
    Path(coffee_id): Path<Uuid>,
) -> AppResult<Json<CoffeeCompanion>> {
    let mapping = companion_service(&state).get_for_coffee(coffee_id).await?;
    Ok(Json(mapping))
}

/// All coffee-companion mappings
pub async fn get_dex(State(state): State<AppState>) -> AppResult<Json<Vec<CoffeeCompanion>>> {
    let mappings = companion_service(&state).dex().await?;
    Ok(Json(mappings))
}

/// Input for renaming a companion
#[derive(Debug, Deserialize)]
pub struct NicknameInput {
    pub nickname: String,
}

/// Response for a nickname update
#[derive(Serialize)]
pub struct NicknameResponse {
    pub message: String,
}

/// Set the display nickname on a coffee's companion
pub async fn update_companion_nickname(
    State(state): State<AppState>,
    Path(coffee_id): Path<Uuid>,
    Json(input): Json<NicknameInput>,
) -> AppResult<Json<NicknameResponse>> {
    companion_service(&state)
        .update_nickname(coffee_id, &input.nickname)
        .await?;

    Ok(Json(NicknameResponse {
        message: "Nickname updated successfully".to_string(),
    }))
}
