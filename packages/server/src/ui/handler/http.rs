//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    infrastructure::dto::http::{HealthDto, RoomSummaryDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    let rooms = state.repository.list_rooms().await.len();
    Json(HealthDto {
        status: "ok".to_string(),
        rooms,
    })
}

/// Get list of rooms with their member counts
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    // Domain Model から DTO への変換
    let rooms = state
        .repository
        .summaries()
        .await
        .into_iter()
        .map(RoomSummaryDto::from)
        .collect();

    Json(rooms)
}
