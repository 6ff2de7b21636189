//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::RoomId,
    infrastructure::dto::http::{LobbyRoomDto, RoomDetailDto, RoomSummaryDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Rooms still open for matchmaking
pub async fn get_lobby(State(state): State<Arc<AppState>>) -> Json<Vec<LobbyRoomDto>> {
    let rooms = state.coordinator.lobby().await;
    Json(rooms.into_iter().map(Into::into).collect())
}

/// Get list of play rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.coordinator.rooms().await;
    Json(rooms.into_iter().map(Into::into).collect())
}

/// Get room detail by ID, players ranked by score
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    let room_id = RoomId::try_from(room_id).map_err(|e| {
        tracing::warn!("Invalid room id: {}", e);
        StatusCode::BAD_REQUEST
    })?;
    match state.coordinator.room(room_id).await {
        Some(detail) => Ok(Json(detail.into())),
        None => Err(StatusCode::NOT_FOUND),
    }
}
