//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

use super::websocket::LobbyPlayerDto;

/// Room of the open-room pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyRoomDto {
    pub id: String,
    pub players: Vec<LobbyPlayerDto>,
    pub activating: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub id: String,
    pub phase: String,
    pub round_count: u32,
    /// Number of admitted players.
    pub players: usize,
    /// RFC 3339 (UTC)
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedPlayerDto {
    pub connection_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub score: u32,
}

/// Room with its players ranked by score, highest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetailDto {
    pub id: String,
    pub phase: String,
    pub round_count: u32,
    pub ranking: Vec<RankedPlayerDto>,
    /// RFC 3339 (UTC)
    pub created_at: String,
}
