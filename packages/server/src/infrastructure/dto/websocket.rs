//! WebSocket frame DTOs.
//!
//! Every frame is a JSON text frame `{"event": <name>, "data": <payload>}`.
//! `nextRound` carries no `data`.

use serde::{Deserialize, Serialize};

use crate::domain::{PlayerRoster, Scoreboard};

/// Frames sent by clients.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientMessage {
    Join(JoinPayload),
    /// Payload is the room id.
    StartRound(String),
    SendGuess(GuessPayload),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JoinPayload {
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessPayload {
    pub room_id: String,
    pub message: String,
}

/// Frames sent by the server.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    JoinedRoom(String),
    UpdateLobby(Vec<LobbyPlayerDto>),
    GoToGame(String),
    RoundStart(RoundStartDto),
    NewGuess(NewGuessDto),
    CorrectGuess(CorrectGuessDto),
    RoundEnd(RoundEndDto),
    NextRound,
    GameOver(GameOverDto),
}

/// Waiting player as listed in `updateLobby`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyPlayerDto {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoundStartDto {
    pub emoji: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewGuessDto {
    pub name: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectGuessDto {
    pub connection_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoundEndDto {
    /// The normalized answer.
    pub correct: String,
    pub scores: Scoreboard,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameOverDto {
    pub scores: Scoreboard,
    pub players: PlayerRoster,
}
