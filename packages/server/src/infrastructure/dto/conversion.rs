//! Conversion logic between DTOs and domain / usecase models.

use guessroom_shared::time::millis_to_rfc3339;

use crate::{
    domain::{GameEvent, WaitingPlayer},
    infrastructure::dto::{
        http::{LobbyRoomDto, RankedPlayerDto, RoomDetailDto, RoomSummaryDto},
        websocket::{
            CorrectGuessDto, GameOverDto, LobbyPlayerDto, NewGuessDto, RoundEndDto, RoundStartDto,
            ServerMessage,
        },
    },
    usecase::{LobbySnapshot, RankedPlayer, RoomDetail, RoomSummary},
};

// ========================================
// Domain Event → WebSocket DTO
// ========================================

impl From<WaitingPlayer> for LobbyPlayerDto {
    fn from(player: WaitingPlayer) -> Self {
        Self {
            id: player.connection_id.into_string(),
            name: player.name.into_string(),
        }
    }
}

impl From<GameEvent> for ServerMessage {
    fn from(event: GameEvent) -> Self {
        match event {
            GameEvent::JoinedRoom(room_id) => ServerMessage::JoinedRoom(room_id.into_string()),
            GameEvent::UpdateLobby(players) => {
                ServerMessage::UpdateLobby(players.into_iter().map(Into::into).collect())
            }
            GameEvent::GoToGame(room_id) => ServerMessage::GoToGame(room_id.into_string()),
            GameEvent::RoundStart { emoji } => ServerMessage::RoundStart(RoundStartDto { emoji }),
            GameEvent::NewGuess { name, message } => {
                ServerMessage::NewGuess(NewGuessDto { name, message })
            }
            GameEvent::CorrectGuess {
                connection_id,
                name,
            } => ServerMessage::CorrectGuess(CorrectGuessDto {
                connection_id: connection_id.into_string(),
                name,
            }),
            GameEvent::RoundEnd { answer, scores } => ServerMessage::RoundEnd(RoundEndDto {
                correct: answer,
                scores,
            }),
            GameEvent::NextRound => ServerMessage::NextRound,
            GameEvent::GameOver { scores, players } => {
                ServerMessage::GameOver(GameOverDto { scores, players })
            }
        }
    }
}

// ========================================
// Snapshot → HTTP DTO
// ========================================

impl From<LobbySnapshot> for LobbyRoomDto {
    fn from(snapshot: LobbySnapshot) -> Self {
        Self {
            id: snapshot.id.into_string(),
            players: snapshot.players.into_iter().map(Into::into).collect(),
            activating: snapshot.activating,
        }
    }
}

impl From<RoomSummary> for RoomSummaryDto {
    fn from(summary: RoomSummary) -> Self {
        Self {
            id: summary.id.into_string(),
            phase: summary.phase.as_str().to_string(),
            round_count: summary.round_count,
            players: summary.player_count,
            created_at: millis_to_rfc3339(summary.created_at.value()),
        }
    }
}

impl From<RankedPlayer> for RankedPlayerDto {
    fn from(player: RankedPlayer) -> Self {
        Self {
            connection_id: player.connection_id.into_string(),
            name: player.name,
            avatar: player.avatar.map(|a| a.to_string()),
            score: player.score,
        }
    }
}

impl From<RoomDetail> for RoomDetailDto {
    fn from(detail: RoomDetail) -> Self {
        Self {
            id: detail.id.into_string(),
            phase: detail.phase.as_str().to_string(),
            round_count: detail.round_count,
            ranking: detail.ranking.into_iter().map(Into::into).collect(),
            created_at: millis_to_rfc3339(detail.created_at.value()),
        }
    }
}
