//! Events the coordinator delivers to connections.

use super::{
    lobby::WaitingPlayer,
    room::{PlayerRoster, Scoreboard},
    value_object::{ConnectionId, RoomId},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// The joining connection was seated in a room.
    JoinedRoom(RoomId),
    /// The waiting list of a room changed.
    UpdateLobby(Vec<WaitingPlayer>),
    /// The room was activated; move to the game view.
    GoToGame(RoomId),
    RoundStart {
        emoji: String,
    },
    /// A guess, echoed to the room as a chat entry.
    NewGuess {
        name: String,
        message: String,
    },
    CorrectGuess {
        connection_id: ConnectionId,
        name: String,
    },
    RoundEnd {
        answer: String,
        scores: Scoreboard,
    },
    NextRound,
    GameOver {
        scores: Scoreboard,
        players: PlayerRoster,
    },
}

impl GameEvent {
    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::JoinedRoom(_) => "joinedRoom",
            GameEvent::UpdateLobby(_) => "updateLobby",
            GameEvent::GoToGame(_) => "goToGame",
            GameEvent::RoundStart { .. } => "roundStart",
            GameEvent::NewGuess { .. } => "newGuess",
            GameEvent::CorrectGuess { .. } => "correctGuess",
            GameEvent::RoundEnd { .. } => "roundEnd",
            GameEvent::NextRound => "nextRound",
            GameEvent::GameOver { .. } => "gameOver",
        }
    }
}
