//! Domain layer: room, lobby and round state plus the ports the game needs.

pub mod error;
pub mod event;
pub mod lobby;
pub mod message_pusher;
pub mod question;
pub mod registry;
pub mod room;
pub mod score_reporter;
pub mod value_object;

pub use error::{MessagePushError, ScoreReportError, ValueObjectError};
pub use event::GameEvent;
pub use lobby::{Admission, OpenRoom, OpenRoomPool, WaitingPlayer};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use question::{Question, QuestionPicker, default_catalog};
pub use registry::{ConnectionRegistry, UNKNOWN_PLAYER_NAME};
pub use room::{
    GuessOutcome, PlayerProfile, PlayerRoster, RoomPhase, RoomPlayState, RoomStateStore,
    Scoreboard,
};
pub use score_reporter::{FinalScore, ScoreReporter};
pub use value_object::{Avatar, ConnectionId, PlayerName, RoomId, Timestamp, normalize_answer};
