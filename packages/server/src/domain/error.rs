//! Domain errors.

use thiserror::Error;

/// Value object validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("connection id must not be empty")]
    ConnectionIdEmpty,

    #[error("room id must not be empty")]
    RoomIdEmpty,

    #[error("room id is too long ({0} chars, max {max})", max = super::value_object::RoomId::MAX_LEN)]
    RoomIdTooLong(usize),

    #[error("player name must not be empty")]
    PlayerNameEmpty,
}

/// Errors raised while pushing events to connections
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client '{0}' is not registered")]
    ClientNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),

    #[error("failed to encode event: {0}")]
    Encode(String),
}

/// Errors raised by the external score collaborator
#[derive(Debug, Error)]
pub enum ScoreReportError {
    #[error("score API request failed: {0}")]
    Transport(String),

    #[error("score API rejected the result with status {0}")]
    Rejected(u16),
}
