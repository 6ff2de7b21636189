//! Hand-off of final scores to the external profile/score service.

use async_trait::async_trait;
use serde::Serialize;

use super::{
    ScoreReportError,
    value_object::{ConnectionId, RoomId, Timestamp},
};

/// Final score of one player in a finished game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalScore {
    pub room_id: RoomId,
    pub connection_id: ConnectionId,
    pub name: String,
    pub score: u32,
    pub finished_at: Timestamp,
}

/// Consumer of final scores. The game never depends on its success.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScoreReporter: Send + Sync {
    async fn report(&self, result: FinalScore) -> Result<(), ScoreReportError>;
}
