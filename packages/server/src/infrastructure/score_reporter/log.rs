use async_trait::async_trait;

use crate::domain::{FinalScore, ScoreReportError, ScoreReporter};

/// Reporter used when no score API is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingScoreReporter;

#[async_trait]
impl ScoreReporter for LoggingScoreReporter {
    async fn report(&self, result: FinalScore) -> Result<(), ScoreReportError> {
        tracing::info!(
            "Final score in room '{}': '{}' ({}) scored {}",
            result.room_id,
            result.name,
            result.connection_id,
            result.score
        );
        Ok(())
    }
}
