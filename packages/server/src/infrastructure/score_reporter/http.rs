//! Score reporting over HTTP.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{FinalScore, ScoreReportError, ScoreReporter};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends each final score as a JSON `POST` to the configured endpoint.
#[derive(Debug, Clone)]
pub struct HttpScoreReporter {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpScoreReporter {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ScoreReportError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ScoreReportError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ScoreReporter for HttpScoreReporter {
    async fn report(&self, result: FinalScore) -> Result<(), ScoreReportError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&result)
            .send()
            .await
            .map_err(|e| ScoreReportError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScoreReportError::Rejected(status.as_u16()));
        }
        tracing::debug!(
            "Reported score of '{}' in room '{}'",
            result.connection_id,
            result.room_id
        );
        Ok(())
    }
}
