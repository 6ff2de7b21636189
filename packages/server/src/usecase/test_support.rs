//! Test doubles shared by the usecase tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::{
    config::GameConfig,
    domain::{
        ConnectionId, GameEvent, MessagePushError, MessagePusher, PusherChannel, Question,
        question::MockQuestionPicker, score_reporter::MockScoreReporter,
    },
};

use super::coordinator::{Coordinator, CoordinatorHandle};

/// MessagePusher that records every delivery instead of sending it.
#[derive(Clone, Default)]
pub struct RecordingPusher {
    deliveries: Arc<Mutex<Vec<(ConnectionId, GameEvent)>>>,
    unregistered: Arc<Mutex<Vec<ConnectionId>>>,
}

impl RecordingPusher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events_for(&self, connection_id: &ConnectionId) -> Vec<GameEvent> {
        self.deliveries
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| id == connection_id)
            .map(|(_, event)| event.clone())
            .collect()
    }

    pub fn event_names(&self, connection_id: &ConnectionId) -> Vec<&'static str> {
        self.events_for(connection_id)
            .iter()
            .map(GameEvent::name)
            .collect()
    }

    pub fn count(&self, connection_id: &ConnectionId, name: &str) -> usize {
        self.event_names(connection_id)
            .into_iter()
            .filter(|n| *n == name)
            .count()
    }

    pub fn was_unregistered(&self, connection_id: &ConnectionId) -> bool {
        self.unregistered.lock().unwrap().contains(connection_id)
    }
}

#[async_trait]
impl MessagePusher for RecordingPusher {
    async fn register_client(&self, _client_id: ConnectionId, _sender: PusherChannel) {}

    async fn unregister_client(&self, client_id: &ConnectionId) {
        self.unregistered.lock().unwrap().push(client_id.clone());
    }

    async fn push_to(
        &self,
        client_id: &ConnectionId,
        event: &GameEvent,
    ) -> Result<(), MessagePushError> {
        self.deliveries
            .lock()
            .unwrap()
            .push((client_id.clone(), event.clone()));
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: &[ConnectionId],
        event: &GameEvent,
    ) -> Result<(), MessagePushError> {
        let mut deliveries = self.deliveries.lock().unwrap();
        for target in targets {
            deliveries.push((target.clone(), event.clone()));
        }
        Ok(())
    }
}

pub fn conn(id: &str) -> ConnectionId {
    ConnectionId::new(id.to_string()).unwrap()
}

/// Picker that always returns the frog question.
pub fn frog_picker() -> MockQuestionPicker {
    let mut picker = MockQuestionPicker::new();
    picker
        .expect_pick()
        .returning(|| Question::new("🐸", "frog"));
    picker
}

/// Reporter that accepts everything.
pub fn silent_reporter() -> MockScoreReporter {
    let mut reporter = MockScoreReporter::new();
    reporter.expect_report().returning(|_| Ok(()));
    reporter
}

/// Spawn a coordinator wired to a recording pusher.
pub fn spawn_coordinator(
    config: GameConfig,
    picker: MockQuestionPicker,
    reporter: MockScoreReporter,
) -> (CoordinatorHandle, RecordingPusher) {
    let pusher = RecordingPusher::new();
    let handle = Coordinator::spawn(
        config,
        Arc::new(pusher.clone()),
        Arc::new(reporter),
        Box::new(picker),
    );
    (handle, pusher)
}
