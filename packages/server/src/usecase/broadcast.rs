//! Broadcast Layer: room channels on top of a [`MessagePusher`].

use std::{collections::HashMap, sync::Arc};

use crate::domain::{ConnectionId, GameEvent, MessagePusher, PusherChannel, RoomId};

/// Tracks which connections listen on which room channel and fans events out.
///
/// A connection joins a channel when it is seated in a room and stays on it until
/// it disconnects, so players keep receiving game events after the lobby closes.
pub struct Broadcaster {
    pusher: Arc<dyn MessagePusher>,
    channels: HashMap<RoomId, Vec<ConnectionId>>,
}

impl Broadcaster {
    pub fn new(pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            pusher,
            channels: HashMap::new(),
        }
    }

    pub async fn register(&self, connection_id: ConnectionId, sender: PusherChannel) {
        self.pusher.register_client(connection_id, sender).await;
    }

    /// Drop a connection from every channel and stop delivering to it.
    pub async fn unregister(&mut self, connection_id: &ConnectionId) {
        self.channels.retain(|_, members| {
            members.retain(|member| member != connection_id);
            !members.is_empty()
        });
        self.pusher.unregister_client(connection_id).await;
    }

    pub fn join_channel(&mut self, room_id: &RoomId, connection_id: &ConnectionId) {
        let members = self.channels.entry(room_id.clone()).or_default();
        if !members.contains(connection_id) {
            members.push(connection_id.clone());
        }
    }

    /// Forget a room channel. Its members stay registered for direct pushes.
    pub fn close_channel(&mut self, room_id: &RoomId) {
        self.channels.remove(room_id);
    }

    pub fn members(&self, room_id: &RoomId) -> &[ConnectionId] {
        self.channels
            .get(room_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Deliver to every connection currently on the room channel.
    pub async fn to_room(&self, room_id: &RoomId, event: GameEvent) {
        let members = self.members(room_id);
        if members.is_empty() {
            tracing::debug!("No listeners in room '{}' for '{}'", room_id, event.name());
            return;
        }
        if let Err(e) = self.pusher.broadcast(members, &event).await {
            tracing::warn!(
                "Failed to broadcast '{}' to room '{}': {}",
                event.name(),
                room_id,
                e
            );
        }
    }

    /// Deliver to exactly one connection.
    pub async fn to_connection(&self, connection_id: &ConnectionId, event: GameEvent) {
        if let Err(e) = self.pusher.push_to(connection_id, &event).await {
            tracing::warn!(
                "Failed to push '{}' to '{}': {}",
                event.name(),
                connection_id,
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::RecordingPusher;

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    fn room(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_to_room_reaches_channel_members_only() {
        // テスト項目: ルームへの配信はチャンネルに参加している接続にだけ届く
        // given (前提条件):
        let pusher = RecordingPusher::new();
        let mut broadcaster = Broadcaster::new(Arc::new(pusher.clone()));
        broadcaster.join_channel(&room("r1"), &conn("alice"));
        broadcaster.join_channel(&room("r1"), &conn("bob"));
        broadcaster.join_channel(&room("r2"), &conn("carol"));

        // when (操作):
        broadcaster.to_room(&room("r1"), GameEvent::NextRound).await;

        // then (期待する結果):
        assert_eq!(pusher.event_names(&conn("alice")), vec!["nextRound"]);
        assert_eq!(pusher.event_names(&conn("bob")), vec!["nextRound"]);
        assert!(pusher.event_names(&conn("carol")).is_empty());
    }

    #[tokio::test]
    async fn test_join_channel_is_idempotent() {
        // テスト項目: 同じ接続を二重にチャンネルへ追加しても一度しか配信されない
        // given (前提条件):
        let pusher = RecordingPusher::new();
        let mut broadcaster = Broadcaster::new(Arc::new(pusher.clone()));
        broadcaster.join_channel(&room("r1"), &conn("alice"));
        broadcaster.join_channel(&room("r1"), &conn("alice"));

        // when (操作):
        broadcaster.to_room(&room("r1"), GameEvent::NextRound).await;

        // then (期待する結果):
        assert_eq!(broadcaster.members(&room("r1")).len(), 1);
        assert_eq!(pusher.event_names(&conn("alice")).len(), 1);
    }

    #[tokio::test]
    async fn test_unregister_leaves_all_channels() {
        // テスト項目: 切断した接続は全てのチャンネルから外れ、空のチャンネルは削除される
        // given (前提条件):
        let pusher = RecordingPusher::new();
        let mut broadcaster = Broadcaster::new(Arc::new(pusher.clone()));
        broadcaster.join_channel(&room("r1"), &conn("alice"));
        broadcaster.join_channel(&room("r1"), &conn("bob"));
        broadcaster.join_channel(&room("r2"), &conn("alice"));

        // when (操作):
        broadcaster.unregister(&conn("alice")).await;
        broadcaster.to_room(&room("r1"), GameEvent::NextRound).await;
        broadcaster.to_room(&room("r2"), GameEvent::NextRound).await;

        // then (期待する結果):
        assert_eq!(broadcaster.members(&room("r1")), &[conn("bob")]);
        assert!(broadcaster.members(&room("r2")).is_empty());
        assert!(pusher.event_names(&conn("alice")).is_empty());
        assert!(pusher.was_unregistered(&conn("alice")));
    }
}
