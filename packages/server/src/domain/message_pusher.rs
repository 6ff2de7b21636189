//! MessagePusher trait 定義
//!
//! ドメイン層が必要とする「接続へのイベント配信」のインターフェース。
//! WebSocket などの具体的な実装は Infrastructure 層が提供します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{GameEvent, MessagePushError, value_object::ConnectionId};

/// Outbound channel of one connection. Carries encoded frames.
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Delivers events to live connections.
///
/// Delivery is fire-and-forget: no acknowledgement, no retry.
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Start delivering to `client_id` through `sender`.
    async fn register_client(&self, client_id: ConnectionId, sender: PusherChannel);

    async fn unregister_client(&self, client_id: &ConnectionId);

    /// Deliver an event to exactly one connection.
    async fn push_to(
        &self,
        client_id: &ConnectionId,
        event: &GameEvent,
    ) -> Result<(), MessagePushError>;

    /// Deliver an event to every target. Missing targets are skipped.
    async fn broadcast(
        &self,
        targets: &[ConnectionId],
        event: &GameEvent,
    ) -> Result<(), MessagePushError>;
}
