//! Game coordinator: the single owner of all lobby and room state.
//!
//! WebSocket handlers and timers never touch the state directly. They send
//! [`Command`]s to one task which applies them in order, so two handlers can
//! never interleave their mutations of the same room. Delayed transitions are
//! spawned sleeps that feed a command back into the same queue.

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::{mpsc, oneshot},
    task::AbortHandle,
};

use crate::{
    config::GameConfig,
    domain::{
        ConnectionId, ConnectionRegistry, MessagePusher, OpenRoomPool, PlayerName, PusherChannel,
        QuestionPicker, RoomId, RoomStateStore, ScoreReporter,
    },
};

use super::{
    broadcast::Broadcaster,
    query::{LobbySnapshot, RoomDetail, RoomSummary},
};

/// Everything the coordinator can be asked to do.
#[derive(Debug)]
pub enum Command {
    Connect {
        connection_id: ConnectionId,
        sender: PusherChannel,
    },
    Join {
        connection_id: ConnectionId,
        name: PlayerName,
        avatar: Option<String>,
        reply: oneshot::Sender<Option<RoomId>>,
    },
    StartRound {
        connection_id: ConnectionId,
        room_id: RoomId,
    },
    Guess {
        connection_id: ConnectionId,
        room_id: RoomId,
        message: String,
    },
    Disconnect {
        connection_id: ConnectionId,
    },
    /// Lobby threshold reached: send `goToGame` to the waiting players.
    ActivateRoom {
        room_id: RoomId,
    },
    /// Drop an activated room from the lobby pool.
    CloseLobbyRoom {
        room_id: RoomId,
    },
    RoundTimeout {
        room_id: RoomId,
        round: u32,
    },
    NextRoundDue {
        room_id: RoomId,
        round: u32,
    },
    /// Retention of a finished game is over.
    EvictRoom {
        room_id: RoomId,
    },
    ListLobby {
        reply: oneshot::Sender<Vec<LobbySnapshot>>,
    },
    ListRooms {
        reply: oneshot::Sender<Vec<RoomSummary>>,
    },
    RoomDetail {
        room_id: RoomId,
        reply: oneshot::Sender<Option<RoomDetail>>,
    },
}

/// Cloneable front door of the coordinator task.
#[derive(Debug, Clone)]
pub struct CoordinatorHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl CoordinatorHandle {
    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            tracing::warn!("Game coordinator is not running, command dropped");
        }
    }

    /// Attach the outbound channel of a freshly accepted connection.
    pub fn connect(&self, connection_id: ConnectionId, sender: PusherChannel) {
        self.send(Command::Connect {
            connection_id,
            sender,
        });
    }

    /// Request matchmaking. Resolves to the assigned room, or `None` when the
    /// connection had already joined.
    pub async fn join(
        &self,
        connection_id: ConnectionId,
        name: PlayerName,
        avatar: Option<String>,
    ) -> Option<RoomId> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Join {
            connection_id,
            name,
            avatar,
            reply,
        });
        rx.await.ok().flatten()
    }

    pub fn start_round(&self, connection_id: ConnectionId, room_id: RoomId) {
        self.send(Command::StartRound {
            connection_id,
            room_id,
        });
    }

    pub fn guess(&self, connection_id: ConnectionId, room_id: RoomId, message: String) {
        self.send(Command::Guess {
            connection_id,
            room_id,
            message,
        });
    }

    pub fn disconnect(&self, connection_id: ConnectionId) {
        self.send(Command::Disconnect { connection_id });
    }

    pub async fn lobby(&self) -> Vec<LobbySnapshot> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::ListLobby { reply });
        rx.await.unwrap_or_default()
    }

    pub async fn rooms(&self) -> Vec<RoomSummary> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::ListRooms { reply });
        rx.await.unwrap_or_default()
    }

    pub async fn room(&self, room_id: RoomId) -> Option<RoomDetail> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::RoomDetail { room_id, reply });
        rx.await.ok().flatten()
    }
}

pub struct Coordinator {
    pub(super) config: GameConfig,
    pub(super) registry: ConnectionRegistry,
    pub(super) lobby: OpenRoomPool,
    pub(super) rooms: RoomStateStore,
    pub(super) broadcaster: Broadcaster,
    pub(super) reporter: Arc<dyn ScoreReporter>,
    pub(super) picker: Box<dyn QuestionPicker>,
    /// Weak so that the task stops once every handle is gone.
    pub(super) commands: mpsc::WeakUnboundedSender<Command>,
}

impl Coordinator {
    /// Start the coordinator task and return its handle.
    pub fn spawn(
        config: GameConfig,
        pusher: Arc<dyn MessagePusher>,
        reporter: Arc<dyn ScoreReporter>,
        picker: Box<dyn QuestionPicker>,
    ) -> CoordinatorHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let coordinator = Self {
            lobby: OpenRoomPool::new(config.room_capacity),
            config,
            registry: ConnectionRegistry::new(),
            rooms: RoomStateStore::new(),
            broadcaster: Broadcaster::new(pusher),
            reporter,
            picker,
            commands: tx.downgrade(),
        };
        tokio::spawn(coordinator.run(rx));
        CoordinatorHandle { commands: tx }
    }

    async fn run(mut self, mut inbox: mpsc::UnboundedReceiver<Command>) {
        tracing::info!(
            "Game coordinator started (min players: {}, max rounds: {})",
            self.config.min_players,
            self.config.max_rounds
        );
        while let Some(command) = inbox.recv().await {
            self.dispatch(command).await;
        }
        tracing::info!("Game coordinator stopped");
    }

    async fn dispatch(&mut self, command: Command) {
        match command {
            Command::Connect {
                connection_id,
                sender,
            } => {
                tracing::debug!("Connection '{}' attached", connection_id);
                self.broadcaster.register(connection_id, sender).await;
            }
            Command::Join {
                connection_id,
                name,
                avatar,
                reply,
            } => {
                let room_id = self.handle_join(connection_id, name, avatar).await;
                let _ = reply.send(room_id);
            }
            Command::StartRound {
                connection_id,
                room_id,
            } => self.handle_start_round(connection_id, room_id).await,
            Command::Guess {
                connection_id,
                room_id,
                message,
            } => self.handle_guess(connection_id, room_id, message).await,
            Command::Disconnect { connection_id } => self.handle_disconnect(connection_id).await,
            Command::ActivateRoom { room_id } => self.handle_activate_room(room_id).await,
            Command::CloseLobbyRoom { room_id } => self.handle_close_lobby_room(room_id),
            Command::RoundTimeout { room_id, round } => {
                self.handle_round_timeout(room_id, round).await
            }
            Command::NextRoundDue { room_id, round } => {
                self.handle_next_round_due(room_id, round).await
            }
            Command::EvictRoom { room_id } => self.handle_evict_room(room_id),
            Command::ListLobby { reply } => {
                let _ = reply.send(self.lobby_snapshots());
            }
            Command::ListRooms { reply } => {
                let _ = reply.send(self.room_summaries());
            }
            Command::RoomDetail { room_id, reply } => {
                let _ = reply.send(self.room_detail(&room_id));
            }
        }
    }
}

/// Feed `command` back into the queue after `delay`.
///
/// Returns the handle used to cancel it, or `None` when the coordinator is
/// shutting down.
pub(super) fn schedule(
    commands: &mpsc::WeakUnboundedSender<Command>,
    delay: Duration,
    command: Command,
) -> Option<AbortHandle> {
    let tx = commands.upgrade()?;
    let task = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = tx.send(command);
    });
    Some(task.abort_handle())
}
