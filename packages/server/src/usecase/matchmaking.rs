//! UseCase: マッチメイキング（参加・部屋の起動・切断）
//!
//! ## 何をしているか
//! - join: 接続を名前付きで登録し、空きのある最初の部屋へ着席させる
//! - 開始人数に達した部屋を起動し、各プレイヤーに個別に `goToGame` を送る
//! - 起動から一定時間後に部屋を待機プールから外す
//! - 切断: 待機リストから除去し、変化した部屋へ待機リストを再配信する
//!
//! 切断してもスコアは残るため、最終結果の集計に含まれます。

use crate::domain::{
    Avatar, ConnectionId, GameEvent, PlayerName, PlayerProfile, RoomId, WaitingPlayer,
};

use super::coordinator::{Command, Coordinator, schedule};

impl Coordinator {
    pub(super) async fn handle_join(
        &mut self,
        connection_id: ConnectionId,
        name: PlayerName,
        avatar: Option<String>,
    ) -> Option<RoomId> {
        if !self.registry.register(connection_id.clone(), name.clone()) {
            return None;
        }
        tracing::info!("'{}' ({}) is looking for a room", name, connection_id);

        let avatar = Avatar::resolve(avatar.as_deref(), &name);
        let player = WaitingPlayer {
            connection_id: connection_id.clone(),
            name: name.clone(),
        };
        let rooms = &self.rooms;
        let admission = self.lobby.admit(player, || loop {
            let id = RoomId::generate();
            if rooms.get(&id).is_none() {
                break id;
            }
        });
        let room_id = admission.room_id;
        if admission.created {
            tracing::info!("Room '{}' created", room_id);
        }

        self.broadcaster.join_channel(&room_id, &connection_id);
        self.rooms
            .get_or_create(&room_id)
            .admit(&connection_id, PlayerProfile { name, avatar });

        self.broadcaster
            .to_connection(&connection_id, GameEvent::JoinedRoom(room_id.clone()))
            .await;
        let waiting = admission.waiting.len();
        self.broadcaster
            .to_room(&room_id, GameEvent::UpdateLobby(admission.waiting))
            .await;
        tracing::info!(
            "'{}' joined room '{}' ({} waiting)",
            self.registry.lookup(&connection_id),
            room_id,
            waiting
        );

        if waiting >= self.config.min_players && self.lobby.mark_activating(&room_id) {
            tracing::info!("Room '{}' is full enough, starting game", room_id);
            schedule(
                &self.commands,
                self.config.activation_delay,
                Command::ActivateRoom {
                    room_id: room_id.clone(),
                },
            );
        }

        Some(room_id)
    }

    /// Send `goToGame` to each waiting player individually, then schedule the
    /// removal of the room from the pool.
    pub(super) async fn handle_activate_room(&mut self, room_id: RoomId) {
        let Some(room) = self.lobby.get(&room_id) else {
            tracing::debug!("Room '{}' left the lobby before activation", room_id);
            return;
        };
        let players = room.players.clone();
        tracing::info!(
            "Sending goToGame to {} players of room '{}'",
            players.len(),
            room_id
        );
        for player in &players {
            self.broadcaster
                .to_connection(&player.connection_id, GameEvent::GoToGame(room_id.clone()))
                .await;
        }

        schedule(
            &self.commands,
            self.config.lobby_cleanup_delay,
            Command::CloseLobbyRoom { room_id },
        );
    }

    pub(super) fn handle_close_lobby_room(&mut self, room_id: RoomId) {
        if self.lobby.remove(&room_id).is_some() {
            tracing::info!("Room '{}' removed from the lobby", room_id);
        }
    }

    pub(super) async fn handle_disconnect(&mut self, connection_id: ConnectionId) {
        if let Some(name) = self.registry.remove(&connection_id) {
            tracing::info!("'{}' ({}) disconnected", name, connection_id);
        }
        let changed = self.lobby.prune(&connection_id);
        self.broadcaster.unregister(&connection_id).await;

        for (room_id, waiting) in changed {
            self.broadcaster
                .to_room(&room_id, GameEvent::UpdateLobby(waiting))
                .await;
        }
    }
}
