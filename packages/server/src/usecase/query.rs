//! Read-only snapshots of the coordinator state for the HTTP API.

use crate::domain::{
    Avatar, ConnectionId, RoomId, RoomPhase, Timestamp, UNKNOWN_PLAYER_NAME, WaitingPlayer,
};

use super::coordinator::Coordinator;

/// A room of the open-room pool.
#[derive(Debug, Clone)]
pub struct LobbySnapshot {
    pub id: RoomId,
    pub players: Vec<WaitingPlayer>,
    pub activating: bool,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct RoomSummary {
    pub id: RoomId,
    pub phase: RoomPhase,
    pub round_count: u32,
    pub player_count: usize,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct RankedPlayer {
    pub connection_id: ConnectionId,
    pub name: String,
    pub avatar: Option<Avatar>,
    pub score: u32,
}

/// A room with its players ranked by score, highest first.
#[derive(Debug, Clone)]
pub struct RoomDetail {
    pub id: RoomId,
    pub phase: RoomPhase,
    pub round_count: u32,
    pub ranking: Vec<RankedPlayer>,
    pub created_at: Timestamp,
}

impl Coordinator {
    pub(super) fn lobby_snapshots(&self) -> Vec<LobbySnapshot> {
        self.lobby
            .rooms()
            .iter()
            .map(|room| LobbySnapshot {
                id: room.id.clone(),
                players: room.players.clone(),
                activating: room.activating,
                created_at: room.created_at,
            })
            .collect()
    }

    pub(super) fn room_summaries(&self) -> Vec<RoomSummary> {
        self.rooms
            .list()
            .into_iter()
            .map(|room| RoomSummary {
                id: room.id.clone(),
                phase: room.phase(),
                round_count: room.round_count(),
                player_count: room.players().len(),
                created_at: room.created_at,
            })
            .collect()
    }

    pub(super) fn room_detail(&self, room_id: &RoomId) -> Option<RoomDetail> {
        let room = self.rooms.get(room_id)?;
        let ranking = room
            .scores()
            .ranked()
            .into_iter()
            .map(|(connection_id, score)| {
                let profile = room.players().get(&connection_id);
                RankedPlayer {
                    name: profile
                        .map(|p| p.name.to_string())
                        .unwrap_or_else(|| UNKNOWN_PLAYER_NAME.to_string()),
                    avatar: profile.and_then(|p| p.avatar),
                    connection_id,
                    score,
                }
            })
            .collect();

        Some(RoomDetail {
            id: room.id.clone(),
            phase: room.phase(),
            round_count: room.round_count(),
            ranking,
            created_at: room.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        config::GameConfig,
        domain::{PlayerName, RoomPhase},
        usecase::test_support::{conn, frog_picker, silent_reporter, spawn_coordinator},
    };

    fn name(value: &str) -> PlayerName {
        PlayerName::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_room_detail_ranks_by_score() {
        // テスト項目: 部屋の詳細ではスコアの高い順に並び、同点は参加順になる
        // given (前提条件):
        let (handle, _pusher) =
            spawn_coordinator(GameConfig::default(), frog_picker(), silent_reporter());
        let room_id = handle
            .join(conn("amy"), name("Amy"), None)
            .await
            .unwrap();
        handle.join(conn("ben"), name("Ben"), None).await;
        handle.join(conn("cat"), name("Cat"), None).await;
        handle.start_round(conn("amy"), room_id.clone());
        handle.guess(conn("cat"), room_id.clone(), "frog".to_string());

        // when (操作):
        let detail = handle.room(room_id).await.unwrap();

        // then (期待する結果):
        let names: Vec<&str> = detail.ranking.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Cat", "Amy", "Ben"]);
        assert_eq!(detail.ranking[0].score, 1);
        assert_eq!(detail.phase, RoomPhase::RoundResolved);
        assert_eq!(detail.round_count, 1);
    }

    #[tokio::test]
    async fn test_room_summaries_count_players() {
        // テスト項目: 部屋一覧にはプレイヤー数と状態が含まれる
        // given (前提条件):
        let (handle, _pusher) =
            spawn_coordinator(GameConfig::default(), frog_picker(), silent_reporter());
        let room_id = handle
            .join(conn("amy"), name("Amy"), None)
            .await
            .unwrap();
        handle.join(conn("ben"), name("Ben"), None).await;

        // when (操作):
        let rooms = handle.rooms().await;

        // then (期待する結果):
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].id, room_id);
        assert_eq!(rooms[0].player_count, 2);
        assert_eq!(rooms[0].phase, RoomPhase::Idle);
        assert_eq!(rooms[0].round_count, 0);
    }
}
