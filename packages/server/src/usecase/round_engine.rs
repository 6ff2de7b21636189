//! UseCase: ラウンド進行（出題・回答判定・タイムアウト・次ラウンド・ゲーム終了）
//!
//! 状態遷移: `Idle → RoundActive → RoundResolved → (RoundActive | Idle | GameOver)`
//!
//! タイマー由来のコマンドは自分のラウンド番号を持っており、部屋が既に別の
//! フェーズ・ラウンドに進んでいれば破棄されます。1 ラウンドが 2 回終了することはありません。

use std::sync::Arc;

use crate::domain::{
    ConnectionId, FinalScore, GameEvent, GuessOutcome, RoomId, RoomPhase, RoomPlayState,
    ScoreReporter, Timestamp, UNKNOWN_PLAYER_NAME,
};

use super::coordinator::{Command, Coordinator, schedule};

impl Coordinator {
    pub(super) async fn handle_start_round(&mut self, connection_id: ConnectionId, room_id: RoomId) {
        let Some(room) = self.rooms.get_mut(&room_id) else {
            tracing::debug!("startRound for unknown room '{}' ignored", room_id);
            return;
        };
        if matches!(room.phase(), RoomPhase::RoundActive | RoomPhase::GameOver) {
            tracing::debug!(
                "startRound from '{}' ignored, room '{}' is {:?}",
                connection_id,
                room_id,
                room.phase()
            );
            return;
        }

        let question = self.picker.pick();
        let Some(round) = room.begin_round(&question) else {
            return;
        };
        match schedule(
            &self.commands,
            self.config.round_duration,
            Command::RoundTimeout {
                room_id: room_id.clone(),
                round,
            },
        ) {
            Some(timer) => room.arm_timer(timer),
            None => room.cancel_timer(),
        }
        tracing::info!("Round {} started in room '{}'", round, room_id);

        self.broadcaster
            .to_room(
                &room_id,
                GameEvent::RoundStart {
                    emoji: question.emoji,
                },
            )
            .await;
    }

    pub(super) async fn handle_guess(
        &mut self,
        connection_id: ConnectionId,
        room_id: RoomId,
        message: String,
    ) {
        let Some(room) = self.rooms.get_mut(&room_id) else {
            tracing::debug!("Guess for unknown room '{}' ignored", room_id);
            return;
        };
        if !room.is_round_active() {
            return;
        }
        if !room.players().contains(&connection_id) {
            tracing::warn!(
                "Guess from '{}' ignored, not a player of room '{}'",
                connection_id,
                room_id
            );
            return;
        }

        let name = self.registry.lookup(&connection_id).to_string();
        self.broadcaster
            .to_room(
                &room_id,
                GameEvent::NewGuess {
                    name: name.clone(),
                    message: message.clone(),
                },
            )
            .await;

        let GuessOutcome::Correct { score } = room.judge_guess(&connection_id, &message) else {
            return;
        };
        tracing::info!(
            "'{}' solved round {} in room '{}' (score: {})",
            name,
            room.round_count(),
            room_id,
            score
        );
        self.broadcaster
            .to_room(
                &room_id,
                GameEvent::CorrectGuess {
                    connection_id,
                    name,
                },
            )
            .await;
        self.announce_round_end(&room_id).await;
    }

    pub(super) async fn handle_round_timeout(&mut self, room_id: RoomId, round: u32) {
        let Some(room) = self.rooms.get_mut(&room_id) else {
            return;
        };
        if !room.expire_round(round) {
            tracing::debug!("Stale timeout of round {} in room '{}' dropped", round, room_id);
            return;
        }
        tracing::info!("Round {} timed out in room '{}'", round, room_id);
        self.announce_round_end(&room_id).await;
    }

    pub(super) async fn handle_next_round_due(&mut self, room_id: RoomId, round: u32) {
        let Some(room) = self.rooms.get_mut(&room_id) else {
            return;
        };
        if !room.prepare_next_round(round) {
            tracing::debug!("Stale next-round of round {} in room '{}' dropped", round, room_id);
            return;
        }
        self.broadcaster.to_room(&room_id, GameEvent::NextRound).await;
    }

    pub(super) fn handle_evict_room(&mut self, room_id: RoomId) {
        if !self.rooms.remove_finished(&room_id) {
            tracing::debug!("Eviction of room '{}' skipped, not finished", room_id);
            return;
        }
        self.broadcaster.close_channel(&room_id);
        tracing::info!("Finished room '{}' evicted", room_id);
    }

    /// Reveal the answer, then either schedule the next round or end the game.
    async fn announce_round_end(&mut self, room_id: &RoomId) {
        let Some(room) = self.rooms.get_mut(room_id) else {
            return;
        };
        self.broadcaster
            .to_room(
                room_id,
                GameEvent::RoundEnd {
                    answer: room.answer().to_string(),
                    scores: room.scores().clone(),
                },
            )
            .await;

        if room.has_rounds_left(self.config.max_rounds) {
            let round = room.round_count();
            match schedule(
                &self.commands,
                self.config.next_round_delay,
                Command::NextRoundDue {
                    room_id: room_id.clone(),
                    round,
                },
            ) {
                Some(timer) => room.arm_timer(timer),
                None => room.cancel_timer(),
            }
            return;
        }

        room.finish();
        tracing::info!(
            "Game over in room '{}' after {} rounds",
            room_id,
            room.round_count()
        );
        self.broadcaster
            .to_room(
                room_id,
                GameEvent::GameOver {
                    scores: room.scores().clone(),
                    players: room.players().clone(),
                },
            )
            .await;
        report_final_scores(&self.reporter, room);
        if let Some(timer) = schedule(
            &self.commands,
            self.config.finished_room_retention,
            Command::EvictRoom {
                room_id: room_id.clone(),
            },
        ) {
            room.arm_timer(timer);
        }
    }
}

/// Hand every final score to the reporter without waiting for it.
fn report_final_scores(reporter: &Arc<dyn ScoreReporter>, room: &RoomPlayState) {
    let finished_at = Timestamp::now();
    for (connection_id, score) in room.scores().iter() {
        let result = FinalScore {
            room_id: room.id.clone(),
            connection_id: connection_id.clone(),
            name: room
                .players()
                .get(connection_id)
                .map(|p| p.name.to_string())
                .unwrap_or_else(|| UNKNOWN_PLAYER_NAME.to_string()),
            score,
            finished_at,
        };
        let reporter = Arc::clone(reporter);
        tokio::spawn(async move {
            let connection_id = result.connection_id.clone();
            if let Err(e) = reporter.report(result).await {
                tracing::warn!("Failed to report score of '{}': {}", connection_id, e);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::mpsc;

    use crate::{
        config::GameConfig,
        domain::{
            ConnectionId, GameEvent, PlayerName, RoomId, RoomPhase, ScoreReportError,
            score_reporter::MockScoreReporter,
        },
        usecase::{
            CoordinatorHandle,
            test_support::{
                RecordingPusher, conn, frog_picker, silent_reporter, spawn_coordinator,
            },
        },
    };

    const ROUND_EVENTS: [&str; 6] = [
        "roundStart",
        "newGuess",
        "correctGuess",
        "roundEnd",
        "nextRound",
        "gameOver",
    ];

    fn name(value: &str) -> PlayerName {
        PlayerName::new(value.to_string()).unwrap()
    }

    fn round_events(pusher: &RecordingPusher, connection_id: &ConnectionId) -> Vec<&'static str> {
        pusher
            .event_names(connection_id)
            .into_iter()
            .filter(|name| ROUND_EVENTS.contains(name))
            .collect()
    }

    /// Seat alice and bob in one room (production thresholds, so the room stays open).
    async fn seat_two_players(handle: &CoordinatorHandle) -> RoomId {
        let room_id = handle
            .join(conn("alice"), name("Alice"), None)
            .await
            .unwrap();
        handle.join(conn("bob"), name("Bob"), None).await;
        room_id
    }

    #[tokio::test(start_paused = true)]
    async fn test_frog_scenario() {
        // テスト項目: 正解すると newGuess → correctGuess → roundEnd の順に届き、後からタイムアウトは来ない
        // given (前提条件):
        let (handle, pusher) =
            spawn_coordinator(GameConfig::default(), frog_picker(), silent_reporter());
        let room_id = seat_two_players(&handle).await;
        handle.start_round(conn("alice"), room_id.clone());

        // when (操作):
        handle.guess(conn("bob"), room_id.clone(), " Frog ".to_string());
        tokio::time::sleep(Duration::from_secs(30)).await;
        let detail = handle.room(room_id).await.unwrap();

        // then (期待する結果):
        assert_eq!(
            round_events(&pusher, &conn("alice")),
            vec!["roundStart", "newGuess", "correctGuess", "roundEnd", "nextRound"]
        );
        let events = pusher.events_for(&conn("alice"));
        assert!(events.contains(&GameEvent::RoundStart {
            emoji: "🐸".to_string()
        }));
        assert!(events.contains(&GameEvent::NewGuess {
            name: "Bob".to_string(),
            message: " Frog ".to_string(),
        }));
        assert!(events.contains(&GameEvent::CorrectGuess {
            connection_id: conn("bob"),
            name: "Bob".to_string(),
        }));
        let Some(GameEvent::RoundEnd { answer, scores }) = events
            .iter()
            .find(|e| matches!(e, GameEvent::RoundEnd { .. }))
        else {
            panic!("roundEnd expected");
        };
        assert_eq!(answer, "frog");
        assert_eq!(scores.get(&conn("bob")), Some(1));
        assert_eq!(scores.get(&conn("alice")), Some(0));
        assert_eq!(detail.phase, RoomPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_round_timeout_ends_round_once() {
        // テスト項目: 誰も正解しないとラウンド時間経過後に roundEnd が 1 回だけ届き、スコアは変わらない
        // given (前提条件):
        let (handle, pusher) =
            spawn_coordinator(GameConfig::default(), frog_picker(), silent_reporter());
        let room_id = seat_two_players(&handle).await;
        handle.start_round(conn("alice"), room_id.clone());
        handle.guess(conn("bob"), room_id.clone(), "toad".to_string());

        // when (操作):
        tokio::time::sleep(Duration::from_secs(21)).await;
        handle.rooms().await;
        let after_timeout = pusher.count(&conn("alice"), "roundEnd");
        tokio::time::sleep(Duration::from_secs(60)).await;
        let detail = handle.room(room_id).await.unwrap();

        // then (期待する結果):
        assert_eq!(after_timeout, 1);
        assert_eq!(pusher.count(&conn("alice"), "roundEnd"), 1);
        assert_eq!(pusher.count(&conn("alice"), "correctGuess"), 0);
        assert_eq!(pusher.count(&conn("alice"), "nextRound"), 1);
        assert!(detail.ranking.iter().all(|p| p.score == 0));
        assert_eq!(detail.phase, RoomPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_round_while_active_is_ignored() {
        // テスト項目: ラウンド進行中の startRound は無視される
        // given (前提条件):
        let (handle, pusher) =
            spawn_coordinator(GameConfig::default(), frog_picker(), silent_reporter());
        let room_id = seat_two_players(&handle).await;
        handle.start_round(conn("alice"), room_id.clone());

        // when (操作):
        handle.start_round(conn("bob"), room_id.clone());
        let detail = handle.room(room_id).await.unwrap();

        // then (期待する結果):
        assert_eq!(pusher.count(&conn("alice"), "roundStart"), 1);
        assert_eq!(detail.round_count, 1);
        assert_eq!(detail.phase, RoomPhase::RoundActive);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_correct_guess_scores_nothing() {
        // テスト項目: 解決済みのラウンドへの正解は採点されず、correctGuess も 1 回だけ
        // given (前提条件):
        let (handle, pusher) =
            spawn_coordinator(GameConfig::default(), frog_picker(), silent_reporter());
        let room_id = seat_two_players(&handle).await;
        handle.start_round(conn("alice"), room_id.clone());

        // when (操作):
        handle.guess(conn("bob"), room_id.clone(), "frog".to_string());
        handle.guess(conn("alice"), room_id.clone(), "frog".to_string());
        let detail = handle.room(room_id).await.unwrap();

        // then (期待する結果):
        assert_eq!(pusher.count(&conn("alice"), "correctGuess"), 1);
        assert_eq!(pusher.count(&conn("alice"), "newGuess"), 1);
        let scores: Vec<(&str, u32)> = detail
            .ranking
            .iter()
            .map(|p| (p.name.as_str(), p.score))
            .collect();
        assert_eq!(scores, vec![("Bob", 1), ("Alice", 0)]);
    }

    #[tokio::test]
    async fn test_guess_from_outsider_is_ignored() {
        // テスト項目: 部屋に参加していない接続からの回答は無視される
        // given (前提条件):
        let (handle, pusher) =
            spawn_coordinator(GameConfig::default(), frog_picker(), silent_reporter());
        let room_id = seat_two_players(&handle).await;
        handle.start_round(conn("alice"), room_id.clone());

        // when (操作):
        handle.guess(conn("mallory"), room_id.clone(), "frog".to_string());
        let detail = handle.room(room_id).await.unwrap();

        // then (期待する結果):
        assert_eq!(pusher.count(&conn("alice"), "newGuess"), 0);
        assert_eq!(detail.phase, RoomPhase::RoundActive);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_round_during_pause_cancels_next_round() {
        // テスト項目: 次ラウンドまでの待機中に startRound すると待機タイマーは破棄され nextRound は届かない
        // given (前提条件):
        let (handle, pusher) =
            spawn_coordinator(GameConfig::default(), frog_picker(), silent_reporter());
        let room_id = seat_two_players(&handle).await;
        handle.start_round(conn("alice"), room_id.clone());
        handle.guess(conn("bob"), room_id.clone(), "frog".to_string());

        // when (操作):
        handle.start_round(conn("alice"), room_id.clone());
        tokio::time::sleep(Duration::from_secs(5)).await;
        let detail = handle.room(room_id).await.unwrap();

        // then (期待する結果):
        assert_eq!(pusher.count(&conn("alice"), "nextRound"), 0);
        assert_eq!(pusher.count(&conn("alice"), "roundStart"), 2);
        assert_eq!(detail.round_count, 2);
        assert_eq!(detail.phase, RoomPhase::RoundActive);
    }

    #[tokio::test(start_paused = true)]
    async fn test_game_over_after_max_rounds() {
        // テスト項目: 3 ラウンド目の終了後は nextRound の代わりに gameOver が届き、以降の startRound は無視される
        // given (前提条件):
        let (handle, pusher) =
            spawn_coordinator(GameConfig::default(), frog_picker(), silent_reporter());
        let room_id = seat_two_players(&handle).await;

        // when (操作):
        for _ in 0..3 {
            handle.start_round(conn("alice"), room_id.clone());
            handle.guess(conn("bob"), room_id.clone(), "frog".to_string());
            tokio::time::sleep(Duration::from_secs(4)).await;
        }
        handle.start_round(conn("alice"), room_id.clone());
        let detail = handle.room(room_id).await.unwrap();

        // then (期待する結果):
        assert_eq!(
            round_events(&pusher, &conn("alice")),
            vec![
                "roundStart",
                "newGuess",
                "correctGuess",
                "roundEnd",
                "nextRound",
                "roundStart",
                "newGuess",
                "correctGuess",
                "roundEnd",
                "nextRound",
                "roundStart",
                "newGuess",
                "correctGuess",
                "roundEnd",
                "gameOver",
            ]
        );
        let Some(GameEvent::GameOver { scores, players }) =
            pusher.events_for(&conn("bob")).into_iter().last()
        else {
            panic!("gameOver expected last");
        };
        assert_eq!(scores.get(&conn("bob")), Some(3));
        assert_eq!(players.len(), 2);
        assert_eq!(detail.phase, RoomPhase::GameOver);
        assert_eq!(detail.round_count, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_finished_room_is_evicted_after_retention() {
        // テスト項目: 終了したゲームは保持期間の間だけ参照でき、その後は部屋一覧からも消える
        // given (前提条件):
        let config = GameConfig {
            finished_room_retention: Duration::from_secs(60),
            ..GameConfig::default().with_max_rounds(1)
        };
        let (handle, pusher) = spawn_coordinator(config, frog_picker(), silent_reporter());
        let room_id = seat_two_players(&handle).await;
        handle.start_round(conn("alice"), room_id.clone());
        handle.guess(conn("bob"), room_id.clone(), "frog".to_string());

        // when (操作):
        tokio::time::sleep(Duration::from_secs(59)).await;
        let during_retention = handle.room(room_id.clone()).await;
        tokio::time::sleep(Duration::from_secs(2)).await;
        let after_retention = handle.room(room_id.clone()).await;

        // then (期待する結果):
        assert_eq!(during_retention.unwrap().phase, RoomPhase::GameOver);
        assert!(after_retention.is_none());
        assert!(handle.rooms().await.is_empty());
        assert_eq!(pusher.count(&conn("alice"), "gameOver"), 1);
    }

    #[tokio::test]
    async fn test_final_scores_are_reported_per_player() {
        // テスト項目: ゲーム終了時に全プレイヤーの最終スコアが ScoreReporter に渡される
        // given (前提条件):
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut reporter = MockScoreReporter::new();
        reporter.expect_report().times(2).returning(move |result| {
            let _ = tx.send(result);
            Ok(())
        });
        let config = GameConfig::default().with_max_rounds(1);
        let (handle, _pusher) = spawn_coordinator(config, frog_picker(), reporter);
        let room_id = seat_two_players(&handle).await;
        handle.start_round(conn("alice"), room_id.clone());

        // when (操作):
        handle.guess(conn("bob"), room_id.clone(), "frog".to_string());
        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();

        // then (期待する結果):
        let mut reported = vec![
            (first.name, first.score),
            (second.name, second.score),
        ];
        reported.sort();
        assert_eq!(
            reported,
            vec![("Alice".to_string(), 0), ("Bob".to_string(), 1)]
        );
        assert_eq!(first.room_id, room_id);
    }

    #[tokio::test]
    async fn test_failing_reporter_does_not_block_game_over() {
        // テスト項目: スコア送信が失敗してもゲームは GameOver のまま参照できる
        // given (前提条件):
        let mut reporter = MockScoreReporter::new();
        reporter
            .expect_report()
            .returning(|_| Err(ScoreReportError::Rejected(503)));
        let config = GameConfig::default().with_max_rounds(1);
        let (handle, pusher) = spawn_coordinator(config, frog_picker(), reporter);
        let room_id = seat_two_players(&handle).await;
        handle.start_round(conn("alice"), room_id.clone());

        // when (操作):
        handle.guess(conn("alice"), room_id.clone(), "FROG".to_string());
        let detail = handle.room(room_id).await.unwrap();

        // then (期待する結果):
        assert_eq!(detail.phase, RoomPhase::GameOver);
        assert_eq!(pusher.count(&conn("bob"), "gameOver"), 1);
    }
}
