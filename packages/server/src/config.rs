//! Game configuration: thresholds and timings of matchmaking and rounds.

use std::time::Duration;

/// Seats per lobby room.
pub const ROOM_CAPACITY: usize = 5;
/// Players needed to start a game.
pub const MIN_PLAYERS: usize = 5;
/// Players needed to start a game in developer mode.
pub const DEV_MIN_PLAYERS: usize = 1;
pub const MAX_ROUNDS: u32 = 3;
pub const ROUND_DURATION: Duration = Duration::from_secs(20);
/// Delay between reaching the threshold and sending `goToGame`.
pub const ACTIVATION_DELAY: Duration = Duration::from_secs(1);
/// Delay between `goToGame` and removing the room from the lobby pool.
pub const LOBBY_CLEANUP_DELAY: Duration = Duration::from_secs(5);
/// Pause between a resolved round and `nextRound`.
pub const NEXT_ROUND_DELAY: Duration = Duration::from_secs(3);
/// How long a finished game stays readable over HTTP before it is evicted.
pub const FINISHED_ROOM_RETENTION: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub room_capacity: usize,
    pub min_players: usize,
    pub max_rounds: u32,
    pub round_duration: Duration,
    pub activation_delay: Duration,
    pub lobby_cleanup_delay: Duration,
    pub next_round_delay: Duration,
    pub finished_room_retention: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            room_capacity: ROOM_CAPACITY,
            min_players: MIN_PLAYERS,
            max_rounds: MAX_ROUNDS,
            round_duration: ROUND_DURATION,
            activation_delay: ACTIVATION_DELAY,
            lobby_cleanup_delay: LOBBY_CLEANUP_DELAY,
            next_round_delay: NEXT_ROUND_DELAY,
            finished_room_retention: FINISHED_ROOM_RETENTION,
        }
    }
}

impl GameConfig {
    /// Production settings with a single-player start threshold.
    pub fn development() -> Self {
        Self {
            min_players: DEV_MIN_PLAYERS,
            ..Self::default()
        }
    }

    pub fn for_mode(dev_mode: bool) -> Self {
        if dev_mode {
            Self::development()
        } else {
            Self::default()
        }
    }

    pub fn with_round_duration(mut self, round_duration: Duration) -> Self {
        self.round_duration = round_duration;
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_mode_switches_min_players_only() {
        // テスト項目: 開発モードでは開始人数のみが 1 人になる
        // given (前提条件):

        // when (操作):
        let production = GameConfig::for_mode(false);
        let development = GameConfig::for_mode(true);

        // then (期待する結果):
        assert_eq!(production.min_players, 5);
        assert_eq!(development.min_players, 1);
        assert_eq!(
            GameConfig {
                min_players: production.min_players,
                ..development
            },
            production
        );
    }

    #[test]
    fn test_with_max_rounds_keeps_at_least_one_round() {
        // テスト項目: 最大ラウンド数は 1 未満にならない
        // given (前提条件):
        let config = GameConfig::default();

        // when (操作):
        let config = config.with_max_rounds(0);

        // then (期待する結果):
        assert_eq!(config.max_rounds, 1);
    }
}
