//! Room State Store: the authoritative play state of every room.
//!
//! The round lifecycle of one room is
//! `Idle → RoundActive → RoundResolved → (RoundActive | Idle | GameOver)`.
//! The transitions live on [`RoomPlayState`]; scheduling and broadcasting are
//! the coordinator's job.

use std::collections::HashMap;

use serde::{Serialize, Serializer, ser::SerializeMap};
use tokio::task::AbortHandle;

use super::{
    question::Question,
    value_object::{Avatar, ConnectionId, PlayerName, RoomId, Timestamp, normalize_answer},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomPhase {
    Idle,
    RoundActive,
    RoundResolved,
    GameOver,
}

impl RoomPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomPhase::Idle => "idle",
            RoomPhase::RoundActive => "roundActive",
            RoomPhase::RoundResolved => "roundResolved",
            RoomPhase::GameOver => "gameOver",
        }
    }
}

/// Display data of a player in the play view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerProfile {
    pub name: PlayerName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Avatar>,
}

/// Scores keyed by connection, in insertion order. Serializes as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scoreboard {
    entries: Vec<(ConnectionId, u32)>,
}

impl Scoreboard {
    /// Add a zero entry unless the connection already has a score.
    pub fn ensure(&mut self, connection_id: &ConnectionId) {
        if self.get(connection_id).is_none() {
            self.entries.push((connection_id.clone(), 0));
        }
    }

    /// Add exactly one point. Returns the new score, or `None` for unknown connections.
    pub fn increment(&mut self, connection_id: &ConnectionId) -> Option<u32> {
        let (_, score) = self
            .entries
            .iter_mut()
            .find(|(id, _)| id == connection_id)?;
        *score += 1;
        Some(*score)
    }

    pub fn get(&self, connection_id: &ConnectionId) -> Option<u32> {
        self.entries
            .iter()
            .find(|(id, _)| id == connection_id)
            .map(|(_, score)| *score)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ConnectionId, u32)> {
        self.entries.iter().map(|(id, score)| (id, *score))
    }

    /// Entries sorted by score, highest first. Ties keep insertion order.
    pub fn ranked(&self) -> Vec<(ConnectionId, u32)> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Scoreboard {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, score) in &self.entries {
            map.serialize_entry(id, score)?;
        }
        map.end()
    }
}

/// Players of a room, in admission order. Serializes as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerRoster {
    entries: Vec<(ConnectionId, PlayerProfile)>,
}

impl PlayerRoster {
    /// Insert or replace the profile of a connection, keeping its position.
    pub fn upsert(&mut self, connection_id: &ConnectionId, profile: PlayerProfile) {
        match self.entries.iter_mut().find(|(id, _)| id == connection_id) {
            Some((_, existing)) => *existing = profile,
            None => self.entries.push((connection_id.clone(), profile)),
        }
    }

    pub fn get(&self, connection_id: &ConnectionId) -> Option<&PlayerProfile> {
        self.entries
            .iter()
            .find(|(id, _)| id == connection_id)
            .map(|(_, profile)| profile)
    }

    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.get(connection_id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ConnectionId, &PlayerProfile)> {
        self.entries.iter().map(|(id, profile)| (id, profile))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for PlayerRoster {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, profile) in &self.entries {
            map.serialize_entry(id, profile)?;
        }
        map.end()
    }
}

/// Result of judging a guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessOutcome {
    /// No round is accepting guesses.
    Closed,
    Miss,
    /// The round is resolved; carries the guesser's new score.
    Correct { score: u32 },
}

#[derive(Debug)]
pub struct RoomPlayState {
    pub id: RoomId,
    answer: String,
    scores: Scoreboard,
    players: PlayerRoster,
    phase: RoomPhase,
    round_count: u32,
    pending_timer: Option<AbortHandle>,
    pub created_at: Timestamp,
}

impl RoomPlayState {
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self {
            id,
            answer: String::new(),
            scores: Scoreboard::default(),
            players: PlayerRoster::default(),
            phase: RoomPhase::Idle,
            round_count: 0,
            pending_timer: None,
            created_at,
        }
    }

    /// Admit a player: zero score (an existing score is kept) and a roster entry.
    pub fn admit(&mut self, connection_id: &ConnectionId, profile: PlayerProfile) {
        self.scores.ensure(connection_id);
        self.players.upsert(connection_id, profile);
    }

    pub fn is_round_active(&self) -> bool {
        self.phase == RoomPhase::RoundActive
    }

    /// Open a new answer window.
    ///
    /// Returns the new round number, or `None` while a round is active or after
    /// game over. Any pending timer must be replaced by the caller via [`Self::arm_timer`].
    pub fn begin_round(&mut self, question: &Question) -> Option<u32> {
        match self.phase {
            RoomPhase::RoundActive | RoomPhase::GameOver => None,
            RoomPhase::Idle | RoomPhase::RoundResolved => {
                self.answer = normalize_answer(&question.answer);
                self.round_count += 1;
                self.phase = RoomPhase::RoundActive;
                Some(self.round_count)
            }
        }
    }

    /// Judge a guess against the current answer.
    pub fn judge_guess(&mut self, connection_id: &ConnectionId, text: &str) -> GuessOutcome {
        if !self.is_round_active() {
            return GuessOutcome::Closed;
        }
        if normalize_answer(text) != self.answer {
            return GuessOutcome::Miss;
        }
        let Some(score) = self.scores.increment(connection_id) else {
            return GuessOutcome::Miss;
        };
        self.phase = RoomPhase::RoundResolved;
        self.cancel_timer();
        GuessOutcome::Correct { score }
    }

    /// Close the window of `round` when its timer elapses. `false` if the round
    /// was already resolved (or a newer round is running).
    pub fn expire_round(&mut self, round: u32) -> bool {
        if !self.is_round_active() || self.round_count != round {
            return false;
        }
        self.phase = RoomPhase::RoundResolved;
        self.pending_timer = None;
        true
    }

    /// Return to `Idle` after the pause that follows `round`.
    pub fn prepare_next_round(&mut self, round: u32) -> bool {
        if self.phase != RoomPhase::RoundResolved || self.round_count != round {
            return false;
        }
        self.phase = RoomPhase::Idle;
        self.pending_timer = None;
        true
    }

    pub fn has_rounds_left(&self, max_rounds: u32) -> bool {
        self.round_count < max_rounds
    }

    pub fn finish(&mut self) {
        self.cancel_timer();
        self.phase = RoomPhase::GameOver;
    }

    /// Install the timer of the current phase, disposing of the previous one.
    pub fn arm_timer(&mut self, handle: AbortHandle) {
        self.cancel_timer();
        self.pending_timer = Some(handle);
    }

    pub fn cancel_timer(&mut self) {
        if let Some(handle) = self.pending_timer.take() {
            handle.abort();
        }
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn scores(&self) -> &Scoreboard {
        &self.scores
    }

    pub fn players(&self) -> &PlayerRoster {
        &self.players
    }

    pub fn phase(&self) -> RoomPhase {
        self.phase
    }

    pub fn round_count(&self) -> u32 {
        self.round_count
    }
}

impl Drop for RoomPlayState {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

/// All play states, keyed by room id.
#[derive(Debug, Default)]
pub struct RoomStateStore {
    rooms: HashMap<RoomId, RoomPlayState>,
}

impl RoomStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Play state of `room_id`, created empty if absent.
    pub fn get_or_create(&mut self, room_id: &RoomId) -> &mut RoomPlayState {
        self.rooms
            .entry(room_id.clone())
            .or_insert_with(|| RoomPlayState::new(room_id.clone(), Timestamp::now()))
    }

    pub fn get(&self, room_id: &RoomId) -> Option<&RoomPlayState> {
        self.rooms.get(room_id)
    }

    pub fn get_mut(&mut self, room_id: &RoomId) -> Option<&mut RoomPlayState> {
        self.rooms.get_mut(room_id)
    }

    /// Drop the play state of a finished game. Rooms still in play are kept.
    pub fn remove_finished(&mut self, room_id: &RoomId) -> bool {
        match self.rooms.get(room_id) {
            Some(room) if room.phase() == RoomPhase::GameOver => {
                self.rooms.remove(room_id);
                true
            }
            _ => false,
        }
    }

    /// Play states ordered by creation time.
    pub fn list(&self) -> Vec<&RoomPlayState> {
        let mut rooms: Vec<&RoomPlayState> = self.rooms.values().collect();
        rooms.sort_by_key(|room| (room.created_at, room.id.clone()));
        rooms
    }
}
