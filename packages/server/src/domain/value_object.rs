//! Value objects: identifiers, display names and avatars.

use std::fmt;

use serde::{Serialize, Serializer};
use uuid::Uuid;

use super::error::ValueObjectError;

/// Opaque identifier of one live connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.trim().is_empty() {
            return Err(ValueObjectError::ConnectionIdEmpty);
        }
        Ok(Self(id))
    }

    /// Generate a fresh connection id (UUID v4).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ConnectionId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for ConnectionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Identifier of a room, shared by the lobby view and the play view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(String);

impl RoomId {
    pub const MAX_LEN: usize = 64;
    const PREFIX: &'static str = "room-";
    const SUFFIX_LEN: usize = 12;

    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        let id = id.trim().to_string();
        if id.is_empty() {
            return Err(ValueObjectError::RoomIdEmpty);
        }
        if id.len() > Self::MAX_LEN {
            return Err(ValueObjectError::RoomIdTooLong(id.len()));
        }
        Ok(Self(id))
    }

    /// Synthesize a new room id with a random suffix, e.g. `room-3f2a9c01b7de`.
    pub fn generate() -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!("{}{}", Self::PREFIX, &suffix[..Self::SUFFIX_LEN]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for RoomId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Display name sent by the player at join time. Trimmed, never blank, any length
/// (front ends may send account ids such as UUIDs).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn new(name: String) -> Result<Self, ValueObjectError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ValueObjectError::PlayerNameEmpty);
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Guest identities are generated by the front end and carry a marker in the name.
    pub fn is_guest(&self) -> bool {
        GUEST_MARKERS.iter().any(|marker| self.0.contains(marker))
    }
}

impl TryFrom<String> for PlayerName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl Serialize for PlayerName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

const GUEST_MARKERS: [&str; 2] = ["게스트", "Guest"];

/// Glyphs a player may pick as avatar.
pub const AVATAR_GLYPHS: [char; 8] = ['🐶', '🐱', '🦊', '🐻', '🐼', '🐯', '🐰', '🐨'];

/// One of the fixed avatar glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Avatar(char);

impl Avatar {
    /// Accept exactly one known glyph (surrounding whitespace allowed).
    pub fn parse(value: &str) -> Option<Self> {
        let mut chars = value.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(glyph), None) if AVATAR_GLYPHS.contains(&glyph) => Some(Self(glyph)),
            _ => None,
        }
    }

    /// Fallback for guest names like "게스트 🦊": first known glyph in the name.
    pub fn from_guest_name(name: &PlayerName) -> Option<Self> {
        if !name.is_guest() {
            return None;
        }
        name.as_str()
            .chars()
            .find(|c| AVATAR_GLYPHS.contains(c))
            .map(Self)
    }

    /// Explicit choice wins; otherwise fall back to the guest-name glyph.
    pub fn resolve(explicit: Option<&str>, name: &PlayerName) -> Option<Self> {
        explicit
            .and_then(Self::parse)
            .or_else(|| Self::from_guest_name(name))
    }

    pub fn glyph(&self) -> char {
        self.0
    }
}

impl fmt::Display for Avatar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Avatar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Normalize free text for answer comparison: trim, then lower-case.
pub fn normalize_answer(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Unix timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn now() -> Self {
        Self(guessroom_shared::time::now_millis())
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
