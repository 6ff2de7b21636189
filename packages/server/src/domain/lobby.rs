//! Open-Room Pool: rooms still accepting players, in creation order.

use super::value_object::{ConnectionId, PlayerName, RoomId, Timestamp};

/// A player waiting in a lobby.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitingPlayer {
    pub connection_id: ConnectionId,
    pub name: PlayerName,
}

/// Lobby view of a room.
#[derive(Debug, Clone)]
pub struct OpenRoom {
    pub id: RoomId,
    pub players: Vec<WaitingPlayer>,
    /// Set once the activation has been scheduled. Activating rooms are skipped
    /// by matchmaking while they wait to be removed from the pool.
    pub activating: bool,
    pub created_at: Timestamp,
}

impl OpenRoom {
    fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self {
            id,
            players: Vec::new(),
            activating: false,
            created_at,
        }
    }

    fn accepts_players(&self, capacity: usize) -> bool {
        !self.activating && self.players.len() < capacity
    }
}

/// Outcome of admitting a player to the pool.
#[derive(Debug, Clone)]
pub struct Admission {
    pub room_id: RoomId,
    pub created: bool,
    pub waiting: Vec<WaitingPlayer>,
}

#[derive(Debug)]
pub struct OpenRoomPool {
    capacity: usize,
    rooms: Vec<OpenRoom>,
}

impl OpenRoomPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            rooms: Vec::new(),
        }
    }

    /// Seat a player in the first open room, creating a room when none has space.
    ///
    /// `new_room_id` is only called when a room has to be created and is retried
    /// until it yields an id not already in the pool.
    pub fn admit(
        &mut self,
        player: WaitingPlayer,
        mut new_room_id: impl FnMut() -> RoomId,
    ) -> Admission {
        let (index, created) = match self
            .rooms
            .iter()
            .position(|room| room.accepts_players(self.capacity))
        {
            Some(index) => (index, false),
            None => {
                let mut id = new_room_id();
                while self.contains(&id) {
                    id = new_room_id();
                }
                self.rooms.push(OpenRoom::new(id, Timestamp::now()));
                (self.rooms.len() - 1, true)
            }
        };

        let room = &mut self.rooms[index];
        room.players.push(player);
        Admission {
            room_id: room.id.clone(),
            created,
            waiting: room.players.clone(),
        }
    }

    /// Mark a room as activating. Returns `false` if it is unknown or already activating.
    pub fn mark_activating(&mut self, room_id: &RoomId) -> bool {
        match self.rooms.iter_mut().find(|room| &room.id == room_id) {
            Some(room) if !room.activating => {
                room.activating = true;
                true
            }
            _ => false,
        }
    }

    /// Remove a connection from every waiting list.
    ///
    /// Returns the rooms whose list changed, with their remaining players.
    pub fn prune(&mut self, connection_id: &ConnectionId) -> Vec<(RoomId, Vec<WaitingPlayer>)> {
        let mut changed = Vec::new();
        for room in &mut self.rooms {
            let before = room.players.len();
            room.players.retain(|p| &p.connection_id != connection_id);
            if room.players.len() != before {
                changed.push((room.id.clone(), room.players.clone()));
            }
        }
        changed
    }

    /// Delete a room from the pool. Idempotent.
    pub fn remove(&mut self, room_id: &RoomId) -> Option<OpenRoom> {
        let index = self.rooms.iter().position(|room| &room.id == room_id)?;
        Some(self.rooms.remove(index))
    }

    pub fn get(&self, room_id: &RoomId) -> Option<&OpenRoom> {
        self.rooms.iter().find(|room| &room.id == room_id)
    }

    pub fn contains(&self, room_id: &RoomId) -> bool {
        self.get(room_id).is_some()
    }

    pub fn rooms(&self) -> &[OpenRoom] {
        &self.rooms
    }
}
