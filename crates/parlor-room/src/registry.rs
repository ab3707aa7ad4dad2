//! The room registry: creates, tracks, and tears down rooms.

use std::collections::HashMap;

use parlor_protocol::{PlayerId, PlayerInfo, RoomCode};
use rand::Rng;

use crate::{Member, RegistryConfig, Room, RoomError};

/// Outcome of removing a member from a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Departure {
    /// The room still has members; this is its new roster.
    Remaining(Vec<PlayerInfo>),
    /// The roster became empty and the room was deleted.
    Closed,
    /// No room had that code. Nothing changed.
    Absent,
}

/// Every active room, keyed by code.
///
/// Codes are unique among active rooms, and no room is ever left in the
/// table with an empty roster once a member has been removed.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomCode, Room>,
    config: RegistryConfig,
}

impl RoomRegistry {
    /// Creates an empty registry.
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            rooms: HashMap::new(),
            config,
        }
    }

    /// Opens a room under a fresh random code and returns the code.
    ///
    /// The new room has no members yet; the caller adds the creator.
    ///
    /// # Errors
    /// [`RoomError::Exhausted`] if `max_code_attempts` candidates all
    /// collided with active rooms.
    pub fn create_room(&mut self) -> Result<RoomCode, RoomError> {
        self.create_room_with(&mut rand::rng())
    }

    /// [`create_room`](Self::create_room) with a caller-supplied RNG.
    pub fn create_room_with<R: Rng>(
        &mut self,
        rng: &mut R,
    ) -> Result<RoomCode, RoomError> {
        let attempts = self.config.max_code_attempts;
        for _ in 0..attempts {
            let code = RoomCode::from_index(rng.random_range(0..RoomCode::SPACE));
            if self.rooms.contains_key(&code) {
                tracing::trace!(%code, "room code collision, retrying");
                continue;
            }
            self.rooms.insert(code.clone(), Room::new(code.clone()));
            tracing::info!(%code, rooms = self.rooms.len(), "room created");
            return Ok(code);
        }

        tracing::warn!(attempts, rooms = self.rooms.len(), "room codes exhausted");
        Err(RoomError::Exhausted { attempts })
    }

    /// `true` if a room with this code is active.
    pub fn exists(&self, code: &RoomCode) -> bool {
        self.rooms.contains_key(code)
    }

    /// Appends a member to the room's roster.
    ///
    /// No duplicate check: adding the same identity twice yields two
    /// roster entries.
    ///
    /// # Errors
    /// [`RoomError::NotFound`] if the room doesn't exist.
    pub fn add_member(&mut self, code: &RoomCode, member: Member) -> Result<(), RoomError> {
        let room = self
            .rooms
            .get_mut(code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;

        tracing::info!(
            %code,
            player_id = %member.id,
            players = room.len() + 1,
            "player joined"
        );
        room.push(member);
        Ok(())
    }

    /// Removes every roster entry with this identity, deleting the room
    /// if that empties it.
    ///
    /// Safe to call for a room that is already gone or a player who
    /// isn't in it.
    pub fn remove_member(&mut self, code: &RoomCode, player_id: &PlayerId) -> Departure {
        let Some(room) = self.rooms.get_mut(code) else {
            return Departure::Absent;
        };

        let removed = room.remove_all(player_id);
        if removed > 0 {
            tracing::info!(%code, %player_id, players = room.len(), "player left");
        }

        if room.is_empty() {
            self.rooms.remove(code);
            tracing::info!(%code, rooms = self.rooms.len(), "room closed");
            Departure::Closed
        } else {
            Departure::Remaining(room.player_list())
        }
    }

    /// The room's roster as broadcast records, in join order.
    ///
    /// # Errors
    /// [`RoomError::NotFound`] if the room doesn't exist.
    pub fn list_members(&self, code: &RoomCode) -> Result<Vec<PlayerInfo>, RoomError> {
        self.rooms
            .get(code)
            .map(Room::player_list)
            .ok_or_else(|| RoomError::NotFound(code.clone()))
    }

    /// Looks up a room.
    pub fn room(&self, code: &RoomCode) -> Option<&Room> {
        self.rooms.get(code)
    }

    /// Number of active rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Codes of all active rooms, in no particular order.
    pub fn room_codes(&self) -> Vec<RoomCode> {
        self.rooms.keys().cloned().collect()
    }

    /// Registers an empty room under a chosen code. Test setup only.
    #[cfg(test)]
    pub(crate) fn insert_empty(&mut self, code: RoomCode) {
        self.rooms.insert(code.clone(), Room::new(code));
    }
}
