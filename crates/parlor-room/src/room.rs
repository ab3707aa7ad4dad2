//! A single room and its roster.

use parlor_protocol::{PlayerId, PlayerInfo, RoomCode};

/// Placeholder for per-room game data. Always empty for now.
pub type GameState = serde_json::Map<String, serde_json::Value>;

/// One entry in a room's roster.
///
/// Only identity and display data live here; how to reach the player
/// is tracked separately by the session layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: PlayerId,
    pub name: String,
    pub color: String,
}

impl Member {
    pub fn new(id: PlayerId, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
        }
    }

    /// The broadcast projection of this member.
    pub fn info(&self) -> PlayerInfo {
        PlayerInfo {
            id: self.id.clone(),
            name: self.name.clone(),
            color: self.color.clone(),
        }
    }
}

/// An active room.
#[derive(Debug, Clone)]
pub struct Room {
    code: RoomCode,
    /// Join order is broadcast order.
    members: Vec<Member>,
    state: GameState,
}

impl Room {
    pub(crate) fn new(code: RoomCode) -> Self {
        Self {
            code,
            members: Vec::new(),
            state: GameState::new(),
        }
    }

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    /// Members in join order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// `true` if any roster entry carries this identity.
    pub fn contains(&self, player_id: &PlayerId) -> bool {
        self.members.iter().any(|m| &m.id == player_id)
    }

    /// Snapshot of the roster for a `PLAYERS_UPDATE`.
    pub fn player_list(&self) -> Vec<PlayerInfo> {
        self.members.iter().map(Member::info).collect()
    }

    pub(crate) fn push(&mut self, member: Member) {
        self.members.push(member);
    }

    /// Drops every entry with this identity. Returns how many were removed.
    pub(crate) fn remove_all(&mut self, player_id: &PlayerId) -> usize {
        let before = self.members.len();
        self.members.retain(|m| &m.id != player_id);
        before - self.members.len()
    }
}
