//! Message types exchanged with clients.
//!
//! Every message is a JSON object whose `type` field selects the variant:
//!
//! ```text
//! {"type":"JOIN_ROOM","roomCode":"0423","name":"Bo","color":"blue"}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Text of the `ERROR` sent when a join names a room that doesn't exist.
pub const ROOM_NOT_FOUND: &str = "Room not found";

/// Text of the `ERROR` sent when an inbound message can't be parsed.
pub const INVALID_MESSAGE: &str = "Invalid message";

/// Text of the `ERROR` sent when no free room code could be found.
pub const SERVER_FULL: &str = "Server full";

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Ephemeral identity of one connection.
///
/// Assigned when the connection is accepted and never changed afterwards.
/// Serialized as a bare string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Wraps an identity string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The external identifier of a room: four zero-padded decimal digits.
///
/// Codes arriving from clients are kept verbatim; a code that isn't
/// well formed is never issued and so is never found.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Number of distinct codes (`"0000"` through `"9999"`).
    pub const SPACE: u16 = 10_000;

    /// Formats `index` as a four-digit code. Indices past the code space
    /// wrap around.
    pub fn from_index(index: u16) -> Self {
        Self(format!("{:04}", index % Self::SPACE))
    }

    /// Wraps a code string without validating it.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` for exactly four ASCII digits.
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == 4 && self.0.bytes().all(|b| b.is_ascii_digit())
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Broadcast view of a room member. Carries no connection handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub id: PlayerId,
    pub name: String,
    pub color: String,
}

// ---------------------------------------------------------------------------
// Client → server
// ---------------------------------------------------------------------------

/// Requests a client can send.
///
/// `name` and `color` are opaque display strings; missing fields decode
/// as empty strings. Any `type` not listed here decodes as
/// [`ClientMessage::Unknown`] and is ignored by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessage {
    /// Open a new room and join it as its first member.
    CreateRoom {
        #[serde(default)]
        name: String,
        #[serde(default)]
        color: String,
    },

    /// Join the room with the given code.
    JoinRoom {
        #[serde(rename = "roomCode", default)]
        room_code: RoomCode,
        #[serde(default)]
        name: String,
        #[serde(default)]
        color: String,
    },

    /// Any other `type` value.
    #[serde(other)]
    Unknown,
}

// ---------------------------------------------------------------------------
// Server → client
// ---------------------------------------------------------------------------

/// Messages the server pushes to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    /// Sent to the requester after a successful create or join.
    RoomJoined {
        #[serde(rename = "roomCode")]
        room_code: RoomCode,
    },

    /// Full membership snapshot, in join order, sent to every member
    /// whenever membership changes.
    PlayersUpdate { players: Vec<PlayerInfo> },

    /// A request failed. Only the requester receives this.
    Error { message: String },
}

impl ServerMessage {
    /// Builds an `ERROR` message.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}
