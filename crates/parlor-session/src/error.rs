//! Error types for the session layer.

use parlor_protocol::{PlayerId, ROOM_NOT_FOUND, RoomCode, SERVER_FULL};
use parlor_room::RoomError;

/// Why a session request failed.
///
/// Each variant has a client-facing text (see
/// [`client_message`](SessionError::client_message)) that is sent back
/// to the requester only.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The requested room doesn't exist.
    #[error("room {0} not found")]
    RoomNotFound(RoomCode),

    /// No free room code could be generated.
    #[error("server full: {0}")]
    ServerFull(#[source] RoomError),

    /// The session already went through its close transition.
    #[error("session for player {0} is closed")]
    Closed(PlayerId),
}

impl SessionError {
    /// Text for the `ERROR` message sent to the client.
    pub fn client_message(&self) -> &'static str {
        match self {
            Self::RoomNotFound(_) => ROOM_NOT_FOUND,
            Self::ServerFull(_) => SERVER_FULL,
            Self::Closed(_) => "Session closed",
        }
    }
}

impl From<RoomError> for SessionError {
    fn from(err: RoomError) -> Self {
        match err {
            RoomError::NotFound(code) => Self::RoomNotFound(code),
            err @ RoomError::Exhausted { .. } => Self::ServerFull(err),
        }
    }
}
