//! Error types for the room layer.

use parlor_protocol::RoomCode;

/// Errors that can occur during registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// No active room has this code.
    #[error("room {0} not found")]
    NotFound(RoomCode),

    /// Every generated candidate collided with an active room.
    #[error("no free room code after {attempts} attempts")]
    Exhausted { attempts: u32 },
}
