//! Wire protocol for Parlor.
//!
//! - **Types** ([`ClientMessage`], [`ServerMessage`], [`RoomCode`], ...):
//!   the JSON objects exchanged with clients, discriminated by `type`.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): bytes to messages and back.
//! - **Errors** ([`ProtocolError`]).
//!
//! The protocol layer knows nothing about connections or rooms.
//!
//! ```text
//! Transport (bytes) → Protocol (messages) → Session (room membership)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ClientMessage, INVALID_MESSAGE, PlayerId, PlayerInfo, ROOM_NOT_FOUND, RoomCode, SERVER_FULL,
    ServerMessage,
};
