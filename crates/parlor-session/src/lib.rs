//! Session handling for Parlor.
//!
//! Each connection gets a [`Session`]: an ephemeral [`PlayerId`] plus a
//! small state machine that turns `CREATE_ROOM` / `JOIN_ROOM` requests
//! and the final close into registry updates and broadcasts.
//!
//! ```text
//! Unjoined ──create/join──→ InRoom(code) ──close──→ Closed
//!     └──────────────────close───────────────────────↗
//! ```
//!
//! All sessions share one [`Lobby`]: the room registry plus a
//! [`ConnectionHub`] that maps identities to outbound channels. The
//! roster never holds a channel, so rooms can be exercised in tests
//! with nothing but `mpsc` receivers on the other end.
//!
//! [`PlayerId`]: parlor_protocol::PlayerId

mod error;
mod hub;
mod lobby;
mod session;

pub use error::SessionError;
pub use hub::{ConnectionHub, PlayerSender};
pub use lobby::Lobby;
pub use session::{Session, SessionState};
