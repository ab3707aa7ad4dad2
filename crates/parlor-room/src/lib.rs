//! Room registry for Parlor.
//!
//! The registry is the table of active rooms, keyed by four-digit
//! [`RoomCode`](parlor_protocol::RoomCode). Each room holds an ordered
//! roster of members and an opaque game-state placeholder. A room is
//! removed the moment its roster becomes empty.
//!
//! The registry is plain data with no locking of its own; the session
//! layer owns it behind a mutex.
//!
//! # Key types
//!
//! - [`RoomRegistry`]: create rooms, add and remove members
//! - [`Room`] / [`Member`]: a room and one entry in its roster
//! - [`Departure`]: what happened to a room after a member left
//! - [`RegistryConfig`]: retry budget for code generation

mod config;
mod error;
mod registry;
mod room;

pub use config::RegistryConfig;
pub use error::RoomError;
pub use registry::{Departure, RoomRegistry};
pub use room::{GameState, Member, Room};
