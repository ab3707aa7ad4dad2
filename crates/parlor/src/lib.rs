//! # Parlor
//!
//! A real-time room broker. Clients connect over WebSocket, create or
//! join a room named by a four-digit code, and receive a
//! `PLAYERS_UPDATE` snapshot whenever the room's membership changes.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # async fn start() -> Result<(), parlor::ParlorError> {
//! let server = parlor::ParlorServer::builder()
//!     .bind("0.0.0.0:3000")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```
//!
//! The building blocks are re-exported from the member crates:
//! [`protocol`], [`room`], [`session`], and [`transport`].

mod config;
mod error;
mod handler;
pub mod logging;
mod server;

pub use config::ServerConfig;
pub use error::ParlorError;
pub use server::{ParlorServer, ParlorServerBuilder};

pub use parlor_protocol as protocol;
pub use parlor_room as room;
pub use parlor_session as session;
pub use parlor_transport as transport;
