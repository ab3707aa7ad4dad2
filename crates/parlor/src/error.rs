//! Server-level errors.
//!
//! Request failures never reach this type: the session answers them with
//! an `ERROR` message and the connection carries on.

use parlor_transport::TransportError;

/// Why the server failed to start, or why one connection ended abnormally.
#[derive(Debug, thiserror::Error)]
pub enum ParlorError {
    /// Binding, accepting, handshaking, sending or receiving failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Startup configuration could not be used.
    #[error("invalid configuration: {0}")]
    Config(String),
}
