//! Per-connection handler: decode requests, apply them, flush replies.
//!
//! Each accepted connection first completes its WebSocket handshake on
//! this task, then runs two tasks:
//!   1. this handler, reading frames and feeding them to the session
//!   2. a writer, draining the session's outbound channel to the socket
//!
//! Broadcasts from other connections only touch the channel, so they
//! never wait on this connection's socket.

use std::sync::Arc;

use parlor_protocol::{ClientMessage, Codec, INVALID_MESSAGE, ServerMessage};
use parlor_session::SessionError;
use parlor_transport::{Connection, Incoming, IncomingWebSocket, WebSocketConnection};
use tokio::sync::mpsc;

use crate::ParlorError;
use crate::server::ServerState;

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    incoming: IncomingWebSocket,
    state: Arc<ServerState<C>>,
) -> Result<(), ParlorError> {
    let peer = incoming.peer_addr();
    let conn = Arc::new(incoming.handshake().await?);
    let conn_id = conn.id();

    let (tx, rx) = mpsc::unbounded_channel();
    let mut session = state.lobby.connect(tx).await;
    let player_id = session.player_id().clone();
    tracing::info!(%conn_id, %player_id, %peer, "player connected");

    let writer = tokio::spawn(write_loop(Arc::clone(&conn), Arc::clone(&state), rx));

    let result = loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%player_id, "connection closed cleanly");
                break Ok(());
            }
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "recv error");
                break Err(ParlorError::Transport(e));
            }
        };

        let outcome = match state.codec.decode::<ClientMessage>(&data) {
            Ok(msg) => session.handle(msg).await,
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "failed to decode message");
                session.reject(INVALID_MESSAGE).await
            }
        };

        match outcome {
            Ok(()) => {}
            Err(SessionError::Closed(_)) => break Ok(()),
            Err(e) => tracing::debug!(%player_id, error = %e, "request rejected"),
        }
    };

    // Unregistering drops the channel sender, which ends the writer once
    // it has flushed what's queued. Closing after that sends the close
    // frame last.
    session.close().await;
    if let Err(e) = writer.await {
        tracing::warn!(%player_id, error = %e, "writer task failed");
    }
    if let Err(e) = conn.close().await {
        tracing::debug!(%player_id, error = %e, "close failed");
    }
    tracing::info!(%conn_id, %player_id, "player disconnected");
    result
}

/// Forwards queued messages to the socket until the channel closes or a
/// write fails.
async fn write_loop<C: Codec>(
    conn: Arc<WebSocketConnection>,
    state: Arc<ServerState<C>>,
    mut rx: mpsc::UnboundedReceiver<ServerMessage>,
) {
    while let Some(msg) = rx.recv().await {
        let bytes = match state.codec.encode(&msg) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(conn_id = %conn.id(), error = %e, "failed to encode message");
                continue;
            }
        };
        if let Err(e) = conn.send(&bytes).await {
            tracing::debug!(conn_id = %conn.id(), error = %e, "send failed, stopping writer");
            break;
        }
    }
}
