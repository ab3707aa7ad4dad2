//! Per-connection session state machine.

use std::sync::Arc;

use parlor_protocol::{ClientMessage, PlayerId, RoomCode, ServerMessage};

use crate::{Lobby, SessionError};

/// Where a connection stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Connected, not in any room.
    Unjoined,
    /// Member of exactly this room.
    InRoom(RoomCode),
    /// Connection ended. Terminal.
    Closed,
}

/// One connection's view of the lobby.
///
/// Created by [`Lobby::connect`]. Call [`close`](Session::close) when the
/// transport reports the connection gone; a session dropped without
/// closing is cleaned up on a background task instead.
#[derive(Debug)]
pub struct Session {
    player_id: PlayerId,
    state: SessionState,
    lobby: Arc<Lobby>,
}

impl Session {
    pub(crate) fn new(player_id: PlayerId, lobby: Arc<Lobby>) -> Self {
        Self {
            player_id,
            state: SessionState::Unjoined,
            lobby,
        }
    }

    /// This connection's identity. Fixed for the session's lifetime.
    pub fn player_id(&self) -> &PlayerId {
        &self.player_id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The room this session is in, if any.
    pub fn room_code(&self) -> Option<&RoomCode> {
        match &self.state {
            SessionState::InRoom(code) => Some(code),
            _ => None,
        }
    }

    /// Applies one client request.
    ///
    /// On success the requester has been sent `ROOM_JOINED` and every
    /// member of the room a `PLAYERS_UPDATE`. On failure the requester
    /// alone has been sent an `ERROR`, and the error is also returned for
    /// logging. Unknown message types are ignored.
    ///
    /// # Errors
    /// - [`SessionError::RoomNotFound`]: `JOIN_ROOM` named no active room
    /// - [`SessionError::ServerFull`]: `CREATE_ROOM` found no free code
    /// - [`SessionError::Closed`]: the session was already closed
    pub async fn handle(&mut self, msg: ClientMessage) -> Result<(), SessionError> {
        if self.state == SessionState::Closed {
            return Err(SessionError::Closed(self.player_id.clone()));
        }

        let result = match msg {
            ClientMessage::CreateRoom { name, color } => self
                .lobby
                .create_room(&self.player_id, &mut self.state, name, color)
                .await
                .map(|_| ()),
            ClientMessage::JoinRoom {
                room_code,
                name,
                color,
            } => {
                self.lobby
                    .join_room(&self.player_id, &mut self.state, room_code, name, color)
                    .await
            }
            ClientMessage::Unknown => {
                tracing::debug!(player_id = %self.player_id, "ignoring unknown message type");
                Ok(())
            }
        };

        if let Err(err) = &result {
            self.lobby
                .send_to(&self.player_id, ServerMessage::error(err.client_message()))
                .await;
        }
        result
    }

    /// Sends an `ERROR` to this session's client without changing state.
    ///
    /// Used for input that couldn't be decoded at all.
    pub async fn reject(&self, message: &str) -> Result<(), SessionError> {
        if self.state == SessionState::Closed {
            return Err(SessionError::Closed(self.player_id.clone()));
        }
        self.lobby
            .send_to(&self.player_id, ServerMessage::error(message))
            .await;
        Ok(())
    }

    /// Leaves the current room and unregisters the connection.
    ///
    /// Remaining members get a `PLAYERS_UPDATE`; a room left empty is
    /// deleted. Calling this more than once is a no-op.
    pub async fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        self.lobby.release(&self.player_id, &mut self.state).await;
    }
}

impl Drop for Session {
    /// `Drop` is synchronous, so cleanup of an unclosed session runs as a
    /// fire-and-forget task on the current runtime.
    fn drop(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(player_id = %self.player_id, "session dropped outside a runtime");
            return;
        };

        let lobby = Arc::clone(&self.lobby);
        let player_id = self.player_id.clone();
        let mut state = std::mem::replace(&mut self.state, SessionState::Closed);
        runtime.spawn(async move {
            lobby.release(&player_id, &mut state).await;
        });
    }
}
