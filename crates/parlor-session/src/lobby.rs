//! Shared state for every session: the room registry and the hub.

use std::sync::Arc;

use parlor_protocol::{PlayerId, PlayerInfo, RoomCode, ServerMessage};
use parlor_room::{Departure, Member, RegistryConfig, RoomRegistry};
use rand::Rng;
use tokio::sync::Mutex;

use crate::{ConnectionHub, PlayerSender, Session, SessionError, SessionState};

/// The process-wide room table plus the channel of every connection.
///
/// Lock order is `registry`, then `hub`. Every membership change and
/// the broadcasts it causes happen while the registry lock is held, so
/// all members of a room see the same sequence of snapshots.
#[derive(Debug)]
pub struct Lobby {
    registry: Mutex<RoomRegistry>,
    hub: Mutex<ConnectionHub>,
}

impl Lobby {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            registry: Mutex::new(RoomRegistry::new(config)),
            hub: Mutex::new(ConnectionHub::new()),
        }
    }

    /// Registers a new connection and returns its session.
    ///
    /// The session gets a fresh identity that no live connection holds.
    /// Everything the session is sent arrives on `sender`'s receiver.
    pub async fn connect(self: &Arc<Self>, sender: PlayerSender) -> Session {
        let mut hub = self.hub.lock().await;
        let player_id = loop {
            let candidate = generate_player_id();
            if !hub.is_registered(&candidate) {
                break candidate;
            }
        };
        hub.register(player_id.clone(), sender);
        tracing::debug!(%player_id, connections = hub.len(), "session opened");

        Session::new(player_id, Arc::clone(self))
    }

    /// `true` if a room with this code is active.
    pub async fn room_exists(&self, code: &RoomCode) -> bool {
        self.registry.lock().await.exists(code)
    }

    /// Number of active rooms.
    pub async fn room_count(&self) -> usize {
        self.registry.lock().await.room_count()
    }

    /// A room's roster in join order, or `None` if it doesn't exist.
    pub async fn members(&self, code: &RoomCode) -> Option<Vec<PlayerInfo>> {
        self.registry.lock().await.list_members(code).ok()
    }

    /// Number of registered connections.
    pub async fn connection_count(&self) -> usize {
        self.hub.lock().await.len()
    }

    // -- Transitions driven by `Session` ----------------------------------

    pub(crate) async fn create_room(
        &self,
        player_id: &PlayerId,
        state: &mut SessionState,
        name: String,
        color: String,
    ) -> Result<RoomCode, SessionError> {
        let mut registry = self.registry.lock().await;
        let code = registry.create_room()?;
        let hub = self.hub.lock().await;

        leave_current(&mut registry, &hub, player_id, state);
        enter(&mut registry, &hub, player_id, state, code.clone(), name, color)?;
        Ok(code)
    }

    pub(crate) async fn join_room(
        &self,
        player_id: &PlayerId,
        state: &mut SessionState,
        code: RoomCode,
        name: String,
        color: String,
    ) -> Result<(), SessionError> {
        let mut registry = self.registry.lock().await;
        if !registry.exists(&code) {
            return Err(SessionError::RoomNotFound(code));
        }
        let hub = self.hub.lock().await;

        if matches!(&*state, SessionState::InRoom(current) if *current == code) {
            // Already a member: acknowledge again, keep a single entry.
            let players = registry.list_members(&code)?;
            hub.send_to(player_id, ServerMessage::RoomJoined { room_code: code });
            hub.send_to(player_id, ServerMessage::PlayersUpdate { players });
            return Ok(());
        }

        leave_current(&mut registry, &hub, player_id, state);
        enter(&mut registry, &hub, player_id, state, code, name, color)
    }

    pub(crate) async fn send_to(&self, player_id: &PlayerId, msg: ServerMessage) -> bool {
        self.hub.lock().await.send_to(player_id, msg)
    }

    /// Leaves the current room (if any) and drops the connection's channel.
    pub(crate) async fn release(&self, player_id: &PlayerId, state: &mut SessionState) {
        let mut registry = self.registry.lock().await;
        let mut hub = self.hub.lock().await;

        leave_current(&mut registry, &hub, player_id, state);
        hub.unregister(player_id);
        *state = SessionState::Closed;
        tracing::debug!(%player_id, connections = hub.len(), "session closed");
    }
}

/// Adds the player to `code`, acknowledges, and broadcasts the roster.
fn enter(
    registry: &mut RoomRegistry,
    hub: &ConnectionHub,
    player_id: &PlayerId,
    state: &mut SessionState,
    code: RoomCode,
    name: String,
    color: String,
) -> Result<(), SessionError> {
    registry.add_member(&code, Member::new(player_id.clone(), name, color))?;
    let players = registry.list_members(&code)?;

    hub.send_to(player_id, ServerMessage::RoomJoined { room_code: code.clone() });
    let update = ServerMessage::PlayersUpdate {
        players: players.clone(),
    };
    hub.broadcast(&players, &update);

    *state = SessionState::InRoom(code);
    Ok(())
}

/// Takes the player out of their current room and tells whoever is left.
fn leave_current(
    registry: &mut RoomRegistry,
    hub: &ConnectionHub,
    player_id: &PlayerId,
    state: &mut SessionState,
) {
    let SessionState::InRoom(code) = std::mem::replace(state, SessionState::Unjoined) else {
        return;
    };

    match registry.remove_member(&code, player_id) {
        Departure::Remaining(players) => {
            let update = ServerMessage::PlayersUpdate {
                players: players.clone(),
            };
            hub.broadcast(&players, &update);
        }
        Departure::Closed | Departure::Absent => {}
    }
}

/// Generates an 8-character lowercase hex identity (32 random bits).
fn generate_player_id() -> PlayerId {
    let bytes: [u8; 4] = rand::rng().random();
    PlayerId::new(bytes.iter().map(|b| format!("{b:02x}")).collect::<String>())
}
