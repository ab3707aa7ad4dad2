//! Identity → outbound channel lookup.

use std::collections::HashMap;

use parlor_protocol::{PlayerId, PlayerInfo, ServerMessage};
use tokio::sync::mpsc;

/// Channel sender for delivering messages to one connection.
///
/// The receiving end is drained by that connection's writer task.
pub type PlayerSender = mpsc::UnboundedSender<ServerMessage>;

/// Where to send messages for each connected player.
///
/// Kept apart from room rosters: the registry says who is in a room,
/// the hub says how to reach them.
#[derive(Debug, Default)]
pub struct ConnectionHub {
    senders: HashMap<PlayerId, PlayerSender>,
}

impl ConnectionHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associates a channel with a player, replacing any previous one.
    pub fn register(&mut self, player_id: PlayerId, sender: PlayerSender) {
        self.senders.insert(player_id, sender);
    }

    /// Forgets a player's channel. Dropping the sender lets the writer
    /// task drain what's queued and stop.
    pub fn unregister(&mut self, player_id: &PlayerId) -> Option<PlayerSender> {
        self.senders.remove(player_id)
    }

    /// `true` if the player has a registered channel.
    pub fn is_registered(&self, player_id: &PlayerId) -> bool {
        self.senders.contains_key(player_id)
    }

    /// Number of registered connections.
    pub fn len(&self) -> usize {
        self.senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }

    /// Queues a message for one player.
    ///
    /// Returns `false` if the player is unknown or their receiver is gone.
    pub fn send_to(&self, player_id: &PlayerId, msg: ServerMessage) -> bool {
        match self.senders.get(player_id) {
            Some(sender) => sender.send(msg).is_ok(),
            None => {
                tracing::debug!(%player_id, "no channel for player, dropping message");
                false
            }
        }
    }

    /// Queues the same message for every listed player, in list order.
    ///
    /// Returns how many deliveries were queued.
    pub fn broadcast(&self, recipients: &[PlayerInfo], msg: &ServerMessage) -> usize {
        let mut delivered = 0;
        for player in recipients {
            if self.send_to(&player.id, msg.clone()) {
                delivered += 1;
            }
        }
        delivered
    }
}
