//! RelayServer actor implementation
//!
//! The central actor that owns the client registry. Sessions never touch the
//! registry; they send `Event`s over one unbounded channel and the actor applies
//! them one at a time, in the order the channel delivers them.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::client::Client;
use crate::message;
use crate::registry::Registry;
use crate::types::SessionId;

/// Events sent from session handlers to the RelayServer actor
#[derive(Debug)]
pub enum Event {
    /// Best-effort name pre-check; the answer is advisory only
    CheckName {
        name: String,
        reply: oneshot::Sender<bool>,
    },
    /// A named client wants to join
    Joined {
        client: Client,
        announce: String,
        /// Receives true if the client was registered, false if the name was taken
        ack: oneshot::Sender<bool>,
    },
    /// A session's read loop ended
    Left {
        id: SessionId,
        name: String,
    },
    /// A chat chunk from a joined client
    MessageSent {
        sender: String,
        text: String,
    },
}

/// The state actor
///
/// Sole owner of the `Registry`. No locks: every mutation and every broadcast
/// happens on the task that calls `run`.
pub struct RelayServer {
    /// Joined clients: name -> Client
    registry: Registry,
    /// Broadcast a leave notice when a client disconnects
    announce_leave: bool,
    /// Event receiver channel
    receiver: mpsc::UnboundedReceiver<Event>,
}

impl RelayServer {
    /// Create a new RelayServer with the given event receiver
    pub fn new(receiver: mpsc::UnboundedReceiver<Event>) -> Self {
        Self {
            registry: Registry::new(),
            announce_leave: false,
            receiver,
        }
    }

    /// Enable or disable the leave announcement
    pub fn with_leave_announcements(mut self, announce_leave: bool) -> Self {
        self.announce_leave = announce_leave;
        self
    }

    /// Read-only view of the registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Run the event loop
    ///
    /// Processes events until every sender is dropped, then returns the actor
    /// so the final state can be inspected.
    pub async fn run(mut self) -> Self {
        info!("RelayServer started");

        while let Some(event) = self.receiver.recv().await {
            self.process_event(event).await;
        }

        info!("RelayServer shutting down");
        self
    }

    /// Apply a single event
    pub async fn process_event(&mut self, event: Event) {
        match event {
            Event::CheckName { name, reply } => {
                let _ = reply.send(self.registry.contains(&name));
            }
            Event::Joined {
                client,
                announce,
                ack,
            } => {
                self.handle_joined(client, announce, ack);
            }
            Event::Left { id, name } => {
                self.handle_left(id, name);
            }
            Event::MessageSent { sender, text } => {
                let payload = message::chat_payload(&sender, &text);
                self.broadcast(&payload, Some(&sender));
            }
        }
    }

    /// Handle a join request
    fn handle_joined(&mut self, client: Client, announce: String, ack: oneshot::Sender<bool>) {
        let name = client.name.clone();
        let id = client.id;

        if !self.registry.try_insert(client) {
            // Lost the race against another session between pre-check and join
            info!("Rejected join of '{}' from session {}: name taken", name, id);
            let _ = ack.send(false);
            return;
        }

        info!("Client '{}' joined (session {})", name, id);
        let _ = ack.send(true);
        debug!("Total clients: {}", self.registry.len());

        self.broadcast(&announce, Some(&name));
    }

    /// Handle a disconnect
    fn handle_left(&mut self, id: SessionId, name: String) {
        if self.registry.remove(id, &name).is_none() {
            debug!("Ignoring leave of '{}' from session {}: not registered", name, id);
            return;
        }

        info!("Client '{}' left (session {})", name, id);
        debug!("Total clients: {}", self.registry.len());

        if self.announce_leave {
            let payload = message::leave_announcement(&name);
            self.broadcast(&payload, Some(&name));
        }
    }

    /// Write `payload` to every registered client except `exclude`
    ///
    /// Never waits on a recipient. A full queue or a stopped writer is logged and
    /// skipped; it never removes the client, only that session's own `Left` does.
    pub fn broadcast(&self, payload: &str, exclude: Option<&str>) {
        for client in self.registry.recipients(exclude) {
            if let Err(e) = client.try_send(payload) {
                warn!("Could not send message to '{}': {}", client.name, e);
            }
        }
    }
}
