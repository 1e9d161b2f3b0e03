//! Client struct definition
//!
//! Represents one named participant and the handle used to write to it.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::error::SendError;
use crate::types::SessionId;

/// Registered client information
///
/// The socket itself stays with the session's writer task; `sender` only
/// queues text for it. Cloning a `Client` clones the handle, not the connection.
#[derive(Debug, Clone)]
pub struct Client {
    /// Session that owns this name
    pub id: SessionId,
    /// Display name, already stripped of line endings
    pub name: String,
    /// Relay → Client text channel
    pub sender: mpsc::Sender<String>,
}

impl Client {
    /// Create a new client with the given session, name and sender channel
    pub fn new(id: SessionId, name: impl Into<String>, sender: mpsc::Sender<String>) -> Self {
        Self {
            id,
            name: name.into(),
            sender,
        }
    }

    /// Queue text for this client without waiting
    ///
    /// Fails if the queue is full or the writer task has stopped (socket closed or failed).
    pub fn try_send(&self, payload: impl Into<String>) -> Result<(), SendError> {
        self.sender.try_send(payload.into()).map_err(|e| match e {
            TrySendError::Full(_) => SendError::QueueFull,
            TrySendError::Closed(_) => SendError::ChannelClosed,
        })
    }
}
