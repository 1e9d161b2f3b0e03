//! Error types for the chat relay
//!
//! Uses thiserror for ergonomic error definitions.
//! None of these ever reach a client: the only user-visible failure is the
//! name collision notice, which is plain protocol text.

use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    /// Socket read, write or accept failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The state actor is gone (internal channel broken)
    #[error("Channel send error")]
    ChannelSend,
}

/// Outbound send errors
///
/// Either way the text is dropped for that client only; it stays registered.
#[derive(Debug, Error)]
pub enum SendError {
    /// The client's outbound queue is full (peer not reading)
    #[error("Outbound queue full")]
    QueueFull,

    /// The writer task has stopped
    #[error("Channel closed")]
    ChannelClosed,
}
