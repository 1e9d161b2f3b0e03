//! TCP session handler
//!
//! Handles one client connection: name negotiation, the read loop that turns
//! input chunks into events, and the writer task that owns the socket's write half.

use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::client::Client;
use crate::config::Config;
use crate::error::AppError;
use crate::message;
use crate::server::Event;
use crate::types::SessionId;

/// Handle a new TCP connection
///
/// Emits exactly one `Left` once the client has joined and its read loop ends
/// (EOF, read error or shutdown). A client that never joins emits no events
/// apart from the name pre-check.
pub async fn handle_connection(
    stream: TcpStream,
    events: mpsc::UnboundedSender<Event>,
    config: Arc<Config>,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), AppError> {
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    let session_id = SessionId::new();
    debug!("Session {} started for {}", session_id, peer_addr);

    let (mut reader, writer) = stream.into_split();

    // Channel for relay -> client text; the writer task serializes all socket writes
    let (out_tx, out_rx) = mpsc::channel::<String>(config.outbound_capacity.max(1));
    let write_task = tokio::spawn(write_loop(writer, out_rx, session_id));

    let _ = out_tx.send(message::PROMPT.to_string()).await;

    let mut buf = vec![0u8; config.read_buffer_size.max(1)];
    let n = tokio::select! {
        read = reader.read(&mut buf) => read?,
        _ = shutdown_signalled(&mut shutdown) => {
            debug!("Session {} closed by shutdown before naming", session_id);
            return Ok(());
        }
    };
    if n == 0 {
        debug!("Session {} closed before sending a name", session_id);
        return Ok(());
    }
    let name = message::trim_line_ending(&buf[..n]);

    // Advisory pre-check; the actor still decides on Joined
    let (reply, reply_rx) = oneshot::channel();
    events
        .send(Event::CheckName {
            name: name.clone(),
            reply,
        })
        .map_err(|_| AppError::ChannelSend)?;
    if reply_rx.await.map_err(|_| AppError::ChannelSend)? {
        info!("{} asked for taken name '{}'", peer_addr, name);
        reject(out_tx, write_task).await;
        return Ok(());
    }

    let (ack, ack_rx) = oneshot::channel();
    events
        .send(Event::Joined {
            client: Client::new(session_id, name.clone(), out_tx.clone()),
            announce: message::join_announcement(&name),
            ack,
        })
        .map_err(|_| AppError::ChannelSend)?;
    if !ack_rx.await.map_err(|_| AppError::ChannelSend)? {
        info!("{} lost the race for name '{}'", peer_addr, name);
        reject(out_tx, write_task).await;
        return Ok(());
    }

    info!("User {} logged in as '{}'", peer_addr, name);

    loop {
        let read = tokio::select! {
            read = reader.read(&mut buf) => read,
            _ = shutdown_signalled(&mut shutdown) => {
                debug!("Session {} closed by shutdown", session_id);
                break;
            }
        };

        match read {
            Ok(0) => {
                debug!("Session {} reached EOF", session_id);
                break;
            }
            Ok(n) => {
                let text = message::trim_line_ending(&buf[..n]);
                let sent = events.send(Event::MessageSent {
                    sender: name.clone(),
                    text,
                });
                if sent.is_err() {
                    debug!("Relay closed, ending session {}", session_id);
                    break;
                }
            }
            Err(e) => {
                debug!("Read error on session {}: {}", session_id, e);
                break;
            }
        }
    }

    let _ = events.send(Event::Left {
        id: session_id,
        name: name.clone(),
    });
    info!("User '{}' disconnected", name);

    // The writer task ends once the actor drops its copy of the sender
    Ok(())
}

/// Resolve once shutdown is requested or its sender is gone
pub(crate) async fn shutdown_signalled(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow() {
            return;
        }
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}

/// Send the collision notice, then close the connection once it is flushed
async fn reject(out_tx: mpsc::Sender<String>, write_task: JoinHandle<()>) {
    let _ = out_tx.send(message::NAME_COLLISION.to_string()).await;
    drop(out_tx);
    let _ = write_task.await;
}

/// Drain queued text into the socket until every sender is gone or a write fails
async fn write_loop(
    mut writer: OwnedWriteHalf,
    mut rx: mpsc::Receiver<String>,
    session_id: SessionId,
) {
    while let Some(text) = rx.recv().await {
        if let Err(e) = writer.write_all(text.as_bytes()).await {
            warn!("Write to session {} failed: {}", session_id, e);
            break;
        }
    }
    let _ = writer.shutdown().await;
    debug!("Write task ended for session {}", session_id);
}
