//! Connection acceptor
//!
//! Starts the RelayServer actor and spawns one session per accepted connection.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info};

use crate::config::Config;
use crate::handler::{handle_connection, shutdown_signalled};
use crate::server::RelayServer;

/// Accept connections until shutdown is signalled
///
/// A failed accept is logged and the loop continues. After shutdown the actor
/// drains the remaining events (every session sends its `Left`) and this returns
/// once it has stopped.
pub async fn serve(listener: TcpListener, config: Config, mut shutdown: watch::Receiver<bool>) {
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let server = RelayServer::new(events_rx).with_leave_announcements(config.announce_leave);
    let actor = tokio::spawn(server.run());
    info!("RelayServer actor started");

    let config = Arc::new(config);

    loop {
        let accepted = tokio::select! {
            accepted = listener.accept() => accepted,
            _ = shutdown_signalled(&mut shutdown) => {
                info!("Shutdown requested, no longer accepting connections");
                break;
            }
        };

        match accepted {
            Ok((stream, addr)) => {
                info!("New connection from {}", addr);
                let events_tx = events_tx.clone();
                let config = Arc::clone(&config);
                let shutdown = shutdown.clone();

                // Spawn handler task for each connection
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, events_tx, config, shutdown).await {
                        error!("Connection handler error: {}", e);
                    }
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }

    drop(events_tx);
    match actor.await {
        Ok(server) => debug!("RelayServer stopped with {} clients", server.registry().len()),
        Err(e) => error!("RelayServer task failed: {}", e),
    }
}
