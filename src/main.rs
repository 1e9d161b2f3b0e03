//! Chat Relay - Entry Point
//!
//! Parses configuration, binds the listener and runs the acceptor until Ctrl-C.

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use chat_relay::{serve, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=chat_relay=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chat_relay=info")),
        )
        .init();

    let config = Config::parse();

    let addr = config.bind_addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Listening on {} failed: {}", addr, e);
            return Err(e.into());
        }
    };
    info!("Chat relay listening on {}", addr);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl-C received");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                // Keep the sender alive; a dropped sender also stops the relay
                error!("Unable to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        }
    });

    serve(listener, config, shutdown_rx).await;

    info!("Chat relay stopped");
    Ok(())
}
