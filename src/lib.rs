//! Line-based TCP Chat Relay Library
//!
//! Clients connect over TCP, pick a display name, and every chunk of text they
//! send is relayed to all other connected clients.
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `RelayServer` is the single actor owning the name registry
//! - Each connection has a `handler` task that turns socket input into `Event`s
//! - All events travel over one unbounded channel, so the actor sees a single
//!   total order and no locks are needed
//! - Each connection's writer task owns its socket write half, serializing
//!   direct replies and broadcasts
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use tokio::sync::watch;
//! use chat_relay::{serve, Config};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::default();
//!     let listener = TcpListener::bind(config.bind_addr()).await.unwrap();
//!     let (_shutdown_tx, shutdown_rx) = watch::channel(false);
//!     serve(listener, config, shutdown_rx).await;
//! }
//! ```

pub mod acceptor;
pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod message;
pub mod registry;
pub mod server;
pub mod types;

// Re-export main types for convenience
pub use acceptor::serve;
pub use client::Client;
pub use config::Config;
pub use error::{AppError, SendError};
pub use handler::handle_connection;
pub use registry::Registry;
pub use server::{Event, RelayServer};
pub use types::SessionId;
