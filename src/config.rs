//! Relay configuration
//!
//! Only the listen address comes from the command line (clap); the remaining
//! knobs keep their defaults unless set in code.

use clap::Parser;

/// Command line configuration
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about)]
pub struct Config {
    /// IP address to bind to
    #[clap(short = 'H', long, default_value = "0.0.0.0")]
    pub host: String,
    /// TCP port to listen on
    #[clap(short, long, default_value = "8181")]
    pub port: u16,
    /// Bytes read per chunk; larger input is split across several messages
    #[clap(skip = 512usize)]
    pub read_buffer_size: usize,
    /// Queued outbound messages per client; broadcasts to a full queue are dropped
    #[clap(skip = 64usize)]
    pub outbound_capacity: usize,
    /// Tell the remaining clients when someone disconnects
    #[clap(skip)]
    pub announce_leave: bool,
}

impl Config {
    /// Address string suitable for `TcpListener::bind`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8181,
            read_buffer_size: 512,
            outbound_capacity: 64,
            announce_leave: false,
        }
    }
}
