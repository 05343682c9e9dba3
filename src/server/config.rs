//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The address to bind to.
    pub addr: SocketAddr,
    /// The directory files are served from.
    pub root: PathBuf,
    /// The virtual hostname requests must be addressed to, if they name one.
    pub hostname: String,
    /// The maximum number of concurrent connections.
    pub max_connections: usize,
    /// The read buffer size.
    pub read_buffer_size: usize,
    /// The largest request head accepted before answering 400.
    pub max_request_size: usize,
    /// How long a connection may sit idle waiting for a request.
    pub read_timeout: Option<Duration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            root: PathBuf::from("."),
            hostname: "localhost".to_string(),
            max_connections: 1024,
            read_buffer_size: 8192,
            max_request_size: 8192,
            read_timeout: None,
        }
    }
}
