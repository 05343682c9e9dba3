//! HTTP server implementation for statichttp-rs.
//!
//! The listener in [`HttpServer`] spawns one [`Connection`] per accepted
//! socket. Each connection resolves the request target against its virtual
//! host and document root, and answers with the file or an error response.

mod response;
mod config;
mod error;
mod host;
mod fs;
mod conditional;
mod connection;
mod http_server;

// Re-export public items
pub use response::{HttpResponse, StatusCode, DATE_FORMAT};
pub use config::ServerConfig;
pub use error::Error;
pub use host::{resolve_host, split_target};
pub use fs::{resolve_file, resolve_mime, DiskStore, FileStore, ResolvedFile, DEFAULT_CONTENT_TYPE, INDEX_FILE};
pub use conditional::{compute_etag, evaluate};
pub use connection::{wants_keep_alive, Connection, ConnectionState};
pub use http_server::HttpServer;
