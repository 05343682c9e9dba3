//! A minimal HTTP/1.0 and HTTP/1.1 static file server.
//!
//! Files under a document root are served to `GET` requests addressed to a
//! single virtual host. Responses carry a SHA-256 `Etag`, and requests whose
//! `If-None-Match` matches it get `304 Not Modified`. Connections stay open
//! between requests when the protocol version and `Connection` header ask
//! for it.
//!
//! # Examples
//!
//! ## Parsing a request
//!
//! ```
//! use statichttp_rs::{parse_request, HttpVersion, Method};
//!
//! let request = parse_request(b"GET /index.html HTTP/1.1\r\nHost: localhost\r\n\r\n").unwrap();
//! assert_eq!(request.method, Method::GET);
//! assert_eq!(request.target, "/index.html");
//! assert_eq!(request.version, HttpVersion::Http11);
//! assert_eq!(request.get_header("Host"), Some("localhost"));
//! ```
//!
//! ## Running a server
//!
//! ```no_run
//! use statichttp_rs::{HttpServer, ServerConfig};
//!
//! # async fn run() -> Result<(), statichttp_rs::ServerError> {
//! let config = ServerConfig {
//!     root: "public".into(),
//!     ..ServerConfig::default()
//! };
//! HttpServer::new(config).start().await
//! # }
//! ```

// Export the parser module
pub mod parser;

// Export the server module
pub mod server;

// Re-export commonly used items for convenience
pub use parser::{parse_request, Error as ParserError, HttpRequest, HttpVersion, Method};
pub use server::{Connection, Error as ServerError, HttpResponse, HttpServer, ServerConfig, StatusCode};
