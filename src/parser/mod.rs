//! HTTP parser module.
//!
//! Turns the raw bytes of one request head into an [`HttpRequest`]. Only the
//! shape of the request line is enforced here; method and version policy
//! belongs to the connection state machine.

mod request;
mod method;
mod version;
mod error;

// Re-export public items
pub use request::HttpRequest;
pub use method::Method;
pub use version::HttpVersion;
pub use error::Error;

pub use request::{find_head_end, parse_request, skip_empty_lines};
