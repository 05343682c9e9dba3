//! Error types for the HTTP parser.

use thiserror::Error;

/// Errors that can occur during HTTP request parsing.
///
/// None of these carry a request: a parse failure always ends the exchange
/// with an error response and the connection is closed afterwards.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The request line does not have the `method target version` shape.
    #[error("Malformed request line: {0}")]
    MalformedRequestLine(String),

    /// A two-token request line, i.e. an HTTP/0.9 simple request.
    #[error("HTTP/0.9 requests are not supported, use HTTP/1.0 or HTTP/1.1")]
    UnsupportedVersion,

    /// The request head is not valid UTF-8.
    #[error("Malformed request line: request head is not valid UTF-8")]
    InvalidEncoding,

    /// The request is empty.
    #[error("Malformed request line: empty request")]
    EmptyRequest,
}
