//! Error types for the HTTP server.

use thiserror::Error;

use crate::parser::Error as ParserError;
use crate::server::response::StatusCode;

/// Errors that can occur while serving a connection.
///
/// Every variant except [`Error::IoError`] is scoped to a single request and
/// is turned into an error response by the connection. I/O errors end the
/// connection they happened on.
#[derive(Debug, Error)]
pub enum Error {
    /// Error parsing an HTTP request.
    #[error("{0}")]
    ParseError(#[from] ParserError),

    /// The request method is anything but GET.
    #[error("Method {0} is not implemented, only GET is supported")]
    MethodNotImplemented(String),

    /// The request line carries a version other than HTTP/1.0 or HTTP/1.1.
    #[error("HTTP version {0} is not supported, use HTTP/1.0 or HTTP/1.1")]
    HttpVersionNotSupported(String),

    /// The request head grew past the configured limit without ending.
    #[error("Request head exceeds {0} bytes")]
    HeadTooLarge(usize),

    /// Requested resource not found, or the request was addressed to another host.
    #[error("Not found: {0}")]
    NotFound(String),

    /// I/O error on the transport.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl Error {
    /// The status code of the response this error is rendered as.
    ///
    /// Returns `None` for transport errors, which are never answered.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::ParseError(ParserError::UnsupportedVersion) => Some(StatusCode::HttpVersionNotSupported),
            Error::ParseError(_) => Some(StatusCode::BadRequest),
            Error::MethodNotImplemented(_) => Some(StatusCode::NotImplemented),
            Error::HttpVersionNotSupported(_) => Some(StatusCode::HttpVersionNotSupported),
            Error::HeadTooLarge(_) => Some(StatusCode::BadRequest),
            Error::NotFound(_) => Some(StatusCode::NotFound),
            Error::IoError(_) => None,
        }
    }
}
