//! HTTP response types and utilities.

use chrono::{DateTime, Utc};

use crate::parser::HttpVersion;
use crate::server::error::Error;

/// Format of the `Date` header.
pub const DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S +0000";

/// HTTP status codes with their standard reason phrases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok = 200,
    NotModified = 304,
    BadRequest = 400,
    NotFound = 404,
    InternalServerError = 500,
    NotImplemented = 501,
    ServiceUnavailable = 503,
    HttpVersionNotSupported = 505,
}

impl StatusCode {
    /// Get the numeric code.
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Get the reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::NotModified => "Not Modified",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::NotImplemented => "Not Implemented",
            StatusCode::ServiceUnavailable => "Service Unavailable",
            StatusCode::HttpVersionNotSupported => "HTTP Version Not Supported",
        }
    }
}

/// Represents an HTTP response.
///
/// Headers keep the order they were first set in; setting a header again
/// replaces its value in place.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// The HTTP version written on the status line
    pub version: HttpVersion,
    /// The HTTP status code
    pub status: StatusCode,
    /// The HTTP headers
    pub headers: Vec<(String, String)>,
    /// The response body, if any
    pub body: Option<Vec<u8>>,
}

impl HttpResponse {
    /// Create a new HTTP/1.1 response with the given status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            version: HttpVersion::Http11,
            status,
            headers: Vec::new(),
            body: None,
        }
    }

    /// Build the plain-text response for a request-scoped error.
    ///
    /// Transport errors have no status; they are rendered as 500 should
    /// anyone ask, though the connection never sends them.
    pub fn from_error(error: &Error, version: HttpVersion) -> Self {
        let status = error.status().unwrap_or(StatusCode::InternalServerError);
        Self::new(status)
            .with_version(version)
            .with_content_type("text/plain")
            .with_body_string(error.to_string())
    }

    /// Set the version for the status line.
    pub fn with_version(mut self, version: HttpVersion) -> Self {
        self.version = version;
        self
    }

    /// Set the response body with a string.
    pub fn with_body_string(self, body: impl Into<String>) -> Self {
        self.with_body_bytes(body.into().into_bytes())
    }

    /// Set the response body with bytes.
    pub fn with_body_bytes(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Add or replace a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    /// Set the content type.
    pub fn with_content_type(self, content_type: impl Into<String>) -> Self {
        self.with_header("Content-Type", content_type)
    }

    /// Add or replace a header in place.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.headers.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.headers.push((name, value)),
        }
    }

    /// Get a header value.
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Convert the response to bytes, stamping it with the current time.
    pub fn to_bytes(&mut self) -> Vec<u8> {
        self.to_bytes_at(Utc::now())
    }

    /// Convert the response to bytes, stamping it with `now`.
    ///
    /// Inserts `Content-Length` when there is a body and none was set, and
    /// always overwrites `Date`.
    pub fn to_bytes_at(&mut self, now: DateTime<Utc>) -> Vec<u8> {
        if let Some(body) = &self.body {
            if self.get_header("Content-Length").is_none() {
                let content_length = body.len().to_string();
                self.set_header("Content-Length", content_length);
            }
        }
        self.set_header("Date", now.format(DATE_FORMAT).to_string());

        let mut bytes = Vec::new();

        // Add the status line
        let status_line = format!("{} {} {}\r\n", self.version, self.status.as_u16(), self.status.reason_phrase());
        bytes.extend_from_slice(status_line.as_bytes());

        // Add the headers
        for (name, value) in &self.headers {
            let header_line = format!("{name}: {value}\r\n");
            bytes.extend_from_slice(header_line.as_bytes());
        }

        // Add the empty line that separates headers from body
        bytes.extend_from_slice(b"\r\n");

        // Add the body
        if let Some(body) = &self.body {
            bytes.extend_from_slice(body);
        }

        bytes
    }
}
