//! HTTP protocol versions.

use std::fmt;

/// HTTP protocol versions as they appear on the request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpVersion {
    Http10,
    Http11,
    /// Any other version token, kept verbatim.
    Other(String),
}

impl HttpVersion {
    /// Whether the server speaks this version.
    pub fn is_supported(&self) -> bool {
        matches!(self, HttpVersion::Http10 | HttpVersion::Http11)
    }
}

impl From<&str> for HttpVersion {
    fn from(s: &str) -> Self {
        match s {
            "HTTP/1.0" => HttpVersion::Http10,
            "HTTP/1.1" => HttpVersion::Http11,
            other => HttpVersion::Other(other.to_string()),
        }
    }
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpVersion::Http10 => write!(f, "HTTP/1.0"),
            HttpVersion::Http11 => write!(f, "HTTP/1.1"),
            HttpVersion::Other(token) => write!(f, "{token}"),
        }
    }
}
