//! HTTP request parsing and representation.

use std::collections::HashMap;

use log::debug;

use crate::parser::error::Error;
use crate::parser::method::Method;
use crate::parser::version::HttpVersion;

const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";
const LINE_TERMINATOR: &[u8] = b"\r\n";

/// Represents an HTTP request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The raw request target, either origin-form (`/path`) or absolute-form (`http://host/path`)
    pub target: String,
    /// The HTTP version
    pub version: HttpVersion,
    /// The HTTP headers, keyed by their case-sensitive name
    pub headers: HashMap<String, String>,
}

impl HttpRequest {
    /// Create a new HTTP request.
    ///
    /// # Arguments
    ///
    /// * `method` - The HTTP method
    /// * `target` - The request target
    /// * `version` - The HTTP version
    /// * `headers` - The HTTP headers
    pub fn new(method: Method, target: String, version: HttpVersion, headers: HashMap<String, String>) -> Self {
        Self {
            method,
            target,
            version,
            headers,
        }
    }

    /// Get a header value by its exact name.
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Check if a header exists.
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.contains_key(name)
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}

/// Count the bytes of empty lines preceding a request line.
///
/// Clients may send a stray CRLF after a previous request (RFC 7230 §3.5);
/// such lines are not requests of their own.
pub fn skip_empty_lines(input: &[u8]) -> usize {
    let mut skipped = 0;
    while input[skipped..].starts_with(LINE_TERMINATOR) {
        skipped += LINE_TERMINATOR.len();
    }
    skipped
}

/// Find where the request head at the start of `input` ends.
///
/// Returns the number of bytes the head occupies, terminator included, or
/// `None` if more bytes are needed. A request line that is complete but
/// does not have three tokens ends the head right away, since no headers
/// can rescue it and an HTTP/0.9 request never sends a blank line.
pub fn find_head_end(input: &[u8]) -> Option<usize> {
    if let Some(pos) = find(input, HEAD_TERMINATOR) {
        let line_end = find(input, LINE_TERMINATOR).unwrap_or(pos);
        if line_end < pos && token_count(&input[..line_end]) != 3 {
            return Some(line_end + LINE_TERMINATOR.len());
        }
        return Some(pos + HEAD_TERMINATOR.len());
    }

    let line_end = find(input, LINE_TERMINATOR)?;
    if token_count(&input[..line_end]) != 3 {
        Some(line_end + LINE_TERMINATOR.len())
    } else {
        None
    }
}

fn token_count(line: &[u8]) -> usize {
    line.split(|b| b.is_ascii_whitespace())
        .filter(|token| !token.is_empty())
        .count()
}

/// Parse an HTTP request from a byte slice.
///
/// Only the head is looked at; anything after the blank line is ignored.
///
/// # Arguments
///
/// * `input` - A byte slice containing the HTTP request to parse
///
/// # Returns
///
/// The parsed HTTP request, or an error if the request line is malformed
pub fn parse_request(input: &[u8]) -> Result<HttpRequest, Error> {
    let head = match find(input, HEAD_TERMINATOR) {
        Some(pos) => &input[..pos],
        None => input,
    };

    let head = std::str::from_utf8(head).map_err(|_| Error::InvalidEncoding)?;
    if head.trim().is_empty() {
        return Err(Error::EmptyRequest);
    }

    let mut lines = head.split("\r\n");

    // Split the request line into method, target, and version
    let request_line = lines.next().unwrap_or_default();
    let parts: Vec<&str> = request_line.split_whitespace().collect();
    let (method, target, version) = match parts.as_slice() {
        [method, target, version] => (*method, *target, *version),
        [_, _] => return Err(Error::UnsupportedVersion),
        _ => return Err(Error::MalformedRequestLine(request_line.to_string())),
    };

    let mut headers = HashMap::new();
    for line in lines {
        // Empty line indicates the end of headers
        if line.is_empty() {
            break;
        }

        match line.split_once(": ") {
            Some((name, value)) => {
                headers.insert(name.to_string(), value.to_string());
            }
            None => debug!("Ignoring header line without \": \" separator: {line:?}"),
        }
    }

    Ok(HttpRequest::new(Method::from(method), target.to_string(), HttpVersion::from(version), headers))
}
