//! ETag computation and conditional GET.

use sha2::{Digest, Sha256};

use crate::parser::{HttpRequest, HttpVersion};
use crate::server::fs::ResolvedFile;
use crate::server::response::{HttpResponse, StatusCode};

/// Hex-encoded SHA-256 digest of `content`, without quotes.
pub fn compute_etag(content: &[u8]) -> String {
    format!("{:x}", Sha256::digest(content))
}

/// Build the response for a resolved file.
///
/// The digest is recomputed from the bytes just read, so the validator
/// always reflects what is on disk now.
pub fn evaluate(request: &HttpRequest, version: HttpVersion, file: ResolvedFile) -> HttpResponse {
    let etag = format!("\"{}\"", compute_etag(&file.content));

    if request.get_header("If-None-Match") == Some(etag.as_str()) {
        return HttpResponse::new(StatusCode::NotModified)
            .with_version(version)
            .with_header("Etag", etag);
    }

    HttpResponse::new(StatusCode::Ok)
        .with_version(version)
        .with_content_type(file.content_type)
        .with_header("Etag", etag)
        .with_body_bytes(file.content)
}
