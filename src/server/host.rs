//! Request target and virtual host resolution.

use log::debug;

use crate::parser::HttpRequest;
use crate::server::error::Error;

/// Split a request target into its authority, if it names one, and its path.
///
/// Origin-form targets (`/a/b`) have no authority and lose their leading
/// slash. Absolute-form targets (`http://host:port/a/b`) yield `host`
/// without the port. Anything else has no authority and is used as a path.
pub fn split_target(target: &str) -> (Option<&str>, &str) {
    if let Some(path) = target.strip_prefix('/') {
        return (None, path);
    }

    match target.split_once("://") {
        Some((_scheme, rest)) => {
            let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
            let (authority, path) = rest.split_at(end);
            (Some(strip_port(authority)), path.strip_prefix('/').unwrap_or(path))
        }
        None => (None, target),
    }
}

/// Remove a `:port` suffix from an authority, leaving bracketed IPv6 hosts intact.
fn strip_port(authority: &str) -> &str {
    match authority.rfind(':') {
        Some(idx) if !authority[idx..].contains(']') => &authority[..idx],
        _ => authority,
    }
}

/// Drop the query string and fragment from a path.
fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

/// Resolve the effective host of a request and return the raw path it asks for.
///
/// The authority of an absolute-form target wins over the `Host` header.
/// When a host is named and it is not `hostname`, the request is answered as
/// if the resource did not exist.
pub fn resolve_host<'a>(request: &'a HttpRequest, hostname: &str) -> Result<&'a str, Error> {
    let (authority, path) = split_target(&request.target);
    let host = authority.or_else(|| request.get_header("Host").map(strip_port));

    match host {
        Some(host) if host != hostname => {
            debug!("Request for host {host:?} does not match {hostname:?}");
            Err(Error::NotFound(request.target.clone()))
        }
        _ => Ok(strip_query(path)),
    }
}
