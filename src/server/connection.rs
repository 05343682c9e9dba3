//! Per-connection protocol engine.
//!
//! A [`Connection`] owns one accepted transport and serves requests on it
//! one at a time until either side decides the connection is over.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::parser::{find_head_end, parse_request, skip_empty_lines, HttpRequest, HttpVersion, Method};
use crate::server::conditional::evaluate;
use crate::server::config::ServerConfig;
use crate::server::error::Error;
use crate::server::fs::{resolve_file, DiskStore, FileStore};
use crate::server::host::resolve_host;
use crate::server::response::HttpResponse;

/// Where a connection is in its request/response cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Waiting for the next request.
    AwaitingRequest,
    /// A request is being parsed and answered.
    Processing,
    /// The transport has been shut down.
    Closed,
}

/// Whether the client asked for the connection to stay open.
///
/// HTTP/1.1 is persistent unless told `Connection: close`; HTTP/1.0 only
/// with `Connection: Keep-Alive`. Both values are matched exactly.
pub fn wants_keep_alive(request: &HttpRequest) -> bool {
    let connection = request.get_header("Connection");
    match request.version {
        HttpVersion::Http11 => connection != Some("close"),
        HttpVersion::Http10 => connection == Some("Keep-Alive"),
        HttpVersion::Other(_) => false,
    }
}

/// The protocol engine for a single connection.
pub struct Connection<S, F = DiskStore> {
    stream: S,
    store: F,
    root: PathBuf,
    hostname: String,
    keep_alive: bool,
    state: ConnectionState,
    buffer: Vec<u8>,
    read_buffer_size: usize,
    max_request_size: usize,
    read_timeout: Option<Duration>,
    clock: fn() -> DateTime<Utc>,
}

impl<S> Connection<S, DiskStore>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Create a connection serving files from disk as described by `config`.
    pub fn new(stream: S, config: &ServerConfig) -> Self {
        Self {
            stream,
            store: DiskStore,
            root: config.root.clone(),
            hostname: config.hostname.clone(),
            keep_alive: false,
            state: ConnectionState::AwaitingRequest,
            buffer: Vec::new(),
            read_buffer_size: config.read_buffer_size,
            max_request_size: config.max_request_size,
            read_timeout: config.read_timeout,
            clock: Utc::now,
        }
    }
}

impl<S, F> Connection<S, F>
where
    S: AsyncRead + AsyncWrite + Unpin,
    F: FileStore,
{
    /// Serve files from `store` instead.
    pub fn with_store<G: FileStore>(self, store: G) -> Connection<S, G> {
        Connection {
            stream: self.stream,
            store,
            root: self.root,
            hostname: self.hostname,
            keep_alive: self.keep_alive,
            state: self.state,
            buffer: self.buffer,
            read_buffer_size: self.read_buffer_size,
            max_request_size: self.max_request_size,
            read_timeout: self.read_timeout,
            clock: self.clock,
        }
    }

    /// Use `clock` for the `Date` header.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn keep_alive(&self) -> bool {
        self.keep_alive
    }

    pub fn stream(&self) -> &S {
        &self.stream
    }

    /// Read requests from the transport and answer them until the connection closes.
    ///
    /// Returns `Ok` when the peer hangs up or the connection is closed after a
    /// non-persistent exchange; transport failures are returned as errors.
    pub async fn run(&mut self) -> Result<(), Error> {
        let mut chunk = vec![0; self.read_buffer_size];

        while self.state != ConnectionState::Closed {
            let skipped = skip_empty_lines(&self.buffer);
            self.buffer.drain(..skipped);

            let end = find_head_end(&self.buffer);
            if end.unwrap_or(self.buffer.len()) > self.max_request_size {
                warn!("Request head exceeds {} bytes, closing connection", self.max_request_size);
                self.buffer.clear();
                self.keep_alive = false;
                let error = Error::HeadTooLarge(self.max_request_size);
                self.send(HttpResponse::from_error(&error, HttpVersion::Http11)).await?;
                break;
            }

            if let Some(end) = end {
                let head: Vec<u8> = self.buffer.drain(..end).collect();
                self.handle_chunk(&head).await?;
                continue;
            }

            let read = self.stream.read(&mut chunk);
            let n = match self.read_timeout {
                Some(limit) => match tokio::time::timeout(limit, read).await {
                    Ok(result) => result?,
                    Err(_) => {
                        debug!("Connection idle for {limit:?}, closing");
                        self.close().await?;
                        break;
                    }
                },
                None => read.await?,
            };

            if n == 0 {
                if !self.buffer.is_empty() {
                    debug!("Peer closed with {} bytes of an incomplete request", self.buffer.len());
                }
                self.state = ConnectionState::Closed;
                break;
            }

            self.buffer.extend_from_slice(&chunk[..n]);
        }

        Ok(())
    }

    /// Answer one complete request and write the response to the transport.
    ///
    /// The transport is shut down afterwards unless the exchange negotiated a
    /// persistent connection.
    pub async fn handle_chunk(&mut self, data: &[u8]) -> Result<ConnectionState, Error> {
        self.state = ConnectionState::Processing;
        self.keep_alive = false;

        let request = match parse_request(data) {
            Ok(request) => request,
            Err(e) => {
                warn!("Error parsing request: {e}");
                let response = HttpResponse::from_error(&Error::from(e), HttpVersion::Http11);
                return self.send(response).await;
            }
        };

        let version = if request.version.is_supported() {
            request.version.clone()
        } else {
            HttpVersion::Http11
        };

        let response = match self.handle_request(&request) {
            Ok(response) => response,
            Err(e) => {
                debug!("Request {} {} failed: {e}", request.method, request.target);
                HttpResponse::from_error(&e, version)
            }
        };

        info!(
            "{} {} {} -> {}",
            request.method,
            request.target,
            request.version,
            response.status.as_u16()
        );
        self.send(response).await
    }

    fn handle_request(&mut self, request: &HttpRequest) -> Result<HttpResponse, Error> {
        if request.method != Method::GET {
            return Err(Error::MethodNotImplemented(request.method.to_string()));
        }

        if !request.version.is_supported() {
            return Err(Error::HttpVersionNotSupported(request.version.to_string()));
        }

        // Settled before anything else can fail, so error responses honour it too.
        self.keep_alive = wants_keep_alive(request);

        let path = resolve_host(request, &self.hostname)?;
        let file = resolve_file(&self.store, &self.root, path)?;
        debug!("Serving {}", file.path.display());

        Ok(evaluate(request, request.version.clone(), file))
    }

    async fn send(&mut self, mut response: HttpResponse) -> Result<ConnectionState, Error> {
        let bytes = response.to_bytes_at((self.clock)());
        self.stream.write_all(&bytes).await?;
        self.stream.flush().await?;

        if self.keep_alive {
            self.state = ConnectionState::AwaitingRequest;
        } else {
            self.close().await?;
        }
        Ok(self.state)
    }

    async fn close(&mut self) -> Result<(), Error> {
        self.state = ConnectionState::Closed;
        self.stream.shutdown().await?;
        Ok(())
    }
}
