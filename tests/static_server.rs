//! End-to-end tests over real TCP connections.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use statichttp_rs::server::compute_etag;
use statichttp_rs::{HttpServer, ServerConfig};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};

const INDEX: &str = "<!doctype html><title>home</title>\n";

struct TestSite {
    root: PathBuf,
}

impl TestSite {
    fn new(name: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
        let root = std::env::temp_dir().join(format!("statichttp-{name}-{}-{nanos}", std::process::id()));
        std::fs::create_dir_all(root.join("empty")).unwrap();
        std::fs::create_dir_all(root.join("blog")).unwrap();
        std::fs::write(root.join("index.html"), INDEX).unwrap();
        std::fs::write(root.join("blog").join("index.html"), "blog").unwrap();
        std::fs::write(root.join("app.js"), "console.log(1);").unwrap();
        Self { root }
    }
}

impl Drop for TestSite {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

async fn start(config: ServerConfig) -> (std::net::SocketAddr, mpsc::Sender<()>, JoinHandle<()>) {
    let server = HttpServer::new(config);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
    let handle = tokio::spawn(async move {
        server.serve(listener, shutdown_rx, JoinSet::new()).await.unwrap();
    });
    (addr, shutdown_tx, handle)
}

async fn roundtrip(addr: std::net::SocketAddr, request: &str) -> String {
    let mut client = TcpStream::connect(addr).await.unwrap();
    client.write_all(request.as_bytes()).await.unwrap();
    let mut response = Vec::new();
    client.read_to_end(&mut response).await.unwrap();
    String::from_utf8(response).unwrap()
}

#[tokio::test]
async fn test_serves_files_from_disk() {
    let site = TestSite::new("files");
    let config = ServerConfig {
        root: site.root.clone(),
        ..ServerConfig::default()
    };
    let (addr, shutdown_tx, handle) = start(config).await;

    let response = roundtrip(addr, "GET / HTTP/1.0\r\n\r\n").await;
    assert!(response.starts_with("HTTP/1.0 200 OK\r\n"));
    assert!(response.contains("Content-Type: text/html\r\n"));
    assert!(response.contains(&format!("Content-Length: {}\r\n", INDEX.len())));
    assert!(response.ends_with(INDEX));

    let response = roundtrip(addr, "GET /blog HTTP/1.0\r\nHost: localhost:8080\r\n\r\n").await;
    assert!(response.ends_with("\r\n\r\nblog"));

    let response = roundtrip(addr, "GET /empty/ HTTP/1.0\r\n\r\n").await;
    assert!(response.starts_with("HTTP/1.0 404 Not Found\r\n"));

    let response = roundtrip(addr, "GET /../../etc/passwd HTTP/1.0\r\n\r\n").await;
    assert!(response.starts_with("HTTP/1.0 404 Not Found\r\n"));

    shutdown_tx.send(()).await.unwrap();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_keep_alive_then_close() {
    let site = TestSite::new("keepalive");
    let config = ServerConfig {
        root: site.root.clone(),
        ..ServerConfig::default()
    };
    let (addr, shutdown_tx, handle) = start(config).await;

    let etag = compute_etag(INDEX.as_bytes());
    let requests = format!(
        "GET / HTTP/1.1\r\nHost: localhost\r\n\r\n\
         GET /index.html HTTP/1.1\r\nHost: localhost\r\nIf-None-Match: \"{etag}\"\r\n\r\n\
         GET /app.js HTTP/1.0\r\n\r\n"
    );
    let response = roundtrip(addr, &requests).await;

    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(response.contains("HTTP/1.1 304 Not Modified\r\n"));
    assert!(response.contains("HTTP/1.0 200 OK\r\n"));
    assert_eq!(response.matches(&format!("Etag: \"{etag}\"")).count(), 2);
    // read_to_end returned, so the server closed after the HTTP/1.0 response
    assert!(response.ends_with("console.log(1);"));

    shutdown_tx.send(()).await.unwrap();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_rejects_connections_over_capacity() {
    let site = TestSite::new("capacity");
    let config = ServerConfig {
        root: site.root.clone(),
        max_connections: 1,
        ..ServerConfig::default()
    };
    let (addr, shutdown_tx, handle) = start(config).await;

    // Hold the only slot with a persistent connection
    let mut first = TcpStream::connect(addr).await.unwrap();
    first.write_all(b"GET /app.js HTTP/1.1\r\n\r\n").await.unwrap();
    let mut buf = vec![0; 4096];
    let n = first.read(&mut buf).await.unwrap();
    assert!(buf[..n].starts_with(b"HTTP/1.1 200 OK\r\n"));

    // The rejection is written without reading, so send nothing that could be left unread
    let mut second = TcpStream::connect(addr).await.unwrap();
    let mut response = Vec::new();
    second.read_to_end(&mut response).await.unwrap();
    assert!(response.starts_with(b"HTTP/1.1 503 Service Unavailable\r\n"));

    drop(first);
    shutdown_tx.send(()).await.unwrap();
    handle.await.unwrap();
}
