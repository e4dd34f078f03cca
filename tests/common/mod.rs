//! Shared utilities for integration testing.
#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use shoal::config::ClientConfig;
use shoal::{RequestEvent, RequestObserver};

/// Opt-in log output for debugging a failing test: RUST_LOG=shoal=debug.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        409 => "Conflict",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "OK",
    }
}

async fn respond(
    socket: &mut TcpStream,
    status: u16,
    body: &str,
    extra_headers: &[(String, String)],
) {
    // Drain the request head before answering.
    let mut buf = [0u8; 8192];
    let _ = socket.read(&mut buf).await;

    let mut response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n",
        status,
        reason(status),
        body.len()
    );
    for (name, value) in extra_headers {
        response.push_str(&format!("{name}: {value}\r\n"));
    }
    response.push_str("\r\n");
    response.push_str(body);

    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

/// Start a mock node that always answers 200 with a fixed body.
/// Returns the bound address.
pub async fn start_mock_node(body: &'static str) -> SocketAddr {
    start_programmable_node(move || async move { (200, body.to_string()) }).await
}

/// Start a programmable mock node; the closure decides status and body
/// per request. Returns the bound address.
pub async fn start_programmable_node<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let (status, body) = f().await;
                        respond(&mut socket, status, &body, &[]).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a mock node that attaches extra response headers.
pub async fn start_node_with_headers(
    status: u16,
    body: &'static str,
    headers: Vec<(String, String)>,
) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let headers = Arc::new(headers);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let headers = headers.clone();
                    tokio::spawn(async move {
                        respond(&mut socket, status, body, &headers).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a mock node that records the raw text of every request head it
/// receives and answers 200.
pub async fn start_recording_node(requests: Arc<Mutex<Vec<String>>>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let requests = requests.clone();
                    tokio::spawn(async move {
                        let mut buf = [0u8; 8192];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        requests
                            .lock()
                            .unwrap()
                            .push(String::from_utf8_lossy(&buf[..n]).into_owned());
                        let body = "{}";
                        let response = format!(
                            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a mock node whose health is switchable at runtime: while the
/// flag is false, accepted connections are dropped without a response.
pub async fn start_flaky_node(healthy: Arc<AtomicBool>, body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let healthy = healthy.clone();
                    tokio::spawn(async move {
                        if healthy.load(Ordering::SeqCst) {
                            respond(&mut socket, 200, body, &[]).await;
                        }
                        // otherwise drop the socket: the client sees a
                        // reset mid-exchange
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Reserve an address nothing listens on (connection refused).
pub async fn refused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// A config pointed at the given nodes with background tasks disabled
/// and fast retries, so tests stay deterministic unless they opt in.
pub fn base_config(addrs: &[SocketAddr]) -> ClientConfig {
    let mut config = ClientConfig::default();
    config.nodes = addrs.iter().map(|a| format!("http://{a}")).collect();
    config.sniff.enabled = false;
    config.health_check.enabled = false;
    config.retries.base_delay_ms = 10;
    config.retries.max_delay_ms = 50;
    config
}

/// Observer counting dispatch attempts and collecting deprecation
/// warnings.
#[derive(Default)]
pub struct CountingObserver {
    pub attempts: AtomicU32,
    pub warnings: Mutex<Vec<String>>,
}

impl RequestObserver for CountingObserver {
    fn on_request(&self, _event: &RequestEvent<'_>) {
        self.attempts.fetch_add(1, Ordering::SeqCst);
    }

    fn on_deprecation(&self, warning: &str) {
        self.warnings.lock().unwrap().push(warning.to_string());
    }
}
