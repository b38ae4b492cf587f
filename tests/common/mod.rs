//! Common test utilities shared across all integration test files.
//!
//! Usage in test files:
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! Tests run against local servers only: a `mockito` server for scripted
//! responses, and raw TCP listeners where the test needs to control timing.

use serde_json::{Value, json};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tgbot_rs::Client;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Token used by every test client.
pub const TOKEN: &str = "123456:test-token";

/// Secret half of [`TOKEN`], which must never leak into errors or logs.
#[allow(dead_code)]
pub const TOKEN_SECRET: &str = "test-token";

/// Path of a Bot API method on the mock server.
#[allow(dead_code)]
pub fn method_path(method: &str) -> String {
    format!("/bot{TOKEN}/{method}")
}

/// Path of a downloadable file on the mock server.
#[allow(dead_code)]
pub fn file_path(path: &str) -> String {
    format!("/file/bot{TOKEN}/{path}")
}

/// Client pointed at a local server.
pub fn client_for(api_url: &str) -> Client {
    Client::builder(TOKEN)
        .api_url(api_url)
        .build()
        .expect("test client should build")
}

/// A successful envelope around `result`.
#[allow(dead_code)]
pub fn ok_body(result: Value) -> String {
    json!({"ok": true, "result": result}).to_string()
}

/// A failed envelope.
#[allow(dead_code)]
pub fn error_body(error_code: i64, description: &str) -> String {
    json!({"ok": false, "error_code": error_code, "description": description}).to_string()
}

/// Wraps a future with a timeout, panicking if the timeout is exceeded.
#[allow(dead_code)]
pub async fn with_timeout<F, T>(duration: Duration, future: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(duration, future)
        .await
        .unwrap_or_else(|_| panic!("Test timed out after {:?}", duration))
}

// =============================================================================
// Log capture
// =============================================================================

/// Everything logged through `tracing` on this thread while the guard lives.
///
/// Tests using it must run on the current-thread runtime, which is the
/// `#[tokio::test]` default.
#[allow(dead_code)]
pub struct CapturedLogs {
    buffer: Arc<Mutex<Vec<u8>>>,
    _guard: tracing::subscriber::DefaultGuard,
}

#[allow(dead_code)]
impl CapturedLogs {
    pub fn contents(&self) -> String {
        let buffer = self.buffer.lock().expect("log buffer poisoned");
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

#[derive(Clone)]
struct SharedWriter(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for SharedWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0
            .lock()
            .expect("log buffer poisoned")
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Installs a thread-local subscriber recording every level.
#[allow(dead_code)]
pub fn capture_logs() -> CapturedLogs {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let writer = SharedWriter(Arc::clone(&buffer));
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);

    CapturedLogs {
        buffer,
        _guard: guard,
    }
}

// =============================================================================
// Raw TCP servers
// =============================================================================

/// Starts a server that accepts connections and never answers.
///
/// Accepted sockets are kept open for the lifetime of the returned task.
#[allow(dead_code)]
pub async fn spawn_silent_server() -> (String, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind silent server");
    let addr = listener.local_addr().expect("local addr");

    let handle = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    (format!("http://{addr}"), handle)
}

/// Tracks how many requests a [`spawn_slow_server`] is handling at once.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct Concurrency {
    current: AtomicUsize,
    peak: AtomicUsize,
    served: AtomicUsize,
}

#[allow(dead_code)]
impl Concurrency {
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn served(&self) -> usize {
        self.served.load(Ordering::SeqCst)
    }

    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
        self.served.fetch_add(1, Ordering::SeqCst);
    }
}

/// Starts a server that holds every request for `delay` before answering
/// `{"ok": true, "result": true}`, recording concurrency in `stats`.
#[allow(dead_code)]
pub async fn spawn_slow_server(delay: Duration, stats: Arc<Concurrency>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind slow server");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let stats = Arc::clone(&stats);
            tokio::spawn(async move {
                serve_one(socket, delay, &stats).await;
            });
        }
    });

    format!("http://{addr}")
}

#[allow(dead_code)]
async fn serve_one(mut socket: TcpStream, delay: Duration, stats: &Concurrency) {
    if read_request(&mut socket).await.is_none() {
        return;
    }

    stats.enter();
    tokio::time::sleep(delay).await;
    stats.leave();

    let body = ok_body(json!(true));
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

/// Reads one HTTP/1.1 request with a `Content-Length` body.
#[allow(dead_code)]
async fn read_request(socket: &mut TcpStream) -> Option<Vec<u8>> {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];

    let header_end = loop {
        let read = socket.read(&mut buf).await.ok()?;
        if read == 0 {
            return None;
        }
        data.extend_from_slice(&buf[..read]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let headers = String::from_utf8_lossy(&data[..header_end]).to_ascii_lowercase();
    let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while data.len() < header_end + content_length {
        let read = socket.read(&mut buf).await.ok()?;
        if read == 0 {
            break;
        }
        data.extend_from_slice(&buf[..read]);
    }

    Some(data)
}
