//! Minimal HTTP/1.1 server for fetch/batch integration tests.
//!
//! Serves a single static body to every GET. The status line and a
//! staggered per-request delay are configurable to simulate failing
//! servers and skewed completion order across concurrent fetches.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct StubServerOptions {
    /// Status line sent for every request, e.g. "200 OK".
    pub status: &'static str,
    /// Request k (in arrival order) sleeps `k * stagger` before the
    /// response is written, so sibling fetches finish out of order.
    pub stagger: Duration,
}

impl Default for StubServerOptions {
    fn default() -> Self {
        Self {
            status: "200 OK",
            stagger: Duration::ZERO,
        }
    }
}

/// Starts a server in a background thread serving `body`. Returns the
/// base URL (e.g. "http://127.0.0.1:12345/"). The server runs until the
/// process exits.
pub fn start(body: Vec<u8>) -> String {
    start_with_options(body, StubServerOptions::default())
}

/// Like `start` but with a custom status line and response stagger.
pub fn start_with_options(body: Vec<u8>, opts: StubServerOptions) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    let arrivals = Arc::new(AtomicUsize::new(0));
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let k = arrivals.fetch_add(1, Ordering::SeqCst);
            thread::spawn(move || handle(stream, &body, opts, k));
        }
    });
    format!("http://127.0.0.1:{}/", port)
}

fn handle(mut stream: TcpStream, body: &[u8], opts: StubServerOptions, k: usize) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(_) => {}
    }
    if !opts.stagger.is_zero() {
        thread::sleep(opts.stagger * k as u32);
    }
    // Connection: close keeps one connection per request so the stagger
    // applies per fetch task even with a pooled client.
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        opts.status,
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(body);
}
