//! A minimal fixture HTTP/1.1 server used only by integration tests.
//!
//! Adapted from the library's own (now-removed) Tokio server loop: accept a
//! connection, read one request, dispatch to a handler, write the response,
//! close. No keep-alive, no pipelining — integration tests only need one
//! request per connection.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// A request as seen by a fixture handler: just enough to write assertions
/// against (method, path, headers, body) without pulling in a full parser.
#[derive(Debug, Clone)]
pub struct FixtureRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// A canned response a fixture handler hands back to the executor under test.
#[derive(Debug, Clone)]
pub struct FixtureResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl FixtureResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    fn into_bytes(self) -> Vec<u8> {
        let reason = match self.status {
            200 => "OK",
            201 => "Created",
            204 => "No Content",
            400 => "Bad Request",
            403 => "Forbidden",
            404 => "Not Found",
            500 => "Internal Server Error",
            _ => "Unknown",
        };
        let mut out = format!("HTTP/1.1 {} {}\r\n", self.status, reason);
        for (name, value) in &self.headers {
            out.push_str(&format!("{name}: {value}\r\n"));
        }
        out.push_str(&format!("Content-Length: {}\r\n\r\n", self.body.len()));
        let mut bytes = out.into_bytes();
        bytes.extend_from_slice(&self.body);
        bytes
    }
}

fn parse_request(buf: &[u8]) -> Option<FixtureRequest> {
    let text = String::from_utf8_lossy(buf);
    let header_end = text.find("\r\n\r\n")?;
    let head = &text[..header_end];
    let body_start = header_end + 4;
    let mut lines = head.lines();
    let request_line = lines.next()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next()?.to_string();

    let mut headers = Vec::new();
    let mut content_length = 0usize;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim().to_string();
            let value = value.trim().to_string();
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.parse().unwrap_or(0);
            }
            headers.push((name, value));
        }
    }
    let body = buf
        .get(body_start..body_start + content_length)
        .unwrap_or(&[])
        .to_vec();

    Some(FixtureRequest {
        method,
        path,
        headers,
        body,
    })
}

/// A bound fixture server. Drop it (or let it go out of scope) to stop
/// accepting new connections; in-flight handlers still complete.
pub struct FixtureServer {
    pub addr: SocketAddr,
    handle: tokio::task::JoinHandle<()>,
}

impl FixtureServer {
    /// Starts a fixture server on an ephemeral local port, dispatching every
    /// accepted connection's single request to `handler`.
    pub async fn start<H, F>(handler: H) -> Self
    where
        H: Fn(FixtureRequest) -> F + Send + Sync + 'static,
        F: Future<Output = FixtureResponse> + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fixture listener");
        let addr = listener.local_addr().expect("fixture listener local_addr");
        let handler = Arc::new(handler);

        let handle = tokio::spawn(async move {
            loop {
                let (mut stream, _) = match listener.accept().await {
                    Ok(pair) => pair,
                    Err(_) => break,
                };
                let handler = Arc::clone(&handler);
                tokio::spawn(async move {
                    let mut buf = BytesMut::with_capacity(4096);
                    loop {
                        match stream.read_buf(&mut buf).await {
                            Ok(0) | Err(_) => return,
                            Ok(_) => {}
                        }
                        if let Some(request) = parse_request(&buf) {
                            let response = handler(request).await;
                            let _ = stream.write_all(&response.into_bytes()).await;
                            let _ = stream.shutdown().await;
                            return;
                        }
                    }
                });
            }
        });

        Self { addr, handle }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for FixtureServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Runs a fixture server on a dedicated background thread with its own
/// Tokio runtime, and blocks the calling thread until it's ready to accept
/// connections. Lets plain `#[test]` functions use `reqwest::blocking`
/// against the fixture without nesting runtimes.
pub struct FixtureHandle {
    pub addr: SocketAddr,
    _runtime: tokio::runtime::Runtime,
}

impl FixtureHandle {
    pub fn spawn<H, F>(handler: H) -> Self
    where
        H: Fn(FixtureRequest) -> F + Send + Sync + 'static,
        F: Future<Output = FixtureResponse> + Send + 'static,
    {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .expect("build fixture runtime");

        let server = runtime.block_on(FixtureServer::start(handler));
        let addr = server.addr;
        // Leak the server's join handle onto the runtime so it keeps
        // accepting connections for the handle's lifetime.
        std::mem::forget(server);

        Self {
            addr,
            _runtime: runtime,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}
