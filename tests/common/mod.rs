//! Shared utilities for router and end-to-end tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request};
use slimjpg_web::config::AppConfig;
use slimjpg_web::optimizer::{savings, OptimizerError};
use slimjpg_web::{HttpServer, ImageOptimizer, OptimizationResult, OptimizeOptions, Shutdown};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const BOUNDARY: &str = "----slimjpg-test-boundary";

/// What the fake optimizer answers with.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Return `len` bytes with the given quality.
    Resize { len: usize, quality: u8 },
    /// Return the source untouched.
    Same,
    /// Report an internal error.
    Fail(String),
}

/// Optimizer double that records what it was asked to do.
pub struct FakeOptimizer {
    reply: Reply,
    calls: AtomicUsize,
    sources: Mutex<Vec<Vec<u8>>>,
    options: Mutex<Vec<OptimizeOptions>>,
}

impl FakeOptimizer {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            sources: Mutex::new(Vec::new()),
            options: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn sources(&self) -> Vec<Vec<u8>> {
        self.sources.lock().unwrap().clone()
    }

    pub fn options(&self) -> Vec<OptimizeOptions> {
        self.options.lock().unwrap().clone()
    }
}

impl ImageOptimizer for FakeOptimizer {
    fn optimize(&self, source: &[u8], options: &OptimizeOptions) -> OptimizationResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.sources.lock().unwrap().push(source.to_vec());
        self.options.lock().unwrap().push(options.clone());

        let elapsed = Duration::from_millis(1234);
        match &self.reply {
            Reply::Resize { len, quality } => {
                let picture: Vec<u8> = (0..*len).map(|i| (i % 253) as u8).collect();
                let (saved_bytes, saved_ratio) = savings(source.len(), picture.len());
                OptimizationResult {
                    picture,
                    elapsed,
                    saved_bytes,
                    saved_ratio,
                    jpeg_quality_used: *quality,
                    internal_error: None,
                }
            }
            Reply::Same => OptimizationResult::success(source, source.to_vec(), 100, elapsed),
            Reply::Fail(message) => {
                OptimizationResult::failure(source, OptimizerError::Decode(message.clone()), elapsed)
            }
        }
    }
}

/// One multipart part: name, optional file name, optional content type, data.
pub struct TestPart<'a> {
    pub name: &'a str,
    pub file_name: Option<&'a str>,
    pub content_type: Option<&'a str>,
    pub data: &'a [u8],
}

impl<'a> TestPart<'a> {
    pub fn file(name: &'a str, file_name: &'a str, content_type: &'a str, data: &'a [u8]) -> Self {
        Self {
            name,
            file_name: Some(file_name),
            content_type: Some(content_type),
            data,
        }
    }

    pub fn field(name: &'a str, value: &'a str) -> Self {
        Self {
            name,
            file_name: None,
            content_type: None,
            data: value.as_bytes(),
        }
    }
}

/// Encode parts as a `multipart/form-data` body using [`BOUNDARY`].
pub fn multipart_body(parts: &[TestPart<'_>]) -> Vec<u8> {
    let mut out = Vec::new();
    for part in parts {
        out.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        out.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"", part.name).as_bytes(),
        );
        if let Some(file_name) = part.file_name {
            out.extend_from_slice(format!("; filename=\"{}\"", file_name).as_bytes());
        }
        out.extend_from_slice(b"\r\n");
        if let Some(content_type) = part.content_type {
            out.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
        }
        out.extend_from_slice(b"\r\n");
        out.extend_from_slice(part.data);
        out.extend_from_slice(b"\r\n");
    }
    out.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    out
}

/// `POST /optimize` request carrying the given parts.
pub fn upload_request(parts: &[TestPart<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/optimize")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

/// A running server bound to an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Trigger shutdown and wait for the server task to finish.
    pub async fn stop(self) {
        self.shutdown.trigger();
        let joined = tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server did not stop in time");
        joined.expect("server task panicked").expect("server error");
    }
}

/// Start a server with the given optimizer on `127.0.0.1:0`.
pub async fn start_server(config: AppConfig, optimizer: Arc<dyn ImageOptimizer>) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::with_optimizer(config, optimizer);
    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    TestServer {
        addr,
        shutdown,
        handle,
    }
}

/// Extract the payload of the first `src="<prefix>..."` attribute.
pub fn embedded_payload<'h>(html: &'h str, prefix: &str) -> &'h str {
    let marker = format!("src=\"{}", prefix);
    let start = html.find(&marker).expect("data uri present") + marker.len();
    let len = html[start..].find('"').expect("closing quote");
    &html[start..start + len]
}

/// Payloads of every `src="data:<type>;base64,..."` attribute, in page order.
pub fn data_payloads(html: &str) -> Vec<&str> {
    let mut payloads = Vec::new();
    let mut rest = html;
    while let Some(at) = rest.find("src=\"data:") {
        rest = &rest[at..];
        let start = rest.find(";base64,").expect("base64 data uri") + ";base64,".len();
        let len = rest[start..].find('"').expect("closing quote");
        payloads.push(&rest[start..start + len]);
        rest = &rest[start + len..];
    }
    payloads
}
