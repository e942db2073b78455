//! Fake catalog services shared by the integration tests

#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::LOCATION;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::runtime::Runtime;

/// Body served by the redirect target, never by the catalog itself
pub const REDIRECT_TARGET_BODY: &str = "REDIRECTED-GET-BODY";

/// What the fake catalog saw for one request
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub authorization: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Clone)]
struct CatalogState {
    status: StatusCode,
    reply: &'static str,
    location: Option<&'static str>,
    seen: Arc<Mutex<Vec<Captured>>>,
}

impl CatalogState {
    fn record(&self, method: &str, path: &str, headers: &HeaderMap, body: &[u8]) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        self.seen.lock().unwrap().push(Captured {
            method: method.to_string(),
            path: path.to_string(),
            content_type: header("content-type"),
            authorization: header("authorization"),
            body: body.to_vec(),
        });
    }
}

async fn catalog_handler(
    State(state): State<CatalogState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.record("POST", "/graphql", &headers, &body);

    let mut response = (state.status, state.reply).into_response();
    if let Some(location) = state.location {
        response
            .headers_mut()
            .insert(LOCATION, HeaderValue::from_static(location));
    }
    response
}

async fn elsewhere_handler(State(state): State<CatalogState>, headers: HeaderMap) -> &'static str {
    state.record("GET", "/elsewhere", &headers, &[]);
    REDIRECT_TARGET_BODY
}

/// Fake catalog service on its own runtime; keep it alive for the test
pub struct FakeCatalog {
    _runtime: Runtime,
    addr: SocketAddr,
    seen: Arc<Mutex<Vec<Captured>>>,
}

impl FakeCatalog {
    pub fn start(status: StatusCode, reply: &'static str) -> Self {
        Self::start_with(status, reply, None)
    }

    /// Answers the POST with `status` pointing at `/elsewhere`, which serves
    /// [`REDIRECT_TARGET_BODY`] with a 200
    pub fn redirecting(status: StatusCode) -> Self {
        Self::start_with(status, "", Some("/elsewhere"))
    }

    fn start_with(status: StatusCode, reply: &'static str, location: Option<&'static str>) -> Self {
        let runtime = Runtime::new().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let state = CatalogState {
            status,
            reply,
            location,
            seen: seen.clone(),
        };

        let listener = runtime
            .block_on(tokio::net::TcpListener::bind("127.0.0.1:0"))
            .unwrap();
        let addr = listener.local_addr().unwrap();
        let router = Router::new()
            .route("/graphql", post(catalog_handler))
            .route("/elsewhere", get(elsewhere_handler))
            .with_state(state);
        runtime.spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            _runtime: runtime,
            addr,
            seen,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}/graphql", self.addr)
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.seen.lock().unwrap().clone()
    }
}

/// A server that answers 200 but hangs up partway through the body
pub struct TruncatingCatalog {
    _runtime: Runtime,
    addr: SocketAddr,
}

/// Declared length is 100, only these bytes are ever sent
pub const TRUNCATED_BODY: &[u8] = b"{\"data\"";

fn request_complete(request: &[u8]) -> bool {
    let Some(header_end) = request.windows(4).position(|w| w == b"\r\n\r\n") else {
        return false;
    };
    let head = String::from_utf8_lossy(&request[..header_end]).to_ascii_lowercase();
    let content_length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);
    request.len() >= header_end + 4 + content_length
}

impl TruncatingCatalog {
    pub fn start() -> Self {
        let runtime = Runtime::new().unwrap();
        let listener = runtime
            .block_on(tokio::net::TcpListener::bind("127.0.0.1:0"))
            .unwrap();
        let addr = listener.local_addr().unwrap();

        runtime.spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                // Take the whole request so the client sees a clean reply
                let mut request = Vec::new();
                let mut chunk = [0u8; 4096];
                while !request_complete(&request) {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&chunk[..n]),
                    }
                }

                let mut reply = b"HTTP/1.1 200 OK\r\n\
                    Content-Type: application/json\r\n\
                    Content-Length: 100\r\n\
                    Connection: close\r\n\r\n"
                    .to_vec();
                reply.extend_from_slice(TRUNCATED_BODY);
                let _ = socket.write_all(&reply).await;
                let _ = socket.shutdown().await;
            }
        });

        Self {
            _runtime: runtime,
            addr,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}/graphql", self.addr)
    }
}
