//! Mock EMY upstream for testing.
//!
//! Serves a canned response from a local axum server bound to an ephemeral
//! port, so the real [`EmyClient`](super::EmyClient) can be exercised
//! end-to-end without leaving the machine.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Router};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Path the mock upstream serves its response on.
pub const MOCK_PATH: &str = "/emy";

/// Canned upstream response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// HTTP status to reply with.
    pub status: StatusCode,
    /// Raw response body.
    pub body: String,
    /// Delay before replying.
    pub delay: Duration,
}

impl MockResponse {
    /// 200 OK with the given JSON body.
    pub fn json(body: serde_json::Value) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    /// 200 OK with a raw body.
    pub fn raw(body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    /// Override the status code.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Delay the reply.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Clone)]
struct MockState {
    response: Arc<MockResponse>,
    hits: Arc<AtomicUsize>,
}

/// Running mock upstream. The server stops when this is dropped.
#[derive(Debug)]
pub struct MockUpstream {
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    handle: JoinHandle<()>,
}

impl MockUpstream {
    /// Bind to an ephemeral local port and start serving `response`.
    pub async fn spawn(response: MockResponse) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let hits = Arc::new(AtomicUsize::new(0));

        let state = MockState {
            response: Arc::new(response),
            hits: hits.clone(),
        };
        let router = Router::new()
            .route(MOCK_PATH, get(respond))
            .with_state(state);

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self { addr, hits, handle })
    }

    /// URL of the mock EMY endpoint.
    pub fn url(&self) -> String {
        format!("http://{}{}", self.addr, MOCK_PATH)
    }

    /// Number of requests served so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn respond(State(state): State<MockState>) -> impl IntoResponse {
    state.hits.fetch_add(1, Ordering::SeqCst);
    if !state.response.delay.is_zero() {
        tokio::time::sleep(state.response.delay).await;
    }
    (
        state.response.status,
        [(axum::http::header::CONTENT_TYPE, "application/json")],
        state.response.body.clone(),
    )
}

/// Reserve a local address with nothing listening on it.
pub fn unreachable_url() -> std::io::Result<String> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{}{}", addr, MOCK_PATH))
}
