//! Scriptable upstream HTTP server for integration tests
//!
//! Responses are queued up front. A response registered for a path is served
//! only to requests for that path; anything else takes the next response from
//! the shared queue. Every request's path and query is recorded.

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde_json::Value;
use tokio::task::JoinHandle;

/// One scripted response
#[derive(Debug, Clone)]
pub struct MockResponse {
    status: StatusCode,
    body: Option<Value>,
    location: Option<String>,
    delay: Duration,
}

impl MockResponse {
    /// 200 with a JSON body
    pub fn json(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body: Some(body),
            location: None,
            delay: Duration::ZERO,
        }
    }

    /// Empty body with the given status
    pub fn status(code: u16) -> Self {
        Self {
            status: StatusCode::from_u16(code).unwrap(),
            body: None,
            location: None,
            delay: Duration::ZERO,
        }
    }

    /// 302 to `location` (absolute path on the same server)
    pub fn redirect(location: &str) -> Self {
        Self {
            location: Some(location.to_string()),
            ..Self::status(302)
        }
    }

    /// Hold the response back for `delay` before sending it
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Default)]
struct MockState {
    responses: Mutex<VecDeque<MockResponse>>,
    by_path: Mutex<HashMap<String, VecDeque<MockResponse>>>,
    requests: Mutex<Vec<String>>,
}

pub struct MockUpstream {
    addr: SocketAddr,
    state: Arc<MockState>,
    server: JoinHandle<()>,
}

impl MockUpstream {
    /// Bind to an ephemeral localhost port and start serving
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .fallback(respond)
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            state,
            server,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn enqueue(&self, response: MockResponse) {
        self.state.responses.lock().unwrap().push_back(response);
    }

    /// Queue a response for requests to `path` only (query string ignored)
    pub fn enqueue_for(&self, path: &str, response: MockResponse) {
        self.state
            .by_path
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(response);
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }

    /// Paths (with query) of all requests received so far, in arrival order
    pub fn requests(&self) -> Vec<String> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Responses still waiting to be served
    pub fn pending(&self) -> usize {
        let by_path: usize = self
            .state
            .by_path
            .lock()
            .unwrap()
            .values()
            .map(VecDeque::len)
            .sum();
        self.state.responses.lock().unwrap().len() + by_path
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn respond(State(state): State<Arc<MockState>>, uri: Uri) -> Response {
    let path = uri
        .path_and_query()
        .map(|p| p.to_string())
        .unwrap_or_else(|| uri.path().to_string());
    state.requests.lock().unwrap().push(path);

    let routed = state
        .by_path
        .lock()
        .unwrap()
        .get_mut(uri.path())
        .and_then(VecDeque::pop_front);
    let next = routed.or_else(|| state.responses.lock().unwrap().pop_front());
    let Some(response) = next else {
        return StatusCode::NOT_IMPLEMENTED.into_response();
    };

    if !response.delay.is_zero() {
        tokio::time::sleep(response.delay).await;
    }

    let mut builder = Response::builder().status(response.status);
    if let Some(location) = response.location {
        builder = builder.header(header::LOCATION, location);
    }

    match response.body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}
