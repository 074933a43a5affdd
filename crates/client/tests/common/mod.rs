//! In-process stub engine for client integration tests.
//!
//! Routes are canned `(method, path) -> (status, body)` entries; every request
//! is recorded so tests can assert on headers and bodies.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use cuemap_client::{ClientConfig, CueMapClient};
use serde_json::Value;

/// A request as the stub saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body should be JSON")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

struct StubState {
    routes: HashMap<(Method, String), (StatusCode, Option<Value>)>,
    delay: Option<Duration>,
    recorded: Mutex<Vec<Recorded>>,
}

#[derive(Default)]
pub struct StubEngineBuilder {
    routes: HashMap<(Method, String), (StatusCode, Option<Value>)>,
    delay: Option<Duration>,
}

impl StubEngineBuilder {
    /// Answer `method path` with `status` and a JSON body.
    pub fn route(mut self, method: Method, path: &str, status: u16, body: Value) -> Self {
        let status = StatusCode::from_u16(status).expect("valid status");
        self.routes.insert((method, path.to_string()), (status, Some(body)));
        self
    }

    /// Answer `method path` with `status` and no body.
    pub fn empty(mut self, method: Method, path: &str, status: u16) -> Self {
        let status = StatusCode::from_u16(status).expect("valid status");
        self.routes.insert((method, path.to_string()), (status, None));
        self
    }

    /// Hold every response for `delay` before answering.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn start(self) -> StubEngine {
        let state = Arc::new(StubState {
            routes: self.routes,
            delay: self.delay,
            recorded: Mutex::new(Vec::new()),
        });

        let app = Router::new().fallback(handle).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        StubEngine {
            url: format!("http://{addr}"),
            state,
        }
    }
}

pub struct StubEngine {
    pub url: String,
    state: Arc<StubState>,
}

impl StubEngine {
    pub fn builder() -> StubEngineBuilder {
        StubEngineBuilder::default()
    }

    /// Client pointed at this stub with otherwise default settings.
    pub fn client(&self) -> CueMapClient {
        self.client_with(ClientConfig::default())
    }

    pub fn client_with(&self, config: ClientConfig) -> CueMapClient {
        CueMapClient::from_config(config.url(self.url.clone())).unwrap()
    }

    pub fn recorded(&self) -> Vec<Recorded> {
        self.state.recorded.lock().unwrap().clone()
    }

    pub fn last(&self) -> Recorded {
        self.recorded().pop().expect("stub received no requests")
    }
}

async fn handle(
    State(state): State<Arc<StubState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.recorded.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body,
    });

    if let Some(delay) = state.delay {
        tokio::time::sleep(delay).await;
    }

    match state.routes.get(&(method, uri.path().to_string())) {
        Some((status, Some(body))) => (*status, axum::Json(body.clone())).into_response(),
        Some((status, None)) => (*status).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// A base URL nothing is listening on.
pub async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
