//! Transport invoker — one HTTP exchange per call, bounded by the context deadline.
//!
//! Every request:
//! - carries `X-API-Key` / `X-Project-ID` when the context has them
//! - is sent as `Content-Type: application/json`, except multipart uploads
//!   where reqwest writes its own boundary header
//! - runs inside `tokio::time::timeout`; when the deadline fires the request
//!   future is dropped, which aborts the connection and releases the timer
//!
//! Responses map onto [`ClientError`]: 401 is `Authentication`, any other
//! non-2xx is `RequestFailed`, and everything below the status line
//! (connect, encode, read, decode) is `Transport`. A timeout configured on a
//! caller-supplied `reqwest::Client` is reported as `Timeout` too.

use std::sync::Arc;
use std::time::Duration;

use cuemap_core::{ClientContext, ClientError, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::Form;
use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace, warn};

pub const API_KEY_HEADER: &str = "X-API-Key";
pub const PROJECT_HEADER: &str = "X-Project-ID";

/// Request payload.
#[derive(Debug, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(Form),
}

/// A request to the engine, relative to the context's base URL.
#[derive(Debug)]
pub struct EngineRequest {
    method: Method,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    body: RequestBody,
}

impl EngineRequest {
    /// Path segments are percent-encoded individually when joined to the base URL.
    pub fn new(method: Method, segments: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(segments: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::new(Method::GET, segments)
    }

    pub fn post(segments: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::new(Method::POST, segments)
    }

    pub fn patch(segments: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::new(Method::PATCH, segments)
    }

    pub fn delete(segments: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::new(Method::DELETE, segments)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Attach a JSON body. Encoding failures surface as transport errors.
    pub fn json(mut self, body: &impl Serialize) -> Result<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| ClientError::transport("failed to encode request body", e))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    pub fn multipart(mut self, form: Form) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Unencoded path, for logs.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }
}

/// Stateless HTTP invoker bound to one [`ClientContext`].
#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
    context: Arc<ClientContext>,
}

impl Transport {
    pub fn new(context: ClientContext, http: reqwest::Client) -> Self {
        Self {
            http,
            context: Arc::new(context),
        }
    }

    pub fn context(&self) -> &ClientContext {
        &self.context
    }

    /// Send `request` and decode the JSON response body.
    pub async fn invoke(&self, request: EngineRequest) -> Result<Value> {
        let deadline = self.context.timeout();
        let method = request.method.clone();
        let path = request.path();

        debug!(%method, %path, "Dispatching engine request");

        match tokio::time::timeout(deadline, self.exchange(request, &path, deadline)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    %method,
                    %path,
                    timeout_ms = deadline.as_millis() as u64,
                    "Engine request timed out"
                );
                Err(ClientError::Timeout { after: deadline })
            }
        }
    }

    /// [`invoke`](Self::invoke) and decode into `T`.
    pub async fn invoke_as<T: DeserializeOwned>(&self, request: EngineRequest) -> Result<T> {
        let value = self.invoke(request).await?;
        serde_json::from_value(value)
            .map_err(|e| ClientError::transport("malformed engine response", e))
    }

    /// Resolve the absolute URL for `request`.
    pub fn url_for(&self, request: &EngineRequest) -> Result<Url> {
        let base = self.context.base_url();
        let mut url = Url::parse(base)
            .map_err(|e| ClientError::transport(format!("invalid base URL '{base}'"), e))?;

        // `url` drops "." and ".." segments while normalizing, which would
        // silently retarget the request.
        if let Some(bad) = request
            .segments
            .iter()
            .find(|s| s.is_empty() || *s == "." || *s == "..")
        {
            return Err(ClientError::transport_msg(format!(
                "invalid path segment '{bad}' in {}",
                request.path()
            )));
        }

        url.path_segments_mut()
            .map_err(|_| ClientError::transport_msg(format!("base URL '{base}' cannot carry a path")))?
            .pop_if_empty()
            .extend(&request.segments);

        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }

        Ok(url)
    }

    async fn exchange(&self, request: EngineRequest, path: &str, deadline: Duration) -> Result<Value> {
        let url = self.url_for(&request)?;
        let mut builder = self.http.request(request.method, url);

        if let Some(key) = self.context.api_key() {
            builder = builder.header(API_KEY_HEADER, key);
        }
        if let Some(project) = self.context.project_id() {
            builder = builder.header(PROJECT_HEADER, project);
        }

        builder = match request.body {
            RequestBody::Empty => builder.header(CONTENT_TYPE, "application/json"),
            RequestBody::Json(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .json(&body),
            RequestBody::Multipart(form) => builder.multipart(form),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| request_error(e, format!("request to {path} failed"), deadline))?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            warn!(%path, "Engine rejected credentials");
            return Err(ClientError::Authentication);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), %path, body = %body, "Engine request failed");
            return Err(ClientError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| request_error(e, format!("failed to read response from {path}"), deadline))?;

        trace!(%path, len = bytes.len(), "Engine response received");

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes)
            .map_err(|e| ClientError::transport(format!("malformed JSON from {path}"), e))
    }
}

/// Map a reqwest fault, keeping timeouts set on a caller-supplied client
/// in the `Timeout` kind.
fn request_error(e: reqwest::Error, message: String, deadline: Duration) -> ClientError {
    if e.is_timeout() {
        warn!(error = %e, "HTTP client timeout fired");
        ClientError::Timeout { after: deadline }
    } else {
        ClientError::transport(message, e)
    }
}
