//! # HTTP Transport
//!
//! The seam between the API modules and the network.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Transport Seam                                   │
//! │                                                                         │
//! │   ApiClient ──► HttpRequest ──► dyn Transport ──► HttpResponse          │
//! │                 method          │                 status                │
//! │                 path            ├── ReqwestTransport (production)       │
//! │                 query           └── ScriptedTransport (tests)           │
//! │                 body            │                 body (JSON or None)   │
//! │                 bearer                                                  │
//! │                                                                         │
//! │   Err(..) from send() means NO response was received.                  │
//! │   Any HTTP status, 2xx or not, comes back as Ok(HttpResponse).         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::debug;

use emporium_core::QueryParams;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

// =============================================================================
// Request / Response
// =============================================================================

/// HTTP verbs used by the admin backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// One outgoing request, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    /// Path starting with `/`, e.g. `/categories/7`.
    pub path: String,
    pub query: QueryParams,
    pub body: Option<Value>,
    /// Session credential sent as `Authorization: Bearer <token>`.
    pub bearer: Option<String>,
}

impl HttpRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        HttpRequest {
            method,
            path: path.into(),
            query: QueryParams::new(),
            body: None,
            bearer: None,
        }
    }
}

/// A response that made it back from the server.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    /// Parsed JSON body; `None` when empty or not JSON.
    pub body: Option<Value>,
}

impl HttpResponse {
    /// A response with the given status and JSON body.
    pub fn json(status: u16, body: Value) -> Self {
        HttpResponse {
            status,
            body: Some(body),
        }
    }

    /// A 200 response with the given JSON body.
    pub fn ok(body: Value) -> Self {
        Self::json(200, body)
    }

    /// A response with no body.
    pub fn empty(status: u16) -> Self {
        HttpResponse { status, body: None }
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// =============================================================================
// Transport Trait
// =============================================================================

/// Sends requests to the backend.
///
/// Implementations must return `Err` only when no response was received.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> ClientResult<HttpResponse>;
}

// =============================================================================
// Reqwest Transport
// =============================================================================

/// Production transport backed by a pooled [`reqwest::Client`].
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Creates a transport for a base URL.
    ///
    /// `timeout` of `None` means requests wait for the server indefinitely.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
        user_agent: &str,
    ) -> ClientResult<Self> {
        let base_url = base_url.into();
        url::Url::parse(&base_url)?;

        let mut builder = reqwest::Client::builder().user_agent(user_agent.to_string());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(ReqwestTransport {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates a transport from the `[api]` section of the config.
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        Self::new(
            config.api.base_url.clone(),
            config.request_timeout(),
            &config.api.user_agent,
        )
    }

    /// Reuses an existing client (shared connection pool).
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        ReqwestTransport {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Joins base URL, path, and query. The base path is kept.
    fn url_for(&self, request: &HttpRequest) -> ClientResult<url::Url> {
        let mut url = url::Url::parse(&format!("{}{}", self.base_url, request.path))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(
                request
                    .query
                    .pairs()
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str())),
            );
        }
        Ok(url)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
        let url = self.url_for(&request)?;

        let mut builder = self.client.request(request.method.into(), url);
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;

        let body = if bytes.is_empty() {
            None
        } else {
            match serde_json::from_slice::<Value>(&bytes) {
                Ok(value) => Some(value),
                Err(e) => {
                    debug!(status, error = %e, "Response body is not JSON");
                    None
                }
            }
        };

        Ok(HttpResponse { status, body })
    }
}

// =============================================================================
// Scripted Transport (tests)
// =============================================================================

#[cfg(any(test, feature = "test-util"))]
pub use scripted::ScriptedTransport;

#[cfg(any(test, feature = "test-util"))]
mod scripted {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Mutex, PoisonError};
    use tokio::sync::oneshot;

    enum Reply {
        Ready(ClientResult<HttpResponse>),
        Gated(oneshot::Receiver<ClientResult<HttpResponse>>),
    }

    struct Route {
        method: Method,
        path: String,
        reply: Reply,
    }

    /// In-memory transport answering from a script.
    ///
    /// Replies are matched by method and path in the order they were
    /// scripted; each reply is used once. Every request is recorded.
    /// An unscripted request fails like a refused connection.
    #[derive(Default)]
    pub struct ScriptedTransport {
        routes: Mutex<VecDeque<Route>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl ScriptedTransport {
        pub fn new() -> Self {
            Self::default()
        }

        fn push(&self, method: Method, path: &str, reply: Reply) {
            self.routes
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push_back(Route {
                    method,
                    path: path.to_string(),
                    reply,
                });
        }

        /// Scripts a response.
        pub fn respond(&self, method: Method, path: &str, response: HttpResponse) {
            self.push(method, path, Reply::Ready(Ok(response)));
        }

        /// Scripts a failure where no response arrives.
        pub fn fail(&self, method: Method, path: &str, error: ClientError) {
            self.push(method, path, Reply::Ready(Err(error)));
        }

        /// Scripts a reply that is held until the returned sender fires.
        ///
        /// Lets a test interleave overlapping requests deterministically.
        pub fn gate(
            &self,
            method: Method,
            path: &str,
        ) -> oneshot::Sender<ClientResult<HttpResponse>> {
            let (tx, rx) = oneshot::channel();
            self.push(method, path, Reply::Gated(rx));
            tx
        }

        /// Every request sent so far, oldest first.
        pub fn requests(&self) -> Vec<HttpRequest> {
            self.requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// The most recent request.
        pub fn last_request(&self) -> Option<HttpRequest> {
            self.requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .last()
                .cloned()
        }

        /// Number of scripted replies not yet consumed.
        pub fn pending(&self) -> usize {
            self.routes
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
            self.requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(request.clone());

            let route = {
                let mut routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);
                let position = routes
                    .iter()
                    .position(|r| r.method == request.method && r.path == request.path);
                position.and_then(|i| routes.remove(i))
            };

            match route.map(|r| r.reply) {
                Some(Reply::Ready(reply)) => reply,
                Some(Reply::Gated(rx)) => rx.await.unwrap_or_else(|_| {
                    Err(ClientError::Transport("scripted gate dropped".to_string()))
                }),
                None => Err(ClientError::Transport(format!(
                    "no scripted response for {} {}",
                    request.method, request.path
                ))),
            }
        }
    }
}
