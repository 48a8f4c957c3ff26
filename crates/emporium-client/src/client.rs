//! # API Client
//!
//! Shared plumbing behind every API module function: attach the session
//! credential, send, unwrap the server envelope, decode, and fold every
//! failure into an [`ApiResult`].
//!
//! ## Normalization Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     ApiClient::fetch pipeline                           │
//! │                                                                         │
//! │  ApiRequest ──► invalid? ──yes──► ApiResult::failure(validation msg)    │
//! │                    │ no                                                 │
//! │                    ▼                                                    │
//! │  + Bearer token ──► Transport::send                                     │
//! │                    │                                                    │
//! │       ┌────────────┼─────────────────────┐                              │
//! │       ▼            ▼                     ▼                              │
//! │   Err (no       non-2xx              2xx body                           │
//! │   response)     Status{body}         unwrap_server_envelope             │
//! │       │            │                  │          │                      │
//! │       │            │             Rejected    Accepted{data}             │
//! │       │            │                  │          │                      │
//! │       ▼            ▼                  ▼          ▼                      │
//! │   fallback    normalize_failure(body, fallback)  decode ──► ok(data)    │
//! │                                                    │                    │
//! │                                              decode error ──► fallback  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use emporium_core::envelope::{normalize_failure, unwrap_server_envelope, ServerPayload};
use emporium_core::validation::Validate;
use emporium_core::{ApiResult, CoreError, Page, QueryParams};

use crate::auth;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::session::{FileSessionStore, MemorySessionStore, SessionStore};
use crate::transport::{HttpRequest, Method, ReqwestTransport, Transport};

// =============================================================================
// Request Builder
// =============================================================================

/// A request under construction.
///
/// Encoding and validation problems are recorded rather than returned, so
/// API functions stay a single expression; the request then fails at
/// dispatch without touching the network.
#[derive(Debug)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: QueryParams,
    body: Option<Value>,
    invalid: Option<ClientError>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        ApiRequest {
            method,
            path: path.into(),
            query: QueryParams::new(),
            body: None,
            invalid: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Adds query parameters from a filter struct, stripping unset values.
    pub fn filters<F: Serialize + ?Sized>(mut self, filters: &F) -> Self {
        match QueryParams::from_filters(filters) {
            Ok(params) => self.query = params,
            Err(e) => self.record(e.into()),
        }
        self
    }

    /// Adds one query parameter when a value is present.
    pub fn param<V: ToString>(mut self, key: &str, value: Option<V>) -> Self {
        self.query.push_opt(key, value);
        self
    }

    /// Sets a JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Self {
        match serde_json::to_value(body) {
            Ok(value) => self.body = Some(value),
            Err(e) => self.record(CoreError::encode("request body", e).into()),
        }
        self
    }

    /// Validates a payload, then sets it as the JSON body.
    pub fn validated<B: Serialize + Validate>(mut self, body: &B) -> Self {
        if let Err(e) = body.validate() {
            self.record(CoreError::from(e).into());
            return self;
        }
        self.json(body)
    }

    fn record(&mut self, error: ClientError) {
        if self.invalid.is_none() {
            self.invalid = Some(error);
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Message shown for a failed call.
///
/// Validation failures surface their own message. Failures that carry a
/// response body go through the precedence rules. Everything else gets the
/// per-operation fallback.
pub fn failure_message(error: &ClientError, fallback: &str) -> String {
    if let ClientError::Core(CoreError::Validation(v)) = error {
        return v.to_string();
    }
    normalize_failure(error.response_body(), fallback)
}

// =============================================================================
// ApiClient
// =============================================================================

/// Unwrapped 2xx payload.
struct Accepted {
    data: Value,
    message: Option<String>,
}

/// Handle shared by every API module function. Cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: Arc<dyn SessionStore>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, session: Arc<dyn SessionStore>) -> Self {
        ApiClient { transport, session }
    }

    /// Builds a reqwest-backed client with a file session store.
    ///
    /// Falls back to an in-memory session when no data directory exists.
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        config.validate()?;
        let transport = Arc::new(ReqwestTransport::from_config(config)?);

        let session: Arc<dyn SessionStore> = match config.session_path() {
            Some(path) => Arc::new(FileSessionStore::new(path)),
            None => {
                warn!("No session path available, session will not persist");
                Arc::new(MemorySessionStore::new())
            }
        };

        Ok(Self::new(transport, session))
    }

    /// The injected session store.
    pub fn session(&self) -> &dyn SessionStore {
        self.session.as_ref()
    }

    /// Sends a request and unwraps the server envelope.
    async fn execute(&self, request: ApiRequest) -> ClientResult<Accepted> {
        if let Some(error) = request.invalid {
            return Err(error);
        }

        let http = HttpRequest {
            method: request.method,
            path: request.path,
            query: request.query,
            body: request.body,
            bearer: auth::get_token(self.session.as_ref()),
        };

        debug!(
            method = %http.method,
            path = %http.path,
            query = ?http.query.pairs(),
            authenticated = http.bearer.is_some(),
            "Dispatching request"
        );

        let response = self.transport.send(http).await?;

        if !response.is_success() {
            return Err(ClientError::Status {
                status: response.status,
                body: response.body,
            });
        }

        match unwrap_server_envelope(response.body.unwrap_or(Value::Null)) {
            ServerPayload::Accepted { data, message } => Ok(Accepted { data, message }),
            ServerPayload::Rejected(body) => Err(ClientError::Rejected(body)),
        }
    }

    /// Runs a request and folds the outcome into an `ApiResult`.
    async fn fetch<T, D>(&self, request: ApiRequest, fallback: &str, decode: D) -> ApiResult<T>
    where
        T: Default,
        D: FnOnce(Value) -> Result<T, serde_json::Error>,
    {
        let method = request.method;
        let path = request.path.clone();

        let outcome = self.execute(request).await.and_then(|accepted| {
            decode(accepted.data)
                .map(|data| (data, accepted.message))
                .map_err(|e| ClientError::decode(std::any::type_name::<T>(), e))
        });

        match outcome {
            Ok((data, Some(message))) => ApiResult::ok_with_message(data, message),
            Ok((data, None)) => ApiResult::ok(data),
            Err(error) => {
                let message = failure_message(&error, fallback);
                warn!(%method, %path, %error, %message, "Request failed");
                ApiResult::failure(message)
            }
        }
    }

    // =========================================================================
    // Typed Helpers
    // =========================================================================

    /// List endpoint: wrapped or bare array. Fallback data is `[]`.
    pub async fn list<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        fallback: &str,
    ) -> ApiResult<Vec<T>> {
        self.fetch(request, fallback, serde_json::from_value).await
    }

    /// Single-record endpoint. Fallback data is `None`; a success never
    /// carries `None`.
    pub async fn one<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        fallback: &str,
    ) -> ApiResult<Option<T>> {
        self.fetch(request, fallback, |value| {
            serde_json::from_value::<T>(value).map(Some)
        })
        .await
    }

    /// Server-paged endpoint. A bare array becomes a single page.
    pub async fn page<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        fallback: &str,
    ) -> ApiResult<Page<T>> {
        self.fetch(request, fallback, |value| {
            if value.is_array() {
                serde_json::from_value::<Vec<T>>(value).map(Page::from_items)
            } else {
                serde_json::from_value::<Page<T>>(value)
            }
        })
        .await
    }

    /// Endpoint whose payload is a plain value with a default (stats, health).
    pub async fn value<T: DeserializeOwned + Default>(
        &self,
        request: ApiRequest,
        fallback: &str,
    ) -> ApiResult<T> {
        self.fetch(request, fallback, serde_json::from_value).await
    }

    /// Endpoint whose payload is ignored (delete, revoke, retry).
    pub async fn command(&self, request: ApiRequest, fallback: &str) -> ApiResult<()> {
        self.fetch(request, fallback, |_| Ok(())).await
    }
}
