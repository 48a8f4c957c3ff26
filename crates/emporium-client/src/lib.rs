//! # emporium-client: HTTP Layer for the Emporium Admin Client
//!
//! Turns backend calls into [`ApiResult`](emporium_core::ApiResult)s. No
//! caller above this crate ever sees a transport error.
//!
//! ## Layering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     emporium-client (THIS CRATE)                        │
//! │                                                                         │
//! │  ┌───────────────────────────────────────────────────────────────────┐ │
//! │  │  api::{category, customers, product_admin, system}                │ │
//! │  │  one async fn per endpoint, default failure messages              │ │
//! │  └──────────────────────────────┬────────────────────────────────────┘ │
//! │                                 │                                       │
//! │  ┌──────────────────────────────▼────────────────────────────────────┐ │
//! │  │  ApiClient                                                        │ │
//! │  │  bearer token ◄── SessionStore (auth helpers)                     │ │
//! │  │  envelope unwrap, decode, failure normalization                   │ │
//! │  └──────────────────────────────┬────────────────────────────────────┘ │
//! │                                 │                                       │
//! │  ┌──────────────────────────────▼────────────────────────────────────┐ │
//! │  │  dyn Transport                                                    │ │
//! │  │  ReqwestTransport │ ScriptedTransport (tests, `test-util`)        │ │
//! │  └───────────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`api`] - Endpoint functions grouped by resource
//! - [`client`] - `ApiClient` and the request builder
//! - [`transport`] - `Transport` trait and implementations
//! - [`session`] - `SessionStore` trait, memory and file stores
//! - [`auth`] - Session inspection helpers
//! - [`config`] - `ClientConfig` (TOML + env + defaults)
//! - [`error`] - `ClientError`, `ConfigError`, `SessionError`

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod session;
pub mod transport;

pub use client::{ApiClient, ApiRequest};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, ConfigError, SessionError};
pub use session::{FileSessionStore, MemorySessionStore, SessionStore};
pub use transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};

#[cfg(any(test, feature = "test-util"))]
pub use transport::ScriptedTransport;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use crate::client::ApiClient;
    use crate::session::MemorySessionStore;
    use crate::transport::ScriptedTransport;

    /// A client over a scripted transport with a seeded token.
    pub fn scripted_client() -> (ApiClient, Arc<ScriptedTransport>) {
        let transport = Arc::new(ScriptedTransport::new());
        let session = Arc::new(MemorySessionStore::with_values([("token", "test-token")]));
        (ApiClient::new(transport.clone(), session), transport)
    }
}
