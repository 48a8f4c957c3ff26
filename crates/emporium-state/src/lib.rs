//! # emporium-state: Feature Stores and View Models
//!
//! Owns the in-memory state of each admin screen and the view models that
//! derive what a screen shows from it.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     emporium-state (THIS CRATE)                         │
//! │                                                                         │
//! │  host (console, tests)                                                  │
//! │     │  load() / set_search() / delete(id, &confirm) / retry()           │
//! │     ▼                                                                   │
//! │  ┌───────────────────────────────────────────────────────────────────┐ │
//! │  │  views::*   screen-local UI state (search, sort, page, expanded)  │ │
//! │  │             ClientFilteredList │ ServerFilteredList │ RowActions  │ │
//! │  └──────────────────────────────┬────────────────────────────────────┘ │
//! │                                 │ store actions                         │
//! │  ┌──────────────────────────────▼────────────────────────────────────┐ │
//! │  │  stores::*  FeatureState per slice behind StoreCore               │ │
//! │  │             ActionGuard: loading counter • request tickets        │ │
//! │  └──────────────────────────────┬────────────────────────────────────┘ │
//! │                                 │                                       │
//! │                       emporium_client::api::*                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! Store state sits behind a lock that is never held across an `.await`.
//! Overlapping fetches on the same slot are sequenced: only the most
//! recently started one commits.
//!
//! ## Module Organization
//! - [`store`] - `FeatureState`, `StoreCore`, `ActionGuard`, paging meta
//! - [`stores`] - `CategoryStore`, `ProductStore`, `CustomerStore`, `SystemStore`
//! - [`views`] - List strategies, row actions, and the screen view models

pub mod store;
pub mod stores;
pub mod views;

pub use store::{ActionGuard, FeatureState, PageInfo, PagedMeta, StoreCore};
pub use stores::{CategoryStore, CustomerStore, NotificationMeta, ProductStore, SystemStore};

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use emporium_client::{ApiClient, HttpResponse, MemorySessionStore, ScriptedTransport};
    use serde_json::{json, Value};

    /// A client over a scripted transport with a seeded token.
    pub fn scripted_client() -> (ApiClient, Arc<ScriptedTransport>) {
        let transport = Arc::new(ScriptedTransport::new());
        let session = Arc::new(MemorySessionStore::with_values([("token", "test-token")]));
        (ApiClient::new(transport.clone(), session), transport)
    }

    /// A 200 response wrapping `data` in the server envelope.
    pub fn envelope(data: Value) -> HttpResponse {
        HttpResponse::json(200, json!({ "success": true, "data": data }))
    }
}
