//! # Feature Stores
//!
//! One store per business area. Each store owns an [`ApiClient`](emporium_client::ApiClient) handle and
//! one [`StoreCore`](crate::store::StoreCore) per slice of state.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Store Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐ ┌──────────────┐ ┌──────────────┐ ┌──────────────┐   │
//! │  │CategoryStore │ │ ProductStore │ │CustomerStore │ │ SystemStore  │   │
//! │  │              │ │              │ │              │ │              │   │
//! │  │ categories   │ │ products     │ │ customers    │ │ users        │   │
//! │  │ subcategories│ │  + PageInfo  │ │              │ │ sessions     │   │
//! │  │  + grouping  │ │  + filters   │ │              │ │ logs (paged) │   │
//! │  │              │ │              │ │              │ │ health       │   │
//! │  │              │ │              │ │              │ │ notifications│   │
//! │  │              │ │              │ │              │ │ permissions  │   │
//! │  │              │ │              │ │              │ │ role perms   │   │
//! │  └──────┬───────┘ └──────┬───────┘ └──────┬───────┘ └──────┬───────┘   │
//! │         └────────────────┴────────┬───────┴────────────────┘           │
//! │                                   ▼                                     │
//! │                       emporium_client::api::*                           │
//! │                                                                         │
//! │  Stores are independent: no store reads another store's state.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every action returns the full [`ApiResult`](emporium_core::ApiResult).
//! Callers check `success`, never the payload's truthiness.

mod category;
mod customer;
mod product;
mod system;

pub use category::{CategoryStore, SubcategoryIndex};
pub use customer::CustomerStore;
pub use product::ProductStore;
pub use system::{NotificationMeta, SystemStore};
