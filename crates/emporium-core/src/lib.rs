//! # emporium-core: Pure Types for the Emporium Admin Client
//!
//! Every screen of the admin client speaks the same small vocabulary:
//! a uniform result envelope, a handful of domain records, and a few list
//! derivations. This crate holds all of it with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Emporium Admin Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 View models (emporium-state)                    │   │
//! │  │   CategoryListView, ProductListView, SystemDashboard, ...       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               Feature stores (emporium-state)                   │   │
//! │  │   items • current • loading • error                             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               API modules (emporium-client)                     │   │
//! │  │   HTTP call ──► unwrap envelope ──► ApiResult<T>                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ emporium-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────────┐  │   │
//! │  │   │ envelope │ │  query   │ │  types   │ │ listing          │  │   │
//! │  │   │ApiResult │ │QueryParam│ │ Product  │ │ filter/sort/page │  │   │
//! │  │   │ failures │ │ stripping│ │ Category │ │ group_by         │  │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`envelope`] - `ApiResult<T>` and the failure-message precedence rules
//! - [`query`] - Query parameters with unset filters stripped
//! - [`types`] - Domain records, payloads, filters, and `Entity` identity
//! - [`listing`] - Client-side filter / sort / paginate / group-by helpers
//! - [`validation`] - Form input validation run before any request
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use emporium_core::envelope::normalize_failure;
//! use serde_json::json;
//!
//! let body = json!({
//!     "detail": [{ "loc": ["body", "category_name"], "msg": "field required" }]
//! });
//! let message = normalize_failure(Some(&body), "Failed to create category");
//! assert_eq!(message, "body.category_name: field required");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod envelope;
pub mod error;
pub mod listing;
pub mod query;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use envelope::ApiResult;
pub use error::{CoreError, CoreResult, ValidationError};
pub use query::QueryParams;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Page size used by client-driven lists when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Largest page size a caller may request from a server-driven list.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Session store key holding the opaque session credential.
pub const SESSION_TOKEN_KEY: &str = "token";

/// Session store key holding the JSON-serialized user profile.
pub const SESSION_USER_KEY: &str = "user";
