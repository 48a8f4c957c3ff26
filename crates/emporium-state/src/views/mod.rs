//! # View Models
//!
//! Screen-level state that never goes into a store: search text, sort
//! column, current page, expanded rows, rows with a delete outstanding.
//!
//! - [`list`] - `ClientFilteredList`, `ServerFilteredList`, `PagedSource`
//! - [`actions`] - `Confirm`, `RowActions`, `DeleteOutcome`
//! - [`category`], [`customer`] - client-driven screens
//! - [`product`], [`audit_log`] - server-driven screens
//! - [`dashboard`] - system health and notification summary

pub mod actions;
pub mod audit_log;
pub mod category;
pub mod customer;
pub mod dashboard;
pub mod list;
pub mod product;

pub use actions::{Confirm, DeleteOutcome, RowActions};
pub use audit_log::{AuditLogScreen, AuditLogView};
pub use category::{CategoryListView, CategoryRow, CategoryScreen};
pub use customer::{CustomerListView, CustomerScreen};
pub use dashboard::{DashboardLoad, DashboardSummary, SystemDashboard};
pub use list::{ClientFilteredList, PagedFilters, PagedSource, ServerFilteredList};
pub use product::{ProductListView, ProductScreen};
