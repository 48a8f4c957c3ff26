//! # API Modules
//!
//! One async function per backend endpoint, grouped by resource.
//!
//! ## Contract
//! Every function returns an [`ApiResult`](emporium_core::ApiResult) and
//! never an `Err`:
//! - success: `data` holds the unwrapped payload
//! - failure: `data` holds the fallback (`[]`, `None`, empty page) and
//!   `message` is never empty
//!
//! Functions never touch store state. That is the stores' job.
//!
//! - [`category`] - `/categories`, `/categories/subcategories`
//! - [`customers`] - `/customers`
//! - [`product_admin`] - `/products`
//! - [`system`] - `/admin/system/*`

pub mod category;
pub mod customers;
pub mod product_admin;
pub mod system;
