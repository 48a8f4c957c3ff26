//! # Domain Types
//!
//! Records exchanged with the admin REST backend.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Catalog                 Customers              System (/admin/system)  │
//! │  ───────                 ─────────              ──────────────────────  │
//! │  Category                Customer               AdminUser               │
//! │   └── Subcategory                               AdminSession            │
//! │  Product                                        AdminLog                │
//! │   └── ProductStatus                             SystemHealth            │
//! │                                                 Notification            │
//! │                                                 Permission              │
//! │                                                 RolePermission          │
//! │                                                                         │
//! │  Payloads: NewX / XUpdate (None fields are never sent)                 │
//! │  Filters:  ProductFilters, CustomerFilters, AdminLogFilters, ...       │
//! │  Paging:   Page<T>                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every record exposes its identifier through [`Entity`]. The canonical
//! wire field is `id`. On input a missing `id` is taken from `_id`, then
//! from `permission_id` for permissions or `session_id` for sessions; when
//! `id` is present the other keys are ignored. Output always uses `id`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Numeric identifier used by most backend resources.
pub type EntityId = i64;

// =============================================================================
// Entity Identity
// =============================================================================

/// A record that can be matched by identifier inside a collection.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Identifier type.
    type Id: Clone + PartialEq + fmt::Debug + fmt::Display + Send + Sync + 'static;

    /// Returns the record's identifier.
    fn entity_id(&self) -> Self::Id;
}

macro_rules! numeric_entity {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Entity for $ty {
                type Id = EntityId;

                fn entity_id(&self) -> EntityId {
                    self.id
                }
            }
        )*
    };
}

// =============================================================================
// Timestamps
// =============================================================================

/// Lenient timestamp parsing.
///
/// The backend emits RFC 3339 strings, but some endpoints drop the offset
/// (`2024-03-01T10:15:00`). Offset-less values are read as UTC.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};

    /// Parses a timestamp string, accepting both zoned and naive forms.
    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()
            .map(|naive| naive.and_utc())
    }

    /// serde helper for `Option<DateTime<Utc>>` fields.
    pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse))
    }
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Catalog
// =============================================================================

/// A top-level product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self")]
pub struct Category {
    pub id: EntityId,

    pub category_name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default = "default_true")]
    pub is_active: bool,

    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A subcategory belonging to exactly one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self")]
pub struct Subcategory {
    pub id: EntityId,

    /// Parent category.
    pub category_id: EntityId,

    pub subcategory_name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Lifecycle status of a product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
    Draft,
    OutOfStock,
    /// Any status string this client does not know yet.
    #[serde(other)]
    Unknown,
}

impl ProductStatus {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Active => "active",
            ProductStatus::Inactive => "inactive",
            ProductStatus::Draft => "draft",
            ProductStatus::OutOfStock => "out_of_stock",
            ProductStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A product as seen by the admin catalog screens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self")]
pub struct Product {
    pub id: EntityId,

    pub name: String,

    #[serde(default)]
    pub sku: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Unit price in the store currency.
    #[serde(default)]
    pub price: f64,

    #[serde(default)]
    pub stock_quantity: i64,

    #[serde(default)]
    pub category_id: Option<EntityId>,

    #[serde(default)]
    pub subcategory_id: Option<EntityId>,

    #[serde(default)]
    pub status: ProductStatus,

    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub updated_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Customers
// =============================================================================

/// A storefront customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self")]
pub struct Customer {
    pub id: EntityId,

    #[serde(default)]
    pub first_name: String,

    #[serde(default)]
    pub last_name: String,

    pub email: String,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default = "default_true")]
    pub is_active: bool,

    #[serde(default)]
    pub total_orders: i64,

    #[serde(default)]
    pub total_spent: f64,

    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Customer {
    /// "First Last", trimmed when either part is missing.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

// =============================================================================
// System Administration
// =============================================================================

/// An administrator account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self")]
pub struct AdminUser {
    pub id: EntityId,

    pub username: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub roles: Vec<String>,

    #[serde(default = "default_true")]
    pub is_active: bool,

    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub last_login: Option<DateTime<Utc>>,
}

/// An active or expired administrator login session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self")]
pub struct AdminSession {
    /// Session identifiers are opaque strings.
    pub id: String,

    pub user_id: EntityId,

    #[serde(default)]
    pub ip_address: Option<String>,

    #[serde(default)]
    pub user_agent: Option<String>,

    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub expires_at: Option<DateTime<Utc>>,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Entity for AdminSession {
    type Id = String;

    fn entity_id(&self) -> String {
        self.id.clone()
    }
}

/// One entry of the administrator audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self")]
pub struct AdminLog {
    pub id: EntityId,

    #[serde(default)]
    pub admin_id: Option<EntityId>,

    #[serde(default)]
    pub admin_username: Option<String>,

    pub action: String,

    #[serde(default)]
    pub resource_type: Option<String>,

    #[serde(default)]
    pub resource_id: Option<String>,

    /// Free-form structured details recorded by the backend.
    #[serde(default)]
    pub details: Option<Value>,

    #[serde(default)]
    pub ip_address: Option<String>,

    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Coarse health state shared by the system and each component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
    Healthy,
    Degraded,
    Unhealthy,
    #[default]
    #[serde(other)]
    Unknown,
}

impl HealthState {
    /// Ranks states so the worst one can be picked.
    fn severity(&self) -> u8 {
        match self {
            HealthState::Healthy => 0,
            HealthState::Unknown => 1,
            HealthState::Degraded => 2,
            HealthState::Unhealthy => 3,
        }
    }

    /// Returns the more severe of two states.
    pub fn worst(self, other: HealthState) -> HealthState {
        if other.severity() > self.severity() {
            other
        } else {
            self
        }
    }
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthState::Healthy => write!(f, "healthy"),
            HealthState::Degraded => write!(f, "degraded"),
            HealthState::Unhealthy => write!(f, "unhealthy"),
            HealthState::Unknown => write!(f, "unknown"),
        }
    }
}

/// Health of one backend dependency (database, cache, mailer, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub name: String,

    #[serde(default)]
    pub status: HealthState,

    #[serde(default)]
    pub latency_ms: Option<f64>,

    #[serde(default)]
    pub message: Option<String>,
}

/// System health snapshot for the dashboard.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(remote = "Self")]
pub struct SystemHealth {
    #[serde(default)]
    pub status: HealthState,

    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub uptime_seconds: Option<u64>,

    #[serde(default)]
    pub services: Vec<ServiceHealth>,

    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub checked_at: Option<DateTime<Utc>>,
}

impl SystemHealth {
    /// Worst of the reported overall status and every component status.
    pub fn effective_status(&self) -> HealthState {
        self.services
            .iter()
            .fold(self.status, |acc, s| acc.worst(s.status))
    }

    /// Components that are not healthy.
    pub fn failing_services(&self) -> impl Iterator<Item = &ServiceHealth> {
        self.services
            .iter()
            .filter(|s| s.status != HealthState::Healthy)
    }
}

/// Delivery state of an outbound notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    #[default]
    Pending,
    Sent,
    Failed,
    #[serde(other)]
    Unknown,
}

/// An outbound notification (email, SMS, push) tracked by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self")]
pub struct Notification {
    pub id: EntityId,

    #[serde(default)]
    pub channel: String,

    #[serde(default)]
    pub recipient: Option<String>,

    #[serde(default)]
    pub subject: Option<String>,

    #[serde(default)]
    pub status: NotificationStatus,

    #[serde(default)]
    pub error_message: Option<String>,

    #[serde(default)]
    pub attempts: u32,

    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub sent_at: Option<DateTime<Utc>>,
}

/// Delivery counters for the notification monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NotificationStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub sent: u64,
    #[serde(default)]
    pub failed: u64,
    #[serde(default)]
    pub pending: u64,
}

impl NotificationStats {
    /// Share of sent notifications among those that settled, in percent.
    pub fn success_rate(&self) -> Option<f64> {
        let settled = self.sent + self.failed;
        if settled == 0 {
            None
        } else {
            Some(self.sent as f64 * 100.0 / settled as f64)
        }
    }
}

/// A grantable permission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self")]
pub struct Permission {
    pub id: EntityId,

    pub permission_name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub resource: Option<String>,

    #[serde(default)]
    pub action: Option<String>,
}

/// A role → permission grant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self")]
pub struct RolePermission {
    pub id: EntityId,

    pub role: String,

    pub permission_id: EntityId,

    #[serde(default)]
    pub permission_name: Option<String>,
}

numeric_entity!(
    Category,
    Subcategory,
    Product,
    Customer,
    AdminUser,
    AdminLog,
    Notification,
    Permission,
    RolePermission,
);

// =============================================================================
// Wire Key Fallbacks
// =============================================================================
// Older backend responses name some fields differently. Each record reads
// its canonical key first and falls back to the listed keys in order; the
// fallbacks never reach the derived field parsing, so a payload carrying
// both spellings is not a duplicate.

/// Moves the first non-null fallback into `canonical` when the canonical
/// key is missing or null, and drops every fallback key.
fn fallback_keys(fields: &mut Map<String, Value>, canonical: &str, fallbacks: &[&str]) {
    let present = fields.get(canonical).is_some_and(|value| !value.is_null());
    let mut chosen = None;
    for key in fallbacks {
        if let Some(value) = fields.remove(*key) {
            if chosen.is_none() && !value.is_null() {
                chosen = Some(value);
            }
        }
    }
    if !present {
        if let Some(value) = chosen {
            fields.insert(canonical.to_string(), value);
        }
    }
}

macro_rules! wire_keys {
    ($($ty:ident { $($canonical:literal <= [$($fallback:literal),+]),+ $(,)? })*) => {
        $(
            impl Serialize for $ty {
                fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    $ty::serialize(self, serializer)
                }
            }

            impl<'de> Deserialize<'de> for $ty {
                fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                    let mut fields = Map::<String, Value>::deserialize(deserializer)?;
                    $(fallback_keys(&mut fields, $canonical, &[$($fallback),+]);)+
                    $ty::deserialize(Value::Object(fields)).map_err(serde::de::Error::custom)
                }
            }
        )*
    };
}

wire_keys! {
    Category { "id" <= ["_id"], "category_name" <= ["name"] }
    Subcategory { "id" <= ["_id"], "subcategory_name" <= ["name"] }
    Product { "id" <= ["_id"], "stock_quantity" <= ["stock"] }
    Customer { "id" <= ["_id"] }
    AdminUser { "id" <= ["_id"] }
    AdminSession { "id" <= ["_id", "session_id"] }
    AdminLog { "id" <= ["_id"] }
    SystemHealth { "services" <= ["components"] }
    Notification { "id" <= ["_id"] }
    Permission { "id" <= ["_id", "permission_id"], "permission_name" <= ["name"] }
    RolePermission { "id" <= ["_id"] }
}

// =============================================================================
// Request Payloads
// =============================================================================
// `None` fields are skipped so an update only carries what changed.

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewCategory {
    pub category_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewSubcategory {
    pub category_id: EntityId,
    pub subcategory_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubcategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    pub stock_quantity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewPermission {
    pub permission_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PermissionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

/// Body of a role → permission grant request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub role: String,
    pub permission_id: EntityId,
}

// =============================================================================
// List Filters
// =============================================================================
// Every field is optional; unset fields never reach the query string.

/// Server-side sort orders offered by the product list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    #[default]
    Newest,
    Oldest,
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductFilters {
    pub search: Option<String>,
    pub category_id: Option<EntityId>,
    pub subcategory_id: Option<EntityId>,
    pub status: Option<ProductStatus>,
    pub sort_by: Option<ProductSort>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerFilters {
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminLogFilters {
    pub admin_id: Option<EntityId>,
    pub action: Option<String>,
    pub resource_type: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationFilters {
    pub status: Option<NotificationStatus>,
    pub channel: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

// =============================================================================
// Paging
// =============================================================================

/// One page of a server-paged list.
///
/// `items` also accepts the resource-named key the backend uses
/// (`products`, `logs`, `notifications`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(alias = "products", alias = "logs", alias = "notifications")]
    pub items: Vec<T>,

    #[serde(default)]
    pub total: u64,

    #[serde(default = "first_page")]
    pub page: u32,

    #[serde(default)]
    pub limit: u32,

    #[serde(default)]
    pub total_pages: u32,
}

fn first_page() -> u32 {
    1
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Page {
            items: Vec::new(),
            total: 0,
            page: 1,
            limit: 0,
            total_pages: 0,
        }
    }
}

impl<T> Page<T> {
    /// Wraps a bare list returned without paging metadata.
    pub fn from_items(items: Vec<T>) -> Self {
        let total = items.len() as u64;
        Page {
            limit: items.len() as u32,
            total_pages: if items.is_empty() { 0 } else { 1 },
            items,
            total,
            page: 1,
        }
    }

    /// Returns true if a later page exists.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Returns true if an earlier page exists.
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_permission_id_aliases() {
        let a: Permission =
            serde_json::from_value(json!({ "id": 1, "permission_name": "products.read" })).unwrap();
        let b: Permission =
            serde_json::from_value(json!({ "_id": 2, "permission_name": "products.write" }))
                .unwrap();
        let c: Permission =
            serde_json::from_value(json!({ "permission_id": 3, "name": "users.manage" })).unwrap();
        assert_eq!((a.entity_id(), b.entity_id(), c.entity_id()), (1, 2, 3));
        assert_eq!(c.permission_name, "users.manage");

        // Canonical field on output
        let out = serde_json::to_value(&c).unwrap();
        assert_eq!(out["id"], json!(3));
        assert!(out.get("permission_id").is_none());
    }

    #[test]
    fn test_canonical_key_wins_over_fallbacks() {
        let both: Permission = serde_json::from_value(json!({
            "id": 3,
            "permission_id": 3,
            "permission_name": "products.write"
        }))
        .unwrap();
        assert_eq!(both.entity_id(), 3);

        let disagree: Permission = serde_json::from_value(json!({
            "id": 4,
            "permission_id": 9,
            "permission_name": "users.manage",
            "name": "ignored"
        }))
        .unwrap();
        assert_eq!(disagree.entity_id(), 4);
        assert_eq!(disagree.permission_name, "users.manage");

        // `_id` comes before `permission_id`
        let legacy: Permission =
            serde_json::from_value(json!({ "_id": 7, "permission_id": 8, "name": "x" })).unwrap();
        assert_eq!(legacy.entity_id(), 7);

        let category: Category = serde_json::from_value(json!({
            "id": 1,
            "_id": 1,
            "category_name": "Books",
            "name": "Other"
        }))
        .unwrap();
        assert_eq!(category.id, 1);
        assert_eq!(category.category_name, "Books");

        // A real `permission_id` on a grant is not an identifier
        let grant: RolePermission = serde_json::from_value(json!({
            "id": 12,
            "_id": 99,
            "role": "editor",
            "permission_id": 3
        }))
        .unwrap();
        assert_eq!((grant.id, grant.permission_id), (12, 3));
    }

    #[test]
    fn test_subcategory_accepts_short_name() {
        let sub: Subcategory =
            serde_json::from_value(json!({ "id": 5, "category_id": 1, "name": "Laptops" })).unwrap();
        assert_eq!(sub.subcategory_name, "Laptops");
        assert!(sub.is_active);
    }

    #[test]
    fn test_product_status_unknown_value() {
        let product: Product = serde_json::from_value(json!({
            "id": 1,
            "name": "Desk Lamp",
            "price": 24.5,
            "status": "archived"
        }))
        .unwrap();
        assert_eq!(product.status, ProductStatus::Unknown);
        assert_eq!(product.stock_quantity, 0);
    }

    #[test]
    fn test_naive_timestamp_read_as_utc() {
        let category: Category = serde_json::from_value(json!({
            "id": 1,
            "category_name": "Books",
            "created_at": "2024-03-01T10:15:00"
        }))
        .unwrap();
        let created = category.created_at.unwrap();
        assert_eq!(created.to_rfc3339(), "2024-03-01T10:15:00+00:00");

        assert!(timestamp::parse("2024-03-01T10:15:00Z").is_some());
        assert!(timestamp::parse("yesterday").is_none());
    }

    #[test]
    fn test_update_skips_unset_fields() {
        let update = CategoryUpdate {
            description: Some("Paper and e-books".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({ "description": "Paper and e-books" })
        );
    }

    #[test]
    fn test_page_accepts_resource_key() {
        let page: Page<Product> = serde_json::from_value(json!({
            "products": [{ "id": 1, "name": "Mug", "price": 8.0 }],
            "total": 31,
            "page": 2,
            "limit": 10,
            "total_pages": 4
        }))
        .unwrap();
        assert_eq!(page.items.len(), 1);
        assert!(page.has_next());
        assert!(page.has_previous());
    }

    #[test]
    fn test_health_effective_status() {
        let health: SystemHealth = serde_json::from_value(json!({
            "status": "healthy",
            "services": [
                { "name": "database", "status": "healthy" },
                { "name": "cache", "status": "degraded" }
            ]
        }))
        .unwrap();
        assert_eq!(health.effective_status(), HealthState::Degraded);
        assert_eq!(health.failing_services().count(), 1);
    }

    #[test]
    fn test_notification_success_rate() {
        let stats = NotificationStats {
            total: 10,
            sent: 6,
            failed: 2,
            pending: 2,
        };
        assert_eq!(stats.success_rate(), Some(75.0));
        assert_eq!(NotificationStats::default().success_rate(), None);
    }
}
