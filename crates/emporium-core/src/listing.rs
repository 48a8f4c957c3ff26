//! # Client-Side List Derivations
//!
//! Pure functions behind the client-driven list screens (categories,
//! customers). Every call recomputes from the full collection; nothing
//! here is cached.
//!
//! ## Pipeline
//! ```text
//! full collection ──► search ──► predicate ──► stable sort ──► page window
//!                       │            │              │               │
//!                 Searchable    status filter   SortableBy<K>   ListWindow
//! ```
//!
//! The grouping index (subcategories by parent category) lives here too:
//! it is a derivation of the flat collection, never patched in place.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::types::{Category, Customer, EntityId, Subcategory};

// =============================================================================
// Traits
// =============================================================================

/// A record that can be matched against a free-text search box.
pub trait Searchable {
    /// `needle` is already trimmed and lowercased, and never empty.
    fn matches_search(&self, needle: &str) -> bool;
}

/// A record that can be ordered by a screen-specific sort key.
pub trait SortableBy<K> {
    fn compare_by(&self, other: &Self, key: K) -> Ordering;
}

/// A record with an active/inactive flag.
pub trait HasActiveFlag {
    fn is_active(&self) -> bool;
}

/// Status dropdown on client-driven lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    /// Returns true if a record with this flag passes the filter.
    pub fn matches(self, active: bool) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => active,
            StatusFilter::Inactive => !active,
        }
    }
}

/// Sort direction toggled by clicking a column header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Flips the direction.
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

// =============================================================================
// Page Window
// =============================================================================

/// The visible slice of a client-filtered list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListWindow<T> {
    /// Records on the current page.
    pub items: Vec<T>,
    /// Records matching the filters, across all pages.
    pub total: usize,
    /// 1-based page actually shown (clamped into range).
    pub page: usize,
    pub page_size: usize,
    /// At least 1, even for an empty list.
    pub total_pages: usize,
}

impl<T> ListWindow<T> {
    /// Returns true if nothing matched.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Cuts one page out of an already filtered and sorted list.
///
/// Pages are 1-based. A page past the end is clamped to the last page,
/// and page 0 is treated as page 1. A page size of 0 shows everything.
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> ListWindow<T> {
    let total = items.len();
    let page_size = if page_size == 0 { total.max(1) } else { page_size };
    let total_pages = total.div_ceil(page_size).max(1);
    let page = page.clamp(1, total_pages);

    let items = items
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .collect();

    ListWindow {
        items,
        total,
        page,
        page_size,
        total_pages,
    }
}

/// Options for one pass of the client-side pipeline.
#[derive(Debug, Clone, Copy)]
pub struct ListOptions<'a, K> {
    pub search: &'a str,
    pub sort: Option<(K, SortDirection)>,
    pub page: usize,
    pub page_size: usize,
}

/// Runs search → predicate → stable sort → paginate over a full collection.
pub fn derive_window<T, K, P>(items: &[T], options: ListOptions<'_, K>, predicate: P) -> ListWindow<T>
where
    T: Clone + Searchable + SortableBy<K>,
    K: Copy,
    P: Fn(&T) -> bool,
{
    let needle = options.search.trim().to_lowercase();

    let mut filtered: Vec<T> = items
        .iter()
        .filter(|item| needle.is_empty() || item.matches_search(&needle))
        .filter(|item| predicate(item))
        .cloned()
        .collect();

    if let Some((key, direction)) = options.sort {
        // sort_by is stable: equal keys keep server order
        filtered.sort_by(|a, b| direction.apply(a.compare_by(b, key)));
    }

    paginate(filtered, options.page, options.page_size)
}

// =============================================================================
// Grouping
// =============================================================================

/// Groups records by a key, keeping each group in original order.
pub fn group_by<T, K, F>(items: &[T], key: F) -> BTreeMap<K, Vec<T>>
where
    T: Clone,
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut groups: BTreeMap<K, Vec<T>> = BTreeMap::new();
    for item in items {
        groups.entry(key(item)).or_default().push(item.clone());
    }
    groups
}

/// Subcategories keyed by parent category id.
///
/// ## Example
/// ```rust
/// use emporium_core::listing::group_subcategories;
/// use emporium_core::Subcategory;
///
/// let subs: Vec<Subcategory> = serde_json::from_str(r#"[
///     {"id": 1, "category_id": 1, "name": "A"},
///     {"id": 2, "category_id": 1, "name": "B"},
///     {"id": 3, "category_id": 2, "name": "C"}
/// ]"#).unwrap();
///
/// let index = group_subcategories(&subs);
/// assert_eq!(index.len(), 2);
/// assert_eq!(index[&1].len(), 2);
/// ```
pub fn group_subcategories(subcategories: &[Subcategory]) -> BTreeMap<EntityId, Vec<Subcategory>> {
    group_by(subcategories, |s| s.category_id)
}

// =============================================================================
// Screen Implementations
// =============================================================================

/// Sort keys offered by the category list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategorySortKey {
    #[default]
    Name,
    CreatedAt,
    Status,
}

impl Searchable for Category {
    fn matches_search(&self, needle: &str) -> bool {
        self.category_name.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(needle))
    }
}

impl SortableBy<CategorySortKey> for Category {
    fn compare_by(&self, other: &Self, key: CategorySortKey) -> Ordering {
        match key {
            CategorySortKey::Name => self
                .category_name
                .to_lowercase()
                .cmp(&other.category_name.to_lowercase()),
            CategorySortKey::CreatedAt => self.created_at.cmp(&other.created_at),
            CategorySortKey::Status => other.is_active.cmp(&self.is_active),
        }
    }
}

impl HasActiveFlag for Category {
    fn is_active(&self) -> bool {
        self.is_active
    }
}

impl Searchable for Subcategory {
    fn matches_search(&self, needle: &str) -> bool {
        self.subcategory_name.to_lowercase().contains(needle)
    }
}

/// Sort keys offered by the customer list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CustomerSortKey {
    #[default]
    Name,
    Email,
    TotalOrders,
    TotalSpent,
    CreatedAt,
}

impl Searchable for Customer {
    fn matches_search(&self, needle: &str) -> bool {
        self.full_name().to_lowercase().contains(needle)
            || self.email.to_lowercase().contains(needle)
            || self.phone.as_deref().is_some_and(|p| p.contains(needle))
    }
}

impl HasActiveFlag for Customer {
    fn is_active(&self) -> bool {
        self.is_active
    }
}

impl SortableBy<CustomerSortKey> for Customer {
    fn compare_by(&self, other: &Self, key: CustomerSortKey) -> Ordering {
        match key {
            CustomerSortKey::Name => self
                .full_name()
                .to_lowercase()
                .cmp(&other.full_name().to_lowercase()),
            CustomerSortKey::Email => self.email.to_lowercase().cmp(&other.email.to_lowercase()),
            CustomerSortKey::TotalOrders => self.total_orders.cmp(&other.total_orders),
            CustomerSortKey::TotalSpent => self.total_spent.total_cmp(&other.total_spent),
            CustomerSortKey::CreatedAt => self.created_at.cmp(&other.created_at),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
