//! # List Strategies
//!
//! The two ways a list screen turns user input into visible rows.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ClientFilteredList<K>                ServerFilteredList<F>             │
//! │  ─────────────────────                ─────────────────────             │
//! │  full collection in the store         one page in the store             │
//! │           │                                    ▲                        │
//! │  search ► status ► sort ► page        filters ─┘ sent as query params   │
//! │           │                                                             │
//! │  ListWindow<T>, recomputed per call   Page<T> as returned               │
//! │                                                                         │
//! │  categories, customers                products, audit log,             │
//! │                                       notifications                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Totals differ between the two: a post-filter local count on the left,
//! the server's total on the right.

use async_trait::async_trait;

use emporium_core::listing::{
    derive_window, HasActiveFlag, ListOptions, ListWindow, Searchable, SortDirection, SortableBy,
    StatusFilter,
};
use emporium_core::{
    AdminLog, AdminLogFilters, ApiResult, Notification, NotificationFilters, Page, Product,
    ProductFilters, DEFAULT_PAGE_SIZE,
};

use crate::stores::{ProductStore, SystemStore};

// =============================================================================
// Client-Driven
// =============================================================================

/// Screen-local search/status/sort/page state over a full collection.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientFilteredList<K> {
    search: String,
    status: StatusFilter,
    sort: Option<(K, SortDirection)>,
    page: usize,
    page_size: usize,
}

impl<K: Copy + PartialEq> Default for ClientFilteredList<K> {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl<K: Copy + PartialEq> ClientFilteredList<K> {
    pub fn new(page_size: usize) -> Self {
        ClientFilteredList {
            search: String::new(),
            status: StatusFilter::All,
            sort: None,
            page: 1,
            page_size,
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn status(&self) -> StatusFilter {
        self.status
    }

    pub fn sort(&self) -> Option<(K, SortDirection)> {
        self.sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
        self.page = 1;
    }

    pub fn set_status(&mut self, status: StatusFilter) {
        self.status = status;
        self.page = 1;
    }

    /// Clicking the active column flips direction; any other column
    /// starts ascending.
    pub fn sort_by(&mut self, key: K) {
        self.sort = match self.sort {
            Some((current, direction)) if current == key => Some((key, direction.toggled())),
            _ => Some((key, SortDirection::Ascending)),
        };
        self.page = 1;
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    /// Out-of-range pages are clamped by [`view`](Self::view).
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size;
        self.page = 1;
    }

    /// Derives the visible window from the full collection.
    pub fn view<T>(&self, items: &[T]) -> ListWindow<T>
    where
        T: Clone + Searchable + SortableBy<K> + HasActiveFlag,
    {
        let options = ListOptions {
            search: &self.search,
            sort: self.sort,
            page: self.page,
            page_size: self.page_size,
        };
        derive_window(items, options, |item| self.status.matches(item.is_active()))
    }
}

// =============================================================================
// Server-Driven
// =============================================================================

/// A filter struct with paging fields.
pub trait PagedFilters: Clone + Default + Send + Sync + 'static {
    fn page(&self) -> Option<u32>;
    fn set_page(&mut self, page: Option<u32>);
    fn set_limit(&mut self, limit: Option<u32>);
}

macro_rules! paged_filters {
    ($($ty:ty),* $(,)?) => {
        $(
            impl PagedFilters for $ty {
                fn page(&self) -> Option<u32> {
                    self.page
                }

                fn set_page(&mut self, page: Option<u32>) {
                    self.page = page;
                }

                fn set_limit(&mut self, limit: Option<u32>) {
                    self.limit = limit;
                }
            }
        )*
    };
}

paged_filters!(ProductFilters, AdminLogFilters, NotificationFilters);

/// A store action that fetches one server page for a filter struct.
#[async_trait]
pub trait PagedSource<F: PagedFilters>: Send + Sync {
    type Item: Send;

    async fn fetch_page(&self, filters: &F) -> ApiResult<Page<Self::Item>>;
}

#[async_trait]
impl PagedSource<ProductFilters> for ProductStore {
    type Item = Product;

    async fn fetch_page(&self, filters: &ProductFilters) -> ApiResult<Page<Product>> {
        self.fetch_products(filters).await
    }
}

#[async_trait]
impl PagedSource<AdminLogFilters> for SystemStore {
    type Item = AdminLog;

    async fn fetch_page(&self, filters: &AdminLogFilters) -> ApiResult<Page<AdminLog>> {
        self.fetch_admin_logs(filters).await
    }
}

#[async_trait]
impl PagedSource<NotificationFilters> for SystemStore {
    type Item = Notification;

    async fn fetch_page(&self, filters: &NotificationFilters) -> ApiResult<Page<Notification>> {
        self.fetch_notifications(filters).await
    }
}

/// Screen-local filter state whose every change is a new server query.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerFilteredList<F> {
    filters: F,
}

impl<F: PagedFilters> Default for ServerFilteredList<F> {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE as u32)
    }
}

impl<F: PagedFilters> ServerFilteredList<F> {
    pub fn new(page_size: u32) -> Self {
        let mut filters = F::default();
        filters.set_page(Some(1));
        filters.set_limit(Some(page_size));
        ServerFilteredList { filters }
    }

    pub fn filters(&self) -> &F {
        &self.filters
    }

    pub fn page(&self) -> u32 {
        self.filters.page().unwrap_or(1)
    }

    /// Changes filter fields and goes back to page 1.
    pub fn update(&mut self, change: impl FnOnce(&mut F)) {
        change(&mut self.filters);
        self.filters.set_page(Some(1));
    }

    pub fn set_page(&mut self, page: u32) {
        self.filters.set_page(Some(page.max(1)));
    }

    /// Moves forward if the last fetched page says there is one.
    pub fn next_page(&mut self, total_pages: u32) -> bool {
        let page = self.page();
        if page < total_pages {
            self.set_page(page + 1);
            true
        } else {
            false
        }
    }

    pub fn previous_page(&mut self) -> bool {
        let page = self.page();
        if page > 1 {
            self.set_page(page - 1);
            true
        } else {
            false
        }
    }

    /// Fetches the page described by the current filters.
    pub async fn apply<S: PagedSource<F>>(&self, source: &S) -> ApiResult<Page<S::Item>> {
        source.fetch_page(&self.filters).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emporium_core::listing::CustomerSortKey;
    use emporium_core::Customer;

    fn customer(id: i64, first: &str, active: bool) -> Customer {
        Customer {
            id,
            first_name: first.to_string(),
            last_name: String::new(),
            email: format!("{}@example.com", first.to_lowercase()),
            phone: None,
            is_active: active,
            total_orders: 0,
            total_spent: 0.0,
            created_at: None,
        }
    }

    #[test]
    fn test_client_list_filters_and_sorts() {
        let items = vec![
            customer(1, "Zoe", true),
            customer(2, "Adam", false),
            customer(3, "Mia", true),
        ];
        let mut list: ClientFilteredList<CustomerSortKey> = ClientFilteredList::new(10);

        list.set_status(StatusFilter::Active);
        list.sort_by(CustomerSortKey::Name);
        let window = list.view(&items);
        let names: Vec<_> = window.items.iter().map(|c| c.first_name.as_str()).collect();
        assert_eq!(names, vec!["Mia", "Zoe"]);
        assert_eq!(window.total, 2);

        list.sort_by(CustomerSortKey::Name);
        assert_eq!(list.sort(), Some((CustomerSortKey::Name, SortDirection::Descending)));
        assert_eq!(list.view(&items).items[0].first_name, "Zoe");
    }

    #[test]
    fn test_client_list_changes_reset_page() {
        let items: Vec<_> = (1..=25).map(|i| customer(i, "Sam", true)).collect();
        let mut list: ClientFilteredList<CustomerSortKey> = ClientFilteredList::new(10);

        list.set_page(3);
        assert_eq!(list.view(&items).items.len(), 5);

        list.set_search("sam");
        assert_eq!(list.page(), 1);
        assert_eq!(list.view(&items).total_pages, 3);
    }

    #[test]
    fn test_server_list_update_resets_page() {
        let mut list: ServerFilteredList<ProductFilters> = ServerFilteredList::new(20);
        assert_eq!(list.filters().limit, Some(20));

        assert!(list.next_page(4));
        assert!(list.next_page(4));
        assert_eq!(list.page(), 3);

        list.update(|f| f.search = Some("lamp".to_string()));
        assert_eq!(list.page(), 1);
        assert!(!list.previous_page());
        assert!(!list.next_page(1));
    }
}
