//! # Category List Screen
//!
//! Client-driven: both collections are fetched whole, then searched,
//! filtered, sorted and paged locally on every [`CategoryListView::screen`]
//! call. Each row can be expanded to show its subcategories from the
//! grouping index.

use std::collections::BTreeSet;

use emporium_core::listing::{CategorySortKey, StatusFilter};
use emporium_core::{ApiResult, Category, EntityId, Subcategory};

use crate::stores::CategoryStore;
use crate::views::actions::{Confirm, DeleteOutcome, RowActions};
use crate::views::list::ClientFilteredList;

/// One visible category row.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRow {
    pub category: Category,
    pub subcategories: Vec<Subcategory>,
    pub expanded: bool,
    /// A delete for this row is outstanding.
    pub deleting: bool,
}

/// Everything the category screen renders.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryScreen {
    pub rows: Vec<CategoryRow>,
    /// Matches across all pages.
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
    pub loading: bool,
    pub error: Option<String>,
}

pub struct CategoryListView {
    store: CategoryStore,
    list: ClientFilteredList<CategorySortKey>,
    expanded: BTreeSet<EntityId>,
    rows: RowActions<EntityId>,
}

impl CategoryListView {
    pub fn new(store: CategoryStore, page_size: usize) -> Self {
        CategoryListView {
            store,
            list: ClientFilteredList::new(page_size),
            expanded: BTreeSet::new(),
            rows: RowActions::new(),
        }
    }

    pub fn store(&self) -> &CategoryStore {
        &self.store
    }

    pub fn list(&self) -> &ClientFilteredList<CategorySortKey> {
        &self.list
    }

    /// Initial load: categories and all subcategories, concurrently.
    ///
    /// Returns the category result; a subcategory failure shows up in the
    /// store error.
    pub async fn load(&self) -> ApiResult<Vec<Category>> {
        let (categories, _) = tokio::join!(
            self.store.fetch_categories(),
            self.store.fetch_subcategories(None)
        );
        categories
    }

    pub async fn retry(&self) -> ApiResult<Vec<Category>> {
        self.store.clear_error();
        self.load().await
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.list.set_search(text);
    }

    pub fn set_status(&mut self, status: StatusFilter) {
        self.list.set_status(status);
    }

    pub fn sort_by(&mut self, key: CategorySortKey) {
        self.list.sort_by(key);
    }

    pub fn set_page(&mut self, page: usize) {
        self.list.set_page(page);
    }

    /// Returns the new expanded state of the row.
    pub fn toggle_expanded(&mut self, id: EntityId) -> bool {
        if self.expanded.remove(&id) {
            false
        } else {
            self.expanded.insert(id);
            true
        }
    }

    pub fn is_expanded(&self, id: EntityId) -> bool {
        self.expanded.contains(&id)
    }

    pub fn screen(&self) -> CategoryScreen {
        let state = self.store.categories().snapshot();
        let grouped = self.store.grouped();
        let window = self.list.view(&state.items);

        let rows = window
            .items
            .into_iter()
            .map(|category| CategoryRow {
                subcategories: grouped.get(&category.id).cloned().unwrap_or_default(),
                expanded: self.expanded.contains(&category.id),
                deleting: self.rows.is_in_flight(&category.id),
                category,
            })
            .collect();

        CategoryScreen {
            rows,
            total: window.total,
            page: window.page,
            total_pages: window.total_pages,
            loading: self.store.is_loading(),
            error: self.store.error(),
        }
    }

    /// Asks for confirmation, then deletes the category.
    pub async fn delete(&self, id: EntityId, confirm: &dyn Confirm) -> DeleteOutcome {
        let name = self
            .store
            .categories()
            .read(|state| state.find(&id).map(|c| c.category_name.clone()))
            .unwrap_or_else(|| format!("#{}", id));
        let prompt = format!("Delete category \"{}\"? This cannot be undone.", name);

        let store = &self.store;
        self.rows
            .delete_with_confirmation(id, &prompt, confirm, |id| store.delete_category(id))
            .await
    }
}
