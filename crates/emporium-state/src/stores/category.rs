//! # Category Store
//!
//! Categories and subcategories, plus the subcategory grouping index.
//!
//! ## Grouping Index
//! ```text
//! subcategories.items ──► group_subcategories() ──► subcategories.meta
//!   (flat, server order)                            BTreeMap<category_id,
//!                                                         Vec<Subcategory>>
//! ```
//! The index is rebuilt from the flat collection after every change to it,
//! under the same write lock, so the two can never disagree.

use std::collections::BTreeMap;

use tracing::info;

use emporium_client::api::category as api;
use emporium_client::ApiClient;
use emporium_core::listing::group_subcategories;
use emporium_core::{
    ApiResult, Category, CategoryUpdate, EntityId, NewCategory, NewSubcategory, Subcategory,
    SubcategoryUpdate,
};

use crate::store::{FeatureState, StoreCore};

/// Subcategories keyed by parent category id.
pub type SubcategoryIndex = BTreeMap<EntityId, Vec<Subcategory>>;

type SubcategoryState = FeatureState<Subcategory, SubcategoryIndex>;

fn regroup(state: &mut SubcategoryState) {
    state.meta = group_subcategories(&state.items);
}

/// State container for the catalog structure screens.
#[derive(Clone)]
pub struct CategoryStore {
    client: ApiClient,
    categories: StoreCore<Category>,
    subcategories: StoreCore<Subcategory, SubcategoryIndex>,
}

impl CategoryStore {
    pub fn new(client: ApiClient) -> Self {
        CategoryStore {
            client,
            categories: StoreCore::new("categories"),
            subcategories: StoreCore::new("subcategories"),
        }
    }

    pub fn categories(&self) -> &StoreCore<Category> {
        &self.categories
    }

    pub fn subcategories(&self) -> &StoreCore<Subcategory, SubcategoryIndex> {
        &self.subcategories
    }

    /// Clones the current grouping index.
    pub fn grouped(&self) -> SubcategoryIndex {
        self.subcategories.read(|state| state.meta.clone())
    }

    /// Subcategories of one category, in server order.
    pub fn subcategories_of(&self, category_id: EntityId) -> Vec<Subcategory> {
        self.subcategories
            .read(|state| state.meta.get(&category_id).cloned().unwrap_or_default())
    }

    // =========================================================================
    // Categories
    // =========================================================================

    pub async fn fetch_categories(&self) -> ApiResult<Vec<Category>> {
        let guard = self.categories.begin_sequenced("list");
        let result = api::list_categories(&self.client).await;
        if guard.settle(&result, |state, items| state.replace_all(items.clone())) {
            info!(count = result.data.len(), "Categories loaded");
        }
        result
    }

    pub async fn fetch_category(&self, id: EntityId) -> ApiResult<Option<Category>> {
        let guard = self.categories.begin_sequenced("current");
        let result = api::get_category(&self.client, id).await;
        guard.settle(&result, |state, item| state.set_current(item.clone()));
        result
    }

    pub async fn create_category(&self, payload: &NewCategory) -> ApiResult<Option<Category>> {
        let guard = self.categories.begin();
        let result = api::create_category(&self.client, payload).await;
        let committed = guard.settle(&result, |state, created| {
            if let Some(category) = created {
                state.append(category.clone());
            }
        });
        if committed {
            info!(name = %payload.category_name, "Category created");
        }
        result
    }

    pub async fn update_category(
        &self,
        id: EntityId,
        payload: &CategoryUpdate,
    ) -> ApiResult<Option<Category>> {
        let guard = self.categories.begin();
        let result = api::update_category(&self.client, id, payload).await;
        guard.settle(&result, |state, updated| {
            if let Some(category) = updated {
                state.replace_by_id(category.clone());
            }
        });
        result
    }

    pub async fn delete_category(&self, id: EntityId) -> ApiResult<()> {
        let guard = self.categories.begin();
        let result = api::delete_category(&self.client, id).await;
        if guard.settle(&result, |state, _| {
            state.remove_by_id(&id);
        }) {
            info!(id, "Category deleted");
        }
        result
    }

    // =========================================================================
    // Subcategories
    // =========================================================================

    /// Fetches subcategories, optionally for one category only.
    ///
    /// The result replaces the whole collection either way.
    pub async fn fetch_subcategories(
        &self,
        category_id: Option<EntityId>,
    ) -> ApiResult<Vec<Subcategory>> {
        let guard = self.subcategories.begin_sequenced("list");
        let result = api::list_subcategories(&self.client, category_id).await;
        let committed = guard.settle(&result, |state, items| {
            state.replace_all(items.clone());
            regroup(state);
        });
        if committed {
            info!(
                count = result.data.len(),
                groups = self.subcategories.read(|s| s.meta.len()),
                "Subcategories loaded"
            );
        }
        result
    }

    pub async fn create_subcategory(
        &self,
        payload: &NewSubcategory,
    ) -> ApiResult<Option<Subcategory>> {
        let guard = self.subcategories.begin();
        let result = api::create_subcategory(&self.client, payload).await;
        guard.settle(&result, |state, created| {
            if let Some(subcategory) = created {
                state.append(subcategory.clone());
                regroup(state);
            }
        });
        result
    }

    pub async fn update_subcategory(
        &self,
        id: EntityId,
        payload: &SubcategoryUpdate,
    ) -> ApiResult<Option<Subcategory>> {
        let guard = self.subcategories.begin();
        let result = api::update_subcategory(&self.client, id, payload).await;
        guard.settle(&result, |state, updated| {
            if let Some(subcategory) = updated {
                state.replace_by_id(subcategory.clone());
                regroup(state);
            }
        });
        result
    }

    pub async fn delete_subcategory(&self, id: EntityId) -> ApiResult<()> {
        let guard = self.subcategories.begin();
        let result = api::delete_subcategory(&self.client, id).await;
        guard.settle(&result, |state, _| {
            state.remove_by_id(&id);
            regroup(state);
        });
        result
    }

    // =========================================================================
    // Status
    // =========================================================================

    pub fn is_loading(&self) -> bool {
        self.categories.is_loading() || self.subcategories.is_loading()
    }

    /// First error of either slice, categories first.
    pub fn error(&self) -> Option<String> {
        self.categories.error().or_else(|| self.subcategories.error())
    }

    pub fn clear_error(&self) {
        self.categories.clear_error();
        self.subcategories.clear_error();
    }

    pub fn reset(&self) {
        self.categories.reset();
        self.subcategories.reset();
    }
}
