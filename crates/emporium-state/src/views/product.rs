//! # Product List Screen
//!
//! Server-driven: each filter, sort or page change becomes a new query and
//! the store holds exactly the page the backend returned.

use emporium_core::{
    ApiResult, EntityId, Page, Product, ProductFilters, ProductSort, ProductStatus,
};

use crate::store::PageInfo;
use crate::stores::ProductStore;
use crate::views::actions::{Confirm, DeleteOutcome, RowActions};
use crate::views::list::ServerFilteredList;

/// Everything the product screen renders.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductScreen {
    pub products: Vec<Product>,
    pub info: PageInfo,
    pub deleting: Vec<EntityId>,
    pub loading: bool,
    pub error: Option<String>,
}

pub struct ProductListView {
    store: ProductStore,
    list: ServerFilteredList<ProductFilters>,
    rows: RowActions<EntityId>,
}

impl ProductListView {
    pub fn new(store: ProductStore, page_size: u32) -> Self {
        ProductListView {
            store,
            list: ServerFilteredList::new(page_size),
            rows: RowActions::new(),
        }
    }

    pub fn store(&self) -> &ProductStore {
        &self.store
    }

    pub fn filters(&self) -> &ProductFilters {
        self.list.filters()
    }

    pub async fn load(&self) -> ApiResult<Page<Product>> {
        self.list.apply(&self.store).await
    }

    /// Re-runs the last query the store actually sent.
    pub async fn retry(&self) -> ApiResult<Page<Product>> {
        self.store.refresh().await
    }

    /// Changes several filters at once and fetches `page` of the result.
    pub async fn query(
        &mut self,
        change: impl FnOnce(&mut ProductFilters),
        page: u32,
    ) -> ApiResult<Page<Product>> {
        self.list.update(change);
        self.list.set_page(page);
        self.load().await
    }

    pub async fn set_search(&mut self, text: &str) -> ApiResult<Page<Product>> {
        let search = Some(text.trim().to_string()).filter(|s| !s.is_empty());
        self.list.update(|f| f.search = search);
        self.load().await
    }

    pub async fn set_category(
        &mut self,
        category_id: Option<EntityId>,
    ) -> ApiResult<Page<Product>> {
        self.list.update(|f| {
            f.category_id = category_id;
            f.subcategory_id = None;
        });
        self.load().await
    }

    pub async fn set_subcategory(
        &mut self,
        subcategory_id: Option<EntityId>,
    ) -> ApiResult<Page<Product>> {
        self.list.update(|f| f.subcategory_id = subcategory_id);
        self.load().await
    }

    pub async fn set_status(&mut self, status: Option<ProductStatus>) -> ApiResult<Page<Product>> {
        self.list.update(|f| f.status = status);
        self.load().await
    }

    pub async fn set_sort(&mut self, sort: ProductSort) -> ApiResult<Page<Product>> {
        self.list.update(|f| f.sort_by = Some(sort));
        self.load().await
    }

    pub async fn set_page(&mut self, page: u32) -> ApiResult<Page<Product>> {
        self.list.set_page(page);
        self.load().await
    }

    /// Returns `None` when already on the last page.
    pub async fn next_page(&mut self) -> Option<ApiResult<Page<Product>>> {
        let total_pages = self.store.page_info().total_pages;
        if self.list.next_page(total_pages) {
            Some(self.load().await)
        } else {
            None
        }
    }

    pub async fn previous_page(&mut self) -> Option<ApiResult<Page<Product>>> {
        if self.list.previous_page() {
            Some(self.load().await)
        } else {
            None
        }
    }

    pub fn screen(&self) -> ProductScreen {
        let state = self.store.products().snapshot();
        let deleting = state
            .items
            .iter()
            .map(|p| p.id)
            .filter(|id| self.rows.is_in_flight(id))
            .collect();

        ProductScreen {
            products: state.items,
            info: state.meta.info,
            deleting,
            loading: state.loading,
            error: state.error,
        }
    }

    pub async fn change_status(
        &self,
        id: EntityId,
        status: ProductStatus,
    ) -> ApiResult<Option<Product>> {
        self.store.update_product_status(id, status).await
    }

    pub async fn delete(&self, id: EntityId, confirm: &dyn Confirm) -> DeleteOutcome {
        let name = self
            .store
            .products()
            .read(|state| state.find(&id).map(|p| p.name.clone()))
            .unwrap_or_else(|| format!("#{}", id));
        let prompt = format!("Delete product \"{}\"?", name);

        let store = &self.store;
        self.rows
            .delete_with_confirmation(id, &prompt, confirm, |id| store.delete_product(id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{envelope, scripted_client};
    use emporium_client::Method;
    use serde_json::json;

    fn page(page: u32) -> serde_json::Value {
        json!({
            "items": [{ "id": page, "name": format!("Item {}", page), "price": 1.0 }],
            "total": 3,
            "page": page,
            "limit": 1,
            "total_pages": 3
        })
    }

    #[tokio::test]
    async fn test_filter_change_returns_to_first_page() {
        let (client, transport) = scripted_client();
        for n in [1, 2, 1] {
            transport.respond(Method::Get, "/products", envelope(page(n)));
        }

        let mut view = ProductListView::new(ProductStore::new(client), 1);
        view.load().await;
        assert!(view.next_page().await.is_some());
        assert_eq!(view.screen().info.page, 2);

        view.set_search("  item ").await;
        let request = transport.last_request().unwrap();
        assert_eq!(request.query.get("page"), Some("1"));
        assert_eq!(request.query.get("search"), Some("item"));
        assert_eq!(view.screen().products[0].id, 1);
    }

    #[tokio::test]
    async fn test_blank_search_is_not_sent() {
        let (client, transport) = scripted_client();
        transport.respond(Method::Get, "/products", envelope(page(1)));

        let mut view = ProductListView::new(ProductStore::new(client), 1);
        view.set_search("   ").await;

        let request = transport.last_request().unwrap();
        assert_eq!(request.query.get("search"), None);
        assert!(view.previous_page().await.is_none());
    }
}
