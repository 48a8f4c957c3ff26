//! # Product Store
//!
//! Server-driven product list. The collection always holds exactly one
//! page as returned by the backend; paging numbers live in the slot meta.

use tracing::info;

use emporium_client::api::product_admin as api;
use emporium_client::ApiClient;
use emporium_core::{
    ApiResult, EntityId, NewProduct, Page, Product, ProductFilters, ProductStatus, ProductUpdate,
};

use crate::store::{PageInfo, PagedMeta, StoreCore};

/// State container for the product catalog screens.
#[derive(Clone)]
pub struct ProductStore {
    client: ApiClient,
    products: StoreCore<Product, PagedMeta<ProductFilters>>,
}

impl ProductStore {
    pub fn new(client: ApiClient) -> Self {
        ProductStore {
            client,
            products: StoreCore::new("products"),
        }
    }

    pub fn products(&self) -> &StoreCore<Product, PagedMeta<ProductFilters>> {
        &self.products
    }

    pub fn page_info(&self) -> PageInfo {
        self.products.read(|state| state.meta.info)
    }

    pub fn last_filters(&self) -> Option<ProductFilters> {
        self.products.read(|state| state.meta.last_filters.clone())
    }

    /// Fetches one page and remembers `filters` for [`refresh`](Self::refresh).
    pub async fn fetch_products(&self, filters: &ProductFilters) -> ApiResult<Page<Product>> {
        let guard = self.products.begin_sequenced("list");
        guard.commit(|state| state.meta.last_filters = Some(filters.clone()));

        let result = api::list_products(&self.client, filters).await;
        let committed = guard.settle(&result, |state, page| {
            state.replace_all(page.items.clone());
            state.meta.info = PageInfo::of(page);
        });
        if committed {
            info!(
                count = result.data.items.len(),
                total = result.data.total,
                page = result.data.page,
                "Products loaded"
            );
        }
        result
    }

    /// Replays the most recent list query, or the default query if none ran.
    pub async fn refresh(&self) -> ApiResult<Page<Product>> {
        let filters = self.last_filters().unwrap_or_default();
        self.fetch_products(&filters).await
    }

    pub async fn fetch_product(&self, id: EntityId) -> ApiResult<Option<Product>> {
        let guard = self.products.begin_sequenced("current");
        let result = api::get_product(&self.client, id).await;
        guard.settle(&result, |state, item| state.set_current(item.clone()));
        result
    }

    /// Appends the created product to the visible page.
    pub async fn create_product(&self, payload: &NewProduct) -> ApiResult<Option<Product>> {
        let guard = self.products.begin();
        let result = api::create_product(&self.client, payload).await;
        let committed = guard.settle(&result, |state, created| {
            if let Some(product) = created {
                state.append(product.clone());
                state.meta.info.total += 1;
            }
        });
        if committed {
            info!(name = %payload.name, "Product created");
        }
        result
    }

    pub async fn update_product(
        &self,
        id: EntityId,
        payload: &ProductUpdate,
    ) -> ApiResult<Option<Product>> {
        let guard = self.products.begin();
        let result = api::update_product(&self.client, id, payload).await;
        guard.settle(&result, |state, updated| {
            if let Some(product) = updated {
                state.replace_by_id(product.clone());
            }
        });
        result
    }

    pub async fn update_product_status(
        &self,
        id: EntityId,
        status: ProductStatus,
    ) -> ApiResult<Option<Product>> {
        let guard = self.products.begin();
        let result = api::update_product_status(&self.client, id, status).await;
        if guard.settle(&result, |state, updated| {
            if let Some(product) = updated {
                state.replace_by_id(product.clone());
            }
        }) {
            info!(id, status = %status, "Product status changed");
        }
        result
    }

    pub async fn delete_product(&self, id: EntityId) -> ApiResult<()> {
        let guard = self.products.begin();
        let result = api::delete_product(&self.client, id).await;
        guard.settle(&result, |state, _| {
            state.remove_by_id(&id);
            // The record may sit on another page; the server total still drops
            state.meta.info.total = state.meta.info.total.saturating_sub(1);
        });
        result
    }

    pub fn is_loading(&self) -> bool {
        self.products.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.products.error()
    }

    pub fn clear_error(&self) {
        self.products.clear_error();
    }

    pub fn reset(&self) {
        self.products.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{envelope, scripted_client};
    use emporium_client::{HttpResponse, Method, ScriptedTransport};
    use emporium_core::ProductSort;
    use serde_json::json;
    use std::sync::Arc;

    fn store() -> (ProductStore, Arc<ScriptedTransport>) {
        let (client, transport) = scripted_client();
        (ProductStore::new(client), transport)
    }

    fn page_body() -> serde_json::Value {
        json!({
            "products": [
                { "id": 1, "name": "Desk Lamp", "price": 24.5 },
                { "id": 2, "name": "Notebook", "price": 3.0 }
            ],
            "total": 12,
            "page": 2,
            "limit": 2,
            "total_pages": 6
        })
    }

    #[tokio::test]
    async fn test_fetch_products_keeps_page_info() {
        let (store, transport) = store();
        transport.respond(Method::Get, "/products", envelope(page_body()));

        let filters = ProductFilters {
            page: Some(2),
            limit: Some(2),
            ..Default::default()
        };
        assert!(store.fetch_products(&filters).await.success);

        let info = store.page_info();
        assert_eq!(info.total, 12);
        assert_eq!(info.page, 2);
        assert!(info.has_next());
        assert!(info.has_previous());
        assert_eq!(store.products().snapshot().items.len(), 2);
    }

    #[tokio::test]
    async fn test_refresh_replays_last_filters() {
        let (store, transport) = store();
        transport.respond(Method::Get, "/products", envelope(page_body()));
        transport.respond(Method::Get, "/products", envelope(page_body()));

        let filters = ProductFilters {
            search: Some("lamp".to_string()),
            sort_by: Some(ProductSort::PriceAsc),
            ..Default::default()
        };
        store.fetch_products(&filters).await;
        store.refresh().await;

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].query, requests[1].query);
        assert_eq!(store.last_filters(), Some(filters));
    }

    #[tokio::test]
    async fn test_create_and_delete_adjust_total() {
        let (store, transport) = store();
        transport.respond(Method::Get, "/products", envelope(page_body()));
        transport.respond(
            Method::Post,
            "/products",
            envelope(json!({ "id": 3, "name": "Stapler", "price": 9.0 })),
        );
        transport.respond(Method::Delete, "/products/1", HttpResponse::empty(204));

        store.fetch_products(&ProductFilters::default()).await;
        let payload = NewProduct {
            name: "Stapler".to_string(),
            price: 9.0,
            stock_quantity: 4,
            ..Default::default()
        };
        assert!(store.create_product(&payload).await.success);
        assert_eq!(store.page_info().total, 13);

        assert!(store.delete_product(1).await.success);
        let state = store.products().snapshot();
        let ids: Vec<_> = state.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(state.meta.info.total, 12);
    }

    #[tokio::test]
    async fn test_delete_off_page_product_still_drops_total() {
        let (store, transport) = store();
        transport.respond(Method::Get, "/products", envelope(page_body()));
        transport.respond(
            Method::Get,
            "/products/5",
            envelope(json!({ "id": 5, "name": "Globe", "price": 40.0 })),
        );
        transport.respond(Method::Delete, "/products/5", HttpResponse::empty(204));

        store.fetch_products(&ProductFilters::default()).await;
        assert!(store.fetch_product(5).await.success);
        assert!(store.delete_product(5).await.success);

        let state = store.products().snapshot();
        assert!(state.current.is_none());
        assert_eq!(state.items.len(), 2);
        assert_eq!(state.meta.info.total, 11);
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_total() {
        let (store, transport) = store();
        transport.respond(Method::Get, "/products", envelope(page_body()));
        transport.respond(
            Method::Delete,
            "/products/9",
            HttpResponse::json(404, json!({ "success": false, "message": "Product not found" })),
        );

        store.fetch_products(&ProductFilters::default()).await;
        assert!(!store.delete_product(9).await.success);
        assert_eq!(store.page_info().total, 12);
    }

    #[tokio::test]
    async fn test_status_change_replaces_record() {
        let (store, transport) = store();
        transport.respond(Method::Get, "/products", envelope(page_body()));
        transport.respond(
            Method::Put,
            "/products/2/status",
            envelope(json!({ "id": 2, "name": "Notebook", "price": 3.0, "status": "draft" })),
        );

        store.fetch_products(&ProductFilters::default()).await;
        let result = store.update_product_status(2, ProductStatus::Draft).await;

        assert!(result.success);
        let state = store.products().snapshot();
        assert_eq!(state.items[1].status, ProductStatus::Draft);
    }
}
