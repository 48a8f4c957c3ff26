//! Product administration endpoints (`/products`).
//!
//! The product list is server-driven: filters, sort order, and paging are
//! sent as query parameters and the response is already one page.

use serde::Serialize;

use emporium_core::{
    ApiResult, EntityId, NewProduct, Page, Product, ProductFilters, ProductStatus, ProductUpdate,
};

use crate::client::{ApiClient, ApiRequest};

const FETCH_PRODUCTS_FAILED: &str = "Failed to fetch products";
const FETCH_PRODUCT_FAILED: &str = "Failed to fetch product";
const CREATE_PRODUCT_FAILED: &str = "Failed to create product";
const UPDATE_PRODUCT_FAILED: &str = "Failed to update product";
const DELETE_PRODUCT_FAILED: &str = "Failed to delete product";
const UPDATE_STATUS_FAILED: &str = "Failed to update product status";

#[derive(Serialize)]
struct StatusChange {
    status: ProductStatus,
}

/// Fetches one page of products matching `filters`.
pub async fn list_products(
    client: &ApiClient,
    filters: &ProductFilters,
) -> ApiResult<Page<Product>> {
    client
        .page(
            ApiRequest::get("/products").filters(filters),
            FETCH_PRODUCTS_FAILED,
        )
        .await
}

pub async fn get_product(client: &ApiClient, id: EntityId) -> ApiResult<Option<Product>> {
    client
        .one(ApiRequest::get(format!("/products/{}", id)), FETCH_PRODUCT_FAILED)
        .await
}

pub async fn create_product(
    client: &ApiClient,
    payload: &NewProduct,
) -> ApiResult<Option<Product>> {
    client
        .one(
            ApiRequest::post("/products").validated(payload),
            CREATE_PRODUCT_FAILED,
        )
        .await
}

pub async fn update_product(
    client: &ApiClient,
    id: EntityId,
    payload: &ProductUpdate,
) -> ApiResult<Option<Product>> {
    client
        .one(
            ApiRequest::put(format!("/products/{}", id)).validated(payload),
            UPDATE_PRODUCT_FAILED,
        )
        .await
}

pub async fn delete_product(client: &ApiClient, id: EntityId) -> ApiResult<()> {
    client
        .command(
            ApiRequest::delete(format!("/products/{}", id)),
            DELETE_PRODUCT_FAILED,
        )
        .await
}

/// Changes only the listing status (`PUT /products/{id}/status`).
pub async fn update_product_status(
    client: &ApiClient,
    id: EntityId,
    status: ProductStatus,
) -> ApiResult<Option<Product>> {
    client
        .one(
            ApiRequest::put(format!("/products/{}/status", id)).json(&StatusChange { status }),
            UPDATE_STATUS_FAILED,
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::scripted_client;
    use crate::transport::{HttpResponse, Method};
    use emporium_core::ProductSort;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_products_sends_only_set_filters() {
        let (client, transport) = scripted_client();
        transport.respond(
            Method::Get,
            "/products",
            HttpResponse::ok(json!({ "success": true, "data": { "products": [], "total": 0 } })),
        );

        let filters = ProductFilters {
            search: Some(String::new()),
            status: None,
            sort_by: Some(ProductSort::Newest),
            ..Default::default()
        };
        let result = list_products(&client, &filters).await;
        assert!(result.success);

        let request = transport.last_request().unwrap();
        assert_eq!(
            request.query.pairs(),
            &[("sort_by".to_string(), "newest".to_string())]
        );
    }

    #[tokio::test]
    async fn test_list_products_reads_page_metadata() {
        let (client, transport) = scripted_client();
        transport.respond(
            Method::Get,
            "/products",
            HttpResponse::ok(json!({
                "success": true,
                "data": {
                    "products": [{ "id": 7, "name": "Desk Lamp", "price": 24.5, "status": "active" }],
                    "total": 21,
                    "page": 3,
                    "limit": 10,
                    "total_pages": 3
                }
            })),
        );

        let filters = ProductFilters {
            page: Some(3),
            limit: Some(10),
            ..Default::default()
        };
        let result = list_products(&client, &filters).await;
        assert_eq!(result.data.total, 21);
        assert!(!result.data.has_next());
        assert_eq!(result.data.items[0].status, ProductStatus::Active);
    }

    #[tokio::test]
    async fn test_list_products_failure_defaults_to_empty_page() {
        let (client, transport) = scripted_client();
        transport.respond(Method::Get, "/products", HttpResponse::empty(500));

        let result = list_products(&client, &ProductFilters::default()).await;
        assert!(!result.success);
        assert!(result.data.items.is_empty());
        assert_eq!(result.message(), Some("Failed to fetch products"));
    }

    #[tokio::test]
    async fn test_update_product_status_body() {
        let (client, transport) = scripted_client();
        transport.respond(
            Method::Put,
            "/products/7/status",
            HttpResponse::ok(json!({ "success": true, "data": { "id": 7, "name": "Desk Lamp", "status": "draft" } })),
        );

        let result = update_product_status(&client, 7, ProductStatus::Draft).await;
        assert_eq!(result.data.unwrap().status, ProductStatus::Draft);
        assert_eq!(
            transport.last_request().unwrap().body,
            Some(json!({ "status": "draft" }))
        );
    }

    #[tokio::test]
    async fn test_create_product_negative_price_rejected_locally() {
        let (client, transport) = scripted_client();
        let payload = NewProduct {
            name: "Mug".to_string(),
            price: -2.0,
            ..Default::default()
        };

        let result = create_product(&client, &payload).await;
        assert_eq!(result.message(), Some("price must not be negative"));
        assert_eq!(transport.pending(), 0);
        assert!(transport.requests().is_empty());
    }
}
