//! Category and subcategory endpoints (`/categories`).

use emporium_core::{
    ApiResult, Category, CategoryUpdate, EntityId, NewCategory, NewSubcategory, Subcategory,
    SubcategoryUpdate,
};

use crate::client::{ApiClient, ApiRequest};

const FETCH_CATEGORIES_FAILED: &str = "Failed to fetch categories";
const FETCH_CATEGORY_FAILED: &str = "Failed to fetch category";
const CREATE_CATEGORY_FAILED: &str = "Failed to create category";
const UPDATE_CATEGORY_FAILED: &str = "Failed to update category";
const DELETE_CATEGORY_FAILED: &str = "Failed to delete category";
const FETCH_SUBCATEGORIES_FAILED: &str = "Failed to fetch subcategories";
const CREATE_SUBCATEGORY_FAILED: &str = "Failed to create subcategory";
const UPDATE_SUBCATEGORY_FAILED: &str = "Failed to update subcategory";
const DELETE_SUBCATEGORY_FAILED: &str = "Failed to delete subcategory";

const SUBCATEGORIES: &str = "/categories/subcategories";

// =============================================================================
// Categories
// =============================================================================

pub async fn list_categories(client: &ApiClient) -> ApiResult<Vec<Category>> {
    client
        .list(ApiRequest::get("/categories"), FETCH_CATEGORIES_FAILED)
        .await
}

pub async fn get_category(client: &ApiClient, id: EntityId) -> ApiResult<Option<Category>> {
    client
        .one(ApiRequest::get(format!("/categories/{}", id)), FETCH_CATEGORY_FAILED)
        .await
}

pub async fn create_category(
    client: &ApiClient,
    payload: &NewCategory,
) -> ApiResult<Option<Category>> {
    client
        .one(
            ApiRequest::post("/categories").validated(payload),
            CREATE_CATEGORY_FAILED,
        )
        .await
}

pub async fn update_category(
    client: &ApiClient,
    id: EntityId,
    payload: &CategoryUpdate,
) -> ApiResult<Option<Category>> {
    client
        .one(
            ApiRequest::put(format!("/categories/{}", id)).validated(payload),
            UPDATE_CATEGORY_FAILED,
        )
        .await
}

pub async fn delete_category(client: &ApiClient, id: EntityId) -> ApiResult<()> {
    client
        .command(
            ApiRequest::delete(format!("/categories/{}", id)),
            DELETE_CATEGORY_FAILED,
        )
        .await
}

// =============================================================================
// Subcategories
// =============================================================================

/// Lists subcategories, optionally only those of one category.
pub async fn list_subcategories(
    client: &ApiClient,
    category_id: Option<EntityId>,
) -> ApiResult<Vec<Subcategory>> {
    client
        .list(
            ApiRequest::get(SUBCATEGORIES).param("category_id", category_id),
            FETCH_SUBCATEGORIES_FAILED,
        )
        .await
}

pub async fn create_subcategory(
    client: &ApiClient,
    payload: &NewSubcategory,
) -> ApiResult<Option<Subcategory>> {
    client
        .one(
            ApiRequest::post(SUBCATEGORIES).validated(payload),
            CREATE_SUBCATEGORY_FAILED,
        )
        .await
}

pub async fn update_subcategory(
    client: &ApiClient,
    id: EntityId,
    payload: &SubcategoryUpdate,
) -> ApiResult<Option<Subcategory>> {
    client
        .one(
            ApiRequest::put(format!("{}/{}", SUBCATEGORIES, id)).validated(payload),
            UPDATE_SUBCATEGORY_FAILED,
        )
        .await
}

pub async fn delete_subcategory(client: &ApiClient, id: EntityId) -> ApiResult<()> {
    client
        .command(
            ApiRequest::delete(format!("{}/{}", SUBCATEGORIES, id)),
            DELETE_SUBCATEGORY_FAILED,
        )
        .await
}
