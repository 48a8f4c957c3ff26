//! Customer endpoints (`/customers`).

use emporium_core::{ApiResult, Customer, CustomerFilters, CustomerUpdate, EntityId, NewCustomer};

use crate::client::{ApiClient, ApiRequest};

const FETCH_CUSTOMERS_FAILED: &str = "Failed to fetch customers";
const FETCH_CUSTOMER_FAILED: &str = "Failed to fetch customer";
const CREATE_CUSTOMER_FAILED: &str = "Failed to create customer";
const UPDATE_CUSTOMER_FAILED: &str = "Failed to update customer";
const DELETE_CUSTOMER_FAILED: &str = "Failed to delete customer";

/// Lists customers. The customer screen filters client-side, so callers
/// usually pass `CustomerFilters::default()` and fetch everything.
pub async fn list_customers(
    client: &ApiClient,
    filters: &CustomerFilters,
) -> ApiResult<Vec<Customer>> {
    client
        .list(
            ApiRequest::get("/customers").filters(filters),
            FETCH_CUSTOMERS_FAILED,
        )
        .await
}

pub async fn get_customer(client: &ApiClient, id: EntityId) -> ApiResult<Option<Customer>> {
    client
        .one(ApiRequest::get(format!("/customers/{}", id)), FETCH_CUSTOMER_FAILED)
        .await
}

pub async fn create_customer(
    client: &ApiClient,
    payload: &NewCustomer,
) -> ApiResult<Option<Customer>> {
    client
        .one(
            ApiRequest::post("/customers").validated(payload),
            CREATE_CUSTOMER_FAILED,
        )
        .await
}

pub async fn update_customer(
    client: &ApiClient,
    id: EntityId,
    payload: &CustomerUpdate,
) -> ApiResult<Option<Customer>> {
    client
        .one(
            ApiRequest::put(format!("/customers/{}", id)).validated(payload),
            UPDATE_CUSTOMER_FAILED,
        )
        .await
}

pub async fn delete_customer(client: &ApiClient, id: EntityId) -> ApiResult<()> {
    client
        .command(
            ApiRequest::delete(format!("/customers/{}", id)),
            DELETE_CUSTOMER_FAILED,
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::scripted_client;
    use crate::transport::{HttpResponse, Method};
    use serde_json::json;

    #[tokio::test]
    async fn test_list_customers_strips_unset_filters() {
        let (client, transport) = scripted_client();
        transport.respond(
            Method::Get,
            "/customers",
            HttpResponse::ok(json!({
                "success": true,
                "data": [{ "id": 1, "first_name": "Ana", "last_name": "Ruiz", "email": "ana@shop.test" }]
            })),
        );

        let filters = CustomerFilters {
            search: Some(String::new()),
            is_active: Some(true),
        };
        let result = list_customers(&client, &filters).await;
        assert!(result.success);
        assert_eq!(result.data[0].full_name(), "Ana Ruiz");

        let request = transport.last_request().unwrap();
        assert_eq!(
            request.query.pairs(),
            &[("is_active".to_string(), "true".to_string())]
        );
    }

    #[tokio::test]
    async fn test_get_customer_not_found_uses_detail() {
        let (client, transport) = scripted_client();
        transport.respond(
            Method::Get,
            "/customers/99",
            HttpResponse::json(404, json!({ "detail": "Customer not found" })),
        );

        let result = get_customer(&client, 99).await;
        assert!(!result.success);
        assert_eq!(result.data, None);
        assert_eq!(result.message(), Some("Customer not found"));
    }

    #[tokio::test]
    async fn test_create_customer_rejects_bad_email_locally() {
        let (client, transport) = scripted_client();
        let payload = NewCustomer {
            first_name: "Ana".to_string(),
            last_name: "Ruiz".to_string(),
            email: "ana-at-shop".to_string(),
            ..Default::default()
        };

        let result = create_customer(&client, &payload).await;
        assert!(!result.success);
        assert!(result.message().unwrap().starts_with("email has invalid format"));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_update_customer_sends_partial_body() {
        let (client, transport) = scripted_client();
        transport.respond(
            Method::Put,
            "/customers/5",
            HttpResponse::ok(json!({
                "success": true,
                "data": { "id": 5, "first_name": "Ana", "email": "ana@shop.test", "is_active": false }
            })),
        );

        let update = CustomerUpdate {
            is_active: Some(false),
            ..Default::default()
        };
        let result = update_customer(&client, 5, &update).await;
        assert!(result.success);
        assert!(!result.data.unwrap().is_active);
        assert_eq!(
            transport.last_request().unwrap().body,
            Some(json!({ "is_active": false }))
        );
    }
}
