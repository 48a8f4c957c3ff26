//! # Customer Store
//!
//! Fetches the whole customer collection at once; the customer list
//! screen filters, sorts and pages it locally.

use tracing::info;

use emporium_client::api::customers as api;
use emporium_client::ApiClient;
use emporium_core::{
    ApiResult, Customer, CustomerFilters, CustomerUpdate, EntityId, NewCustomer,
};

use crate::store::StoreCore;

/// State container for the customer screens.
#[derive(Clone)]
pub struct CustomerStore {
    client: ApiClient,
    customers: StoreCore<Customer>,
}

impl CustomerStore {
    pub fn new(client: ApiClient) -> Self {
        CustomerStore {
            client,
            customers: StoreCore::new("customers"),
        }
    }

    pub fn customers(&self) -> &StoreCore<Customer> {
        &self.customers
    }

    pub async fn fetch_customers(&self, filters: &CustomerFilters) -> ApiResult<Vec<Customer>> {
        let guard = self.customers.begin_sequenced("list");
        let result = api::list_customers(&self.client, filters).await;
        if guard.settle(&result, |state, items| state.replace_all(items.clone())) {
            info!(count = result.data.len(), "Customers loaded");
        }
        result
    }

    pub async fn fetch_customer(&self, id: EntityId) -> ApiResult<Option<Customer>> {
        let guard = self.customers.begin_sequenced("current");
        let result = api::get_customer(&self.client, id).await;
        guard.settle(&result, |state, item| state.set_current(item.clone()));
        result
    }

    pub async fn create_customer(&self, payload: &NewCustomer) -> ApiResult<Option<Customer>> {
        let guard = self.customers.begin();
        let result = api::create_customer(&self.client, payload).await;
        let committed = guard.settle(&result, |state, created| {
            if let Some(customer) = created {
                state.append(customer.clone());
            }
        });
        if committed {
            info!(email = %payload.email, "Customer created");
        }
        result
    }

    pub async fn update_customer(
        &self,
        id: EntityId,
        payload: &CustomerUpdate,
    ) -> ApiResult<Option<Customer>> {
        let guard = self.customers.begin();
        let result = api::update_customer(&self.client, id, payload).await;
        guard.settle(&result, |state, updated| {
            if let Some(customer) = updated {
                state.replace_by_id(customer.clone());
            }
        });
        result
    }

    pub async fn delete_customer(&self, id: EntityId) -> ApiResult<()> {
        let guard = self.customers.begin();
        let result = api::delete_customer(&self.client, id).await;
        if guard.settle(&result, |state, _| {
            state.remove_by_id(&id);
        }) {
            info!(id, "Customer deleted");
        }
        result
    }

    pub fn is_loading(&self) -> bool {
        self.customers.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.customers.error()
    }

    pub fn clear_error(&self) {
        self.customers.clear_error();
    }

    pub fn reset(&self) {
        self.customers.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{envelope, scripted_client};
    use emporium_client::{HttpResponse, Method};
    use serde_json::json;

    #[tokio::test]
    async fn test_fetch_sends_only_set_filters() {
        let (client, transport) = scripted_client();
        let store = CustomerStore::new(client);
        transport.respond(
            Method::Get,
            "/customers",
            envelope(json!([{ "id": 1, "first_name": "Ada", "email": "ada@example.com" }])),
        );

        let filters = CustomerFilters {
            search: Some(String::new()),
            is_active: Some(true),
        };
        assert!(store.fetch_customers(&filters).await.success);

        let request = transport.last_request().unwrap();
        assert_eq!(request.query.len(), 1);
        assert_eq!(request.query.get("is_active"), Some("true"));
        assert_eq!(store.customers().snapshot().items[0].full_name(), "Ada");
    }

    #[tokio::test]
    async fn test_delete_failure_keeps_record() {
        let (client, transport) = scripted_client();
        let store = CustomerStore::new(client);
        transport.respond(
            Method::Get,
            "/customers",
            envelope(json!([{ "id": 1, "first_name": "Ada", "email": "ada@example.com" }])),
        );
        transport.respond(
            Method::Delete,
            "/customers/1",
            HttpResponse::json(409, json!({ "detail": "Customer has open orders" })),
        );

        store.fetch_customers(&CustomerFilters::default()).await;
        let result = store.delete_customer(1).await;

        assert!(!result.success);
        assert_eq!(store.customers().snapshot().items.len(), 1);
        assert_eq!(store.error().as_deref(), Some("Customer has open orders"));

        store.clear_error();
        assert_eq!(store.error(), None);
    }
}
