//! # Customer List Screen
//!
//! Client-driven, like the category list: the whole collection is fetched
//! once and every search or sort change is applied locally.

use emporium_core::listing::{CustomerSortKey, ListWindow, StatusFilter};
use emporium_core::{ApiResult, Customer, CustomerFilters, EntityId};

use crate::stores::CustomerStore;
use crate::views::actions::{Confirm, DeleteOutcome, RowActions};
use crate::views::list::ClientFilteredList;

/// Everything the customer screen renders.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerScreen {
    pub window: ListWindow<Customer>,
    /// Ids of rows with a delete outstanding.
    pub deleting: Vec<EntityId>,
    pub loading: bool,
    pub error: Option<String>,
}

pub struct CustomerListView {
    store: CustomerStore,
    list: ClientFilteredList<CustomerSortKey>,
    rows: RowActions<EntityId>,
}

impl CustomerListView {
    pub fn new(store: CustomerStore, page_size: usize) -> Self {
        CustomerListView {
            store,
            list: ClientFilteredList::new(page_size),
            rows: RowActions::new(),
        }
    }

    pub fn store(&self) -> &CustomerStore {
        &self.store
    }

    pub fn list(&self) -> &ClientFilteredList<CustomerSortKey> {
        &self.list
    }

    pub async fn load(&self) -> ApiResult<Vec<Customer>> {
        self.store.fetch_customers(&CustomerFilters::default()).await
    }

    pub async fn retry(&self) -> ApiResult<Vec<Customer>> {
        self.load().await
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.list.set_search(text);
    }

    pub fn set_status(&mut self, status: StatusFilter) {
        self.list.set_status(status);
    }

    pub fn sort_by(&mut self, key: CustomerSortKey) {
        self.list.sort_by(key);
    }

    pub fn set_page(&mut self, page: usize) {
        self.list.set_page(page);
    }

    pub fn screen(&self) -> CustomerScreen {
        let window = self.store.customers().read(|state| self.list.view(&state.items));
        let deleting = window
            .items
            .iter()
            .map(|c| c.id)
            .filter(|id| self.rows.is_in_flight(id))
            .collect();

        CustomerScreen {
            window,
            deleting,
            loading: self.store.is_loading(),
            error: self.store.error(),
        }
    }

    pub async fn delete(&self, id: EntityId, confirm: &dyn Confirm) -> DeleteOutcome {
        let label = self
            .store
            .customers()
            .read(|state| state.find(&id).map(|c| c.email.clone()))
            .unwrap_or_else(|| format!("#{}", id));
        let prompt = format!("Delete customer {}?", label);

        let store = &self.store;
        self.rows
            .delete_with_confirmation(id, &prompt, confirm, |id| store.delete_customer(id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{envelope, scripted_client};
    use emporium_client::{HttpResponse, Method};
    use serde_json::json;

    #[tokio::test]
    async fn test_search_and_delete() {
        let (client, transport) = scripted_client();
        transport.respond(
            Method::Get,
            "/customers",
            envelope(json!([
                { "id": 1, "first_name": "Ada", "last_name": "Lovelace", "email": "ada@example.com" },
                { "id": 2, "first_name": "Alan", "last_name": "Turing", "email": "alan@example.com" }
            ])),
        );
        transport.respond(Method::Delete, "/customers/2", HttpResponse::empty(204));

        let mut view = CustomerListView::new(CustomerStore::new(client), 10);
        view.load().await;

        view.set_search("turing");
        let screen = view.screen();
        assert_eq!(screen.window.total, 1);
        assert_eq!(screen.window.items[0].id, 2);

        let outcome = view.delete(2, &|_: &str| true).await;
        assert!(outcome.is_deleted());
        assert!(view.screen().window.is_empty());

        view.set_search("");
        assert_eq!(view.screen().window.total, 1);
    }
}
