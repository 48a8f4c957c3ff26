//! End-to-end scenarios: view model → store → API function → scripted
//! transport, with no network.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};

use emporium_client::{
    ApiClient, ClientError, HttpResponse, MemorySessionStore, Method, ScriptedTransport,
};
use emporium_core::{CustomerFilters, NewCategory};
use emporium_state::views::{CategoryListView, DeleteOutcome};
use emporium_state::{CategoryStore, CustomerStore};

fn scripted() -> (ApiClient, Arc<ScriptedTransport>) {
    let transport = Arc::new(ScriptedTransport::new());
    let session = Arc::new(MemorySessionStore::with_values([("token", "scenario-token")]));
    (ApiClient::new(transport.clone(), session), transport)
}

fn envelope(data: Value) -> HttpResponse {
    HttpResponse::json(200, json!({ "success": true, "data": data }))
}

fn names(store: &CategoryStore) -> Vec<String> {
    store
        .categories()
        .snapshot()
        .items
        .into_iter()
        .map(|c| c.category_name)
        .collect()
}

async fn wait_for_requests(transport: &ScriptedTransport, count: usize) {
    while transport.requests().len() < count {
        tokio::task::yield_now().await;
    }
}

fn two_categories() -> Value {
    json!([
        { "id": 1, "category_name": "Electronics" },
        { "id": 2, "category_name": "Books" }
    ])
}

// =============================================================================
// Collection update rules
// =============================================================================

#[tokio::test]
async fn test_create_appends_after_existing_entries() {
    let (client, transport) = scripted();
    transport.respond(Method::Get, "/categories", envelope(two_categories()));
    transport.respond(
        Method::Post,
        "/categories",
        envelope(json!({ "id": 3, "category_name": "Garden" })),
    );

    let store = CategoryStore::new(client);
    store.fetch_categories().await;

    let payload = NewCategory {
        category_name: "Garden".to_string(),
        ..Default::default()
    };
    let created = store.create_category(&payload).await;

    assert!(created.success);
    assert_eq!(names(&store), vec!["Electronics", "Books", "Garden"]);
}

#[tokio::test]
async fn test_delete_removes_record_and_clears_current() {
    let (client, transport) = scripted();
    transport.respond(Method::Get, "/categories", envelope(two_categories()));
    transport.respond(
        Method::Get,
        "/categories/2",
        envelope(json!({ "id": 2, "category_name": "Books" })),
    );
    transport.respond(Method::Delete, "/categories/2", HttpResponse::empty(204));

    let store = CategoryStore::new(client);
    store.fetch_categories().await;
    store.fetch_category(2).await;
    assert!(store.categories().snapshot().current.is_some());

    assert!(store.delete_category(2).await.success);

    let state = store.categories().snapshot();
    assert!(state.items.iter().all(|c| c.id != 2));
    assert!(state.current.is_none());
}

// =============================================================================
// Loading flag
// =============================================================================

#[tokio::test]
async fn test_loading_true_only_while_request_pending() {
    let (client, transport) = scripted();
    let gate = transport.gate(Method::Get, "/categories");
    let store = CategoryStore::new(client);
    assert!(!store.is_loading());

    let task = tokio::spawn({
        let store = store.clone();
        async move { store.fetch_categories().await }
    });
    wait_for_requests(&transport, 1).await;
    assert!(store.is_loading());

    assert!(gate.send(Ok(envelope(two_categories()))).is_ok());
    let result = task.await.unwrap();

    assert!(result.success);
    assert!(!store.is_loading());
}

#[tokio::test]
async fn test_loading_resolves_on_failure_paths() {
    let (client, transport) = scripted();
    transport.fail(
        Method::Get,
        "/categories",
        ClientError::Transport("connection refused".to_string()),
    );
    transport.respond(
        Method::Post,
        "/categories",
        HttpResponse::json(
            422,
            json!({ "detail": [{ "loc": ["body", "category_name"], "msg": "field required" }] }),
        ),
    );

    let store = CategoryStore::new(client);

    let fetched = store.fetch_categories().await;
    assert!(!fetched.success);
    assert_eq!(fetched.message(), Some("Failed to fetch categories"));
    assert!(!store.is_loading());

    let payload = NewCategory {
        category_name: "Garden".to_string(),
        ..Default::default()
    };
    let created = store.create_category(&payload).await;
    assert_eq!(created.message(), Some("body.category_name: field required"));
    assert_eq!(created.data, None);
    assert!(!store.is_loading());
}

#[tokio::test]
async fn test_dropped_action_does_not_leave_loading_stuck() {
    let (client, transport) = scripted();
    let _gate = transport.gate(Method::Get, "/categories");
    let store = CategoryStore::new(client);

    let outcome =
        tokio::time::timeout(Duration::from_millis(20), store.fetch_categories()).await;

    assert!(outcome.is_err());
    assert!(!store.is_loading());
}

// =============================================================================
// Overlapping requests
// =============================================================================

#[tokio::test]
async fn test_late_response_of_older_fetch_is_discarded() {
    let (client, transport) = scripted();
    let older = transport.gate(Method::Get, "/categories");
    let newer = transport.gate(Method::Get, "/categories");
    let store = CategoryStore::new(client);

    let first = tokio::spawn({
        let store = store.clone();
        async move { store.fetch_categories().await }
    });
    wait_for_requests(&transport, 1).await;
    let second = tokio::spawn({
        let store = store.clone();
        async move { store.fetch_categories().await }
    });
    wait_for_requests(&transport, 2).await;

    assert!(newer
        .send(Ok(envelope(json!([{ "id": 2, "category_name": "Books" }]))))
        .is_ok());
    assert!(second.await.unwrap().success);

    assert!(older
        .send(Ok(envelope(json!([{ "id": 9, "category_name": "Stale" }]))))
        .is_ok());
    let stale = first.await.unwrap();

    // Returned to its caller, never committed
    assert!(stale.success);
    assert_eq!(stale.data[0].category_name, "Stale");
    assert_eq!(names(&store), vec!["Books"]);
    assert!(!store.is_loading());
}

// =============================================================================
// Screens
// =============================================================================

#[tokio::test]
async fn test_category_delete_requires_confirmation() {
    let (client, transport) = scripted();
    transport.respond(Method::Get, "/categories", envelope(two_categories()));
    transport.respond(Method::Get, "/categories/subcategories", envelope(json!([])));
    transport.respond(Method::Delete, "/categories/2", HttpResponse::empty(204));

    let view = CategoryListView::new(CategoryStore::new(client), 10);
    view.load().await;

    let declined = view.delete(2, &|_: &str| false).await;
    assert_eq!(declined, DeleteOutcome::Cancelled);
    assert_eq!(names(view.store()), vec!["Electronics", "Books"]);
    assert!(transport
        .requests()
        .iter()
        .all(|r| r.method != Method::Delete));

    let confirmed = view
        .delete(2, &|prompt: &str| prompt.contains("Books"))
        .await;
    assert_eq!(confirmed, DeleteOutcome::Deleted);
    assert_eq!(names(view.store()), vec!["Electronics"]);
}

#[tokio::test]
async fn test_subcategories_grouped_by_parent() {
    let (client, transport) = scripted();
    transport.respond(
        Method::Get,
        "/categories/subcategories",
        envelope(json!([
            { "id": 1, "category_id": 1, "name": "A" },
            { "id": 2, "category_id": 1, "name": "B" },
            { "id": 3, "category_id": 2, "name": "C" }
        ])),
    );

    let store = CategoryStore::new(client);
    store.fetch_subcategories(None).await;

    let grouped = store.grouped();
    assert_eq!(grouped.len(), 2);
    let group = |id: i64| -> Vec<String> {
        grouped[&id]
            .iter()
            .map(|s| s.subcategory_name.clone())
            .collect()
    };
    assert_eq!(group(1), vec!["A", "B"]);
    assert_eq!(group(2), vec!["C"]);
}

#[tokio::test]
async fn test_retry_after_failed_fetch() {
    let (client, transport) = scripted();
    transport.fail(Method::Get, "/customers", ClientError::Timeout);
    transport.respond(
        Method::Get,
        "/customers",
        envelope(json!([{ "id": 1, "first_name": "Ada", "email": "ada@example.com" }])),
    );

    let store = CustomerStore::new(client);
    let failed = store.fetch_customers(&CustomerFilters::default()).await;
    assert!(!failed.success);
    assert!(store.error().is_some());

    let retried = store.fetch_customers(&CustomerFilters::default()).await;
    assert!(retried.success);
    assert_eq!(store.error(), None);
    assert_eq!(store.customers().snapshot().items.len(), 1);
}

#[tokio::test]
async fn test_requests_carry_session_token() {
    let (client, transport) = scripted();
    transport.respond(Method::Get, "/categories", envelope(json!([])));

    CategoryStore::new(client).fetch_categories().await;

    let request = transport.last_request().unwrap();
    assert_eq!(request.bearer.as_deref(), Some("scenario-token"));
}
