//! # Row Actions
//!
//! Destructive per-row actions: confirmation first, then a per-row
//! in-flight flag that is independent of the store's `loading`.
//!
//! ```text
//! delete_with_confirmation(id)
//!   ├── row already in flight ──────────► AlreadyInFlight
//!   ├── confirm(prompt) == false ───────► Cancelled        (no request)
//!   ├── mark row in flight
//!   │     action(id).await
//!   │       ├── success ────────────────► Deleted
//!   │       └── failure ──► alert(msg) ─► Failed(msg)
//!   └── unmark row (on drop, also when cancelled mid-flight)
//! ```

use std::collections::HashSet;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use emporium_core::ApiResult;

/// Asks the user before a destructive action and shows blocking alerts.
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;

    /// Shows a failure that needs acknowledging. Silent by default.
    fn alert(&self, _message: &str) {}
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Outcome of a confirmed destructive action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined; nothing was sent.
    Cancelled,
    Deleted,
    Failed(String),
    /// The same row already has an action outstanding.
    AlreadyInFlight,
}

impl DeleteOutcome {
    pub fn is_deleted(&self) -> bool {
        matches!(self, DeleteOutcome::Deleted)
    }
}

/// Tracks which rows have an action outstanding.
#[derive(Debug)]
pub struct RowActions<Id> {
    in_flight: Arc<Mutex<HashSet<Id>>>,
}

impl<Id> Default for RowActions<Id> {
    fn default() -> Self {
        RowActions {
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }
}

impl<Id> Clone for RowActions<Id> {
    fn clone(&self) -> Self {
        RowActions {
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

struct InFlight<Id: Eq + Hash> {
    rows: Arc<Mutex<HashSet<Id>>>,
    id: Id,
}

impl<Id: Eq + Hash> Drop for InFlight<Id> {
    fn drop(&mut self) {
        self.rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}

impl<Id> RowActions<Id>
where
    Id: Eq + Hash + Clone + std::fmt::Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true while an action for this row is outstanding.
    pub fn is_in_flight(&self, id: &Id) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(id)
    }

    fn mark(&self, id: Id) -> Option<InFlight<Id>> {
        let mut rows = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if !rows.insert(id.clone()) {
            return None;
        }
        Some(InFlight {
            rows: Arc::clone(&self.in_flight),
            id,
        })
    }

    /// Confirms, then runs `action` with the row marked in flight.
    pub async fn delete_with_confirmation<A, Fut>(
        &self,
        id: Id,
        prompt: &str,
        confirm: &dyn Confirm,
        action: A,
    ) -> DeleteOutcome
    where
        A: FnOnce(Id) -> Fut,
        Fut: Future<Output = ApiResult<()>>,
    {
        if self.is_in_flight(&id) {
            return DeleteOutcome::AlreadyInFlight;
        }
        if !confirm.confirm(prompt) {
            debug!(row = ?id, "Delete cancelled");
            return DeleteOutcome::Cancelled;
        }
        let Some(_marker) = self.mark(id.clone()) else {
            return DeleteOutcome::AlreadyInFlight;
        };

        let result = action(id).await;
        if result.success {
            DeleteOutcome::Deleted
        } else {
            let message = result
                .message
                .unwrap_or_else(|| "Request failed".to_string());
            confirm.alert(&message);
            DeleteOutcome::Failed(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Recorder {
        answer: bool,
        alerts: Mutex<Vec<String>>,
    }

    impl Confirm for Recorder {
        fn confirm(&self, _prompt: &str) -> bool {
            self.answer
        }

        fn alert(&self, message: &str) {
            self.alerts.lock().unwrap().push(message.to_string());
        }
    }

    #[tokio::test]
    async fn test_cancelled_sends_nothing() {
        let rows: RowActions<i64> = RowActions::new();
        let calls = AtomicUsize::new(0);
        let outcome = rows
            .delete_with_confirmation(1, "Delete?", &|_: &str| false, |_| async {
                calls.fetch_add(1, Ordering::SeqCst);
                ApiResult::ok(())
            })
            .await;

        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_row_marked_while_running() {
        let rows: RowActions<i64> = RowActions::new();
        let probe = rows.clone();
        let outcome = rows
            .delete_with_confirmation(7, "Delete?", &|_: &str| true, |id| async move {
                assert!(probe.is_in_flight(&id));
                ApiResult::ok(())
            })
            .await;

        assert!(outcome.is_deleted());
        assert!(!rows.is_in_flight(&7));
    }

    #[tokio::test]
    async fn test_failure_raises_alert() {
        let rows: RowActions<i64> = RowActions::new();
        let recorder = Recorder {
            answer: true,
            alerts: Mutex::new(Vec::new()),
        };
        let outcome = rows
            .delete_with_confirmation(3, "Delete?", &recorder, |_| async {
                ApiResult::failure("Category has products")
            })
            .await;

        assert_eq!(outcome, DeleteOutcome::Failed("Category has products".to_string()));
        assert_eq!(*recorder.alerts.lock().unwrap(), vec!["Category has products"]);
        assert!(!rows.is_in_flight(&3));
    }

    #[tokio::test]
    async fn test_second_delete_on_same_row_is_rejected() {
        let rows: RowActions<i64> = RowActions::new();
        let inner = rows.clone();
        let outcome = rows
            .delete_with_confirmation(5, "Delete?", &|_: &str| true, |id| async move {
                let nested = inner
                    .delete_with_confirmation(id, "Delete?", &|_: &str| true, |_| async {
                        ApiResult::ok(())
                    })
                    .await;
                assert_eq!(nested, DeleteOutcome::AlreadyInFlight);
                ApiResult::ok(())
            })
            .await;
        assert!(outcome.is_deleted());
    }
}
