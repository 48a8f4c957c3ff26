//! # Feature State Core
//!
//! The generic state slot every feature store is built from.
//!
//! ## Action Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      One store action                                   │
//! │                                                                         │
//! │  begin() / begin_sequenced(slot)                                        │
//! │     ├── in_flight += 1 ──► loading = true                              │
//! │     ├── error = None                                                    │
//! │     └── ticket = ++sequence[slot]          (sequenced only)             │
//! │                │                                                        │
//! │                ▼                                                        │
//! │  api::* call  (await, lock NOT held)                                    │
//! │                │                                                        │
//! │                ▼                                                        │
//! │  guard.settle(&result, apply)                                           │
//! │     ├── stale ticket or reset since begin ──► discard, warn            │
//! │     ├── success ──► apply(&mut state, &data)                           │
//! │     └── failure ──► error = Some(message)                              │
//! │                │                                                        │
//! │                ▼                                                        │
//! │  drop(guard) ──► in_flight -= 1 ──► loading = (in_flight > 0)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The guard is released on drop, so a cancelled future cannot leave
//! `loading` stuck. `reset()` bumps a generation counter: guards started
//! before a reset never commit and never touch the counter.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::warn;

use emporium_core::{ApiResult, Entity, Page};

// =============================================================================
// Feature State
// =============================================================================

/// State held by one slot of a feature store.
///
/// `M` carries slot-specific extras (paging metadata, last filters, a
/// derived grouping index).
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureState<T, M = ()> {
    /// Server order; no dedup.
    pub items: Vec<T>,
    /// Record selected for view/edit.
    pub current: Option<T>,
    /// True while any action on this slot is outstanding.
    pub loading: bool,
    /// Message of the last failed action.
    pub error: Option<String>,
    pub meta: M,
}

impl<T, M: Default> Default for FeatureState<T, M> {
    fn default() -> Self {
        FeatureState {
            items: Vec::new(),
            current: None,
            loading: false,
            error: None,
            meta: M::default(),
        }
    }
}

impl<T, M> FeatureState<T, M> {
    /// fetch-many: replace the collection wholesale.
    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
    }

    /// fetch-one: replace `current` wholesale.
    pub fn set_current(&mut self, item: Option<T>) {
        self.current = item;
    }

    /// create: append at the end, no dedup.
    pub fn append(&mut self, item: T) {
        self.items.push(item);
    }
}

impl<T: Entity, M> FeatureState<T, M> {
    /// update: replace the matching record, and `current` if it matches.
    ///
    /// Returns true if a collection entry was replaced.
    pub fn replace_by_id(&mut self, item: T) -> bool {
        let id = item.entity_id();

        if let Some(current) = &mut self.current {
            if current.entity_id() == id {
                *current = item.clone();
            }
        }

        match self.items.iter_mut().find(|i| i.entity_id() == id) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    /// delete: drop every record with this id; clear `current` if it matches.
    ///
    /// Returns the number of records removed.
    pub fn remove_by_id(&mut self, id: &T::Id) -> usize {
        let before = self.items.len();
        self.items.retain(|i| &i.entity_id() != id);

        if self
            .current
            .as_ref()
            .is_some_and(|c| &c.entity_id() == id)
        {
            self.current = None;
        }

        before - self.items.len()
    }

    /// Looks up a record in the collection.
    pub fn find(&self, id: &T::Id) -> Option<&T> {
        self.items.iter().find(|i| &i.entity_id() == id)
    }
}

// =============================================================================
// Paging Metadata
// =============================================================================

/// Paging numbers returned with a server-paged list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageInfo {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl PageInfo {
    pub fn of<T>(page: &Page<T>) -> Self {
        PageInfo {
            total: page.total,
            page: page.page,
            limit: page.limit,
            total_pages: page.total_pages,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Extras for a server-driven list slot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PagedMeta<F> {
    pub info: PageInfo,
    /// Filters of the most recent fetch, replayed by `refresh`.
    pub last_filters: Option<F>,
}

// =============================================================================
// Store Core
// =============================================================================

struct Inner<T, M> {
    state: FeatureState<T, M>,
    in_flight: usize,
    generation: u64,
    sequences: HashMap<&'static str, u64>,
}

/// Shared, lock-protected feature state. Cheap to clone.
pub struct StoreCore<T, M = ()> {
    name: &'static str,
    inner: Arc<RwLock<Inner<T, M>>>,
}

impl<T, M> Clone for StoreCore<T, M> {
    fn clone(&self) -> Self {
        StoreCore {
            name: self.name,
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, M> StoreCore<T, M>
where
    T: Clone + Send + Sync + 'static,
    M: Clone + Default + Send + Sync + 'static,
{
    /// Creates an empty slot. `name` is used in log lines.
    pub fn new(name: &'static str) -> Self {
        StoreCore {
            name,
            inner: Arc::new(RwLock::new(Inner {
                state: FeatureState::default(),
                in_flight: 0,
                generation: 0,
                sequences: HashMap::new(),
            })),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Clones the current state out. Never hold it expecting updates.
    pub fn snapshot(&self) -> FeatureState<T, M> {
        self.read(|state| state.clone())
    }

    /// Reads through the lock without cloning everything.
    pub fn read<R>(&self, f: impl FnOnce(&FeatureState<T, M>) -> R) -> R {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&inner.state)
    }

    /// Mutates state directly, outside any action.
    pub fn update<R>(&self, f: impl FnOnce(&mut FeatureState<T, M>) -> R) -> R {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut inner.state)
    }

    pub fn is_loading(&self) -> bool {
        self.read(|state| state.loading)
    }

    pub fn error(&self) -> Option<String> {
        self.read(|state| state.error.clone())
    }

    pub fn clear_error(&self) {
        self.update(|state| state.error = None);
    }

    /// Back to defaults. Outstanding actions will not commit.
    pub fn reset(&self) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.state = FeatureState::default();
        inner.in_flight = 0;
        inner.generation += 1;
        inner.sequences.clear();
    }

    /// Starts an action whose result always commits (create/update/delete).
    pub fn begin(&self) -> ActionGuard<T, M> {
        self.start(None)
    }

    /// Starts an action whose result commits only if no later action on
    /// the same `slot` has started since (list and single fetches).
    pub fn begin_sequenced(&self, slot: &'static str) -> ActionGuard<T, M> {
        self.start(Some(slot))
    }

    fn start(&self, slot: Option<&'static str>) -> ActionGuard<T, M> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.in_flight += 1;
        inner.state.loading = true;
        inner.state.error = None;

        let ticket = slot.map(|slot| {
            let seq = inner.sequences.entry(slot).or_insert(0);
            *seq += 1;
            (slot, *seq)
        });

        ActionGuard {
            core: self.clone(),
            generation: inner.generation,
            ticket,
        }
    }
}

// =============================================================================
// Action Guard
// =============================================================================

/// Handle for one outstanding action. Dropping it settles `loading`.
pub struct ActionGuard<T, M = ()>
where
    T: Clone + Send + Sync + 'static,
    M: Clone + Default + Send + Sync + 'static,
{
    core: StoreCore<T, M>,
    generation: u64,
    ticket: Option<(&'static str, u64)>,
}

impl<T, M> ActionGuard<T, M>
where
    T: Clone + Send + Sync + 'static,
    M: Clone + Default + Send + Sync + 'static,
{
    fn is_current_in(&self, inner: &Inner<T, M>) -> bool {
        if inner.generation != self.generation {
            return false;
        }
        match self.ticket {
            Some((slot, seq)) => inner.sequences.get(slot).copied() == Some(seq),
            None => true,
        }
    }

    /// Returns true if this action may still commit.
    pub fn is_current(&self) -> bool {
        let inner = self.core.inner.read().unwrap_or_else(PoisonError::into_inner);
        self.is_current_in(&inner)
    }

    /// Applies `f` if this action is still current. Returns whether it did.
    pub fn commit(&self, f: impl FnOnce(&mut FeatureState<T, M>)) -> bool {
        let mut inner = self.core.inner.write().unwrap_or_else(PoisonError::into_inner);
        if !self.is_current_in(&inner) {
            warn!(
                store = self.core.name,
                slot = self.ticket.map(|(slot, _)| slot),
                "Discarding stale response"
            );
            return false;
        }
        f(&mut inner.state);
        true
    }

    /// Records a failure message if this action is still current.
    pub fn fail(&self, message: &str) -> bool {
        let message = message.to_string();
        self.commit(move |state| state.error = Some(message))
    }

    /// Commits a success through `apply`, or records the failure message.
    ///
    /// Returns true only if a success was committed.
    pub fn settle<U>(
        &self,
        result: &ApiResult<U>,
        apply: impl FnOnce(&mut FeatureState<T, M>, &U),
    ) -> bool {
        if result.success {
            self.commit(|state| apply(state, &result.data))
        } else {
            self.fail(result.message().unwrap_or("Request failed"));
            false
        }
    }
}

impl<T, M> Drop for ActionGuard<T, M>
where
    T: Clone + Send + Sync + 'static,
    M: Clone + Default + Send + Sync + 'static,
{
    fn drop(&mut self) {
        let mut inner = self.core.inner.write().unwrap_or_else(PoisonError::into_inner);
        if inner.generation != self.generation {
            return;
        }
        inner.in_flight = inner.in_flight.saturating_sub(1);
        inner.state.loading = inner.in_flight > 0;
    }
}
