//! Stores and the process-wide default store.
//!
//! A `Store` is the subscribe/read surface over cells and the identity
//! scope for signal handles: the handle registry keys on (store, cell), so
//! the same cell wrapped through two stores yields two distinct handles.
//!
//! Cells own their state; the store does not shadow it. `default_store`
//! hands out the process-wide singleton so application code can build
//! signals without threading a store through every call.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, Weak};

use super::cell::{Cell, CellValue};
use super::subscriber::{SubscriberId, Subscription};
use crate::value::Value;

/// Counter for generating unique store IDs.
static STORE_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

pub(crate) struct StoreInner {
    id: u64,
}

/// A scope for reactive cells.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Store {
    /// Create an independent store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(StoreInner {
                id: STORE_ID_COUNTER.fetch_add(1, Ordering::Relaxed),
            }),
        }
    }

    /// The store's unique ID.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Register a change callback on a cell.
    ///
    /// The returned guard keeps the subscription alive; dropping it
    /// unsubscribes.
    pub fn subscribe<F>(&self, cell: &Cell, notify: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = SubscriberId::new();
        cell.subscribe(id, notify);
        Subscription::new(cell.clone(), id)
    }

    /// Read a cell's current contents.
    pub fn read(&self, cell: &Cell) -> CellValue {
        cell.read()
    }

    /// Write a cell's value, notifying its subscribers.
    pub fn set(&self, cell: &Cell, value: impl Into<Value>) {
        cell.set(value);
    }

    pub(crate) fn downgrade(&self) -> Weak<StoreInner> {
        Arc::downgrade(&self.inner)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store").field("id", &self.id()).finish()
    }
}

/// The process-wide default store, created on first access and alive for
/// the rest of the process.
pub fn default_store() -> Store {
    static DEFAULT: OnceLock<Store> = OnceLock::new();
    DEFAULT.get_or_init(Store::new).clone()
}
