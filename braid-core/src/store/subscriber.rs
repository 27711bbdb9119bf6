//! Subscriber identity and subscription guards.
//!
//! A `SubscriberId` names one registered change callback on a cell. A
//! `Subscription` is the RAII guard handed back by `Store::subscribe`:
//! dropping it removes the callback, which is how "subscribe returns
//! unsubscribe" looks in Rust. A render boundary tears down its whole
//! subscription set by dropping the vector that holds the guards.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::cell::Cell;

/// Unique identifier for a registered change callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// Generate a new unique subscriber ID.
    ///
    /// Uses an atomic counter to ensure uniqueness across threads.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

/// Live subscription to one cell. Unsubscribes when dropped.
pub struct Subscription {
    cell: Cell,
    id: SubscriberId,
}

impl Subscription {
    pub(crate) fn new(cell: Cell, id: SubscriberId) -> Self {
        Self { cell, id }
    }

    /// The identity of the registered callback.
    pub fn id(&self) -> SubscriberId {
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cell.unsubscribe(self.id);
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("cell", &self.cell.id())
            .field("id", &self.id)
            .finish()
    }
}
