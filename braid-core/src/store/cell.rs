//! Value cells.
//!
//! A `Cell` is one addressable unit of reactive state: a current value
//! (which may be a pending asynchronous one) plus a registry of change
//! callbacks. Writing a new value notifies every registered callback.
//!
//! Cells are never mutated by the bridging layer; it only reads them and
//! subscribes to them. Settlement of a pending payload does not notify
//! cell subscribers either: resuming a suspended render is the host's
//! job, driven by the pending value's own waiters.
//!
//! # Sharing
//!
//! Like every shared object in this crate, a `Cell` is a cheap clone of an
//! `Arc`-held inner. Clones observe each other's writes.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tracing::trace;

use super::pending::PendingValue;
use super::subscriber::SubscriberId;
use crate::value::Value;

/// Counter for generating unique cell IDs.
static CELL_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_cell_id() -> u64 {
    CELL_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// What a cell read yields: a value, or a value that is still on its way.
#[derive(Debug, Clone)]
pub enum CellValue {
    /// An immediately usable value.
    Ready(Value),

    /// A pending asynchronous value.
    Pending(PendingValue),
}

pub(crate) struct CellInner {
    id: u64,
    content: RwLock<CellValue>,
    notifiers: RwLock<Vec<(SubscriberId, Arc<dyn Fn() + Send + Sync>)>>,
}

/// A reactive value cell.
#[derive(Clone)]
pub struct Cell {
    inner: Arc<CellInner>,
}

impl Cell {
    /// Create a cell holding an immediate value.
    pub fn new(value: impl Into<Value>) -> Self {
        Self::with_content(CellValue::Ready(value.into()))
    }

    /// Create a cell holding a pending asynchronous value.
    pub fn pending(pending: PendingValue) -> Self {
        Self::with_content(CellValue::Pending(pending))
    }

    fn with_content(content: CellValue) -> Self {
        Self {
            inner: Arc::new(CellInner {
                id: next_cell_id(),
                content: RwLock::new(content),
                notifiers: RwLock::new(Vec::new()),
            }),
        }
    }

    /// The cell's unique ID.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Read the current contents.
    pub fn read(&self) -> CellValue {
        self.inner.content.read().clone()
    }

    /// Replace the value and notify subscribers.
    pub fn set(&self, value: impl Into<Value>) {
        *self.inner.content.write() = CellValue::Ready(value.into());
        self.notify_subscribers();
    }

    /// Replace the contents with a pending value and notify subscribers.
    pub fn set_pending(&self, pending: PendingValue) {
        *self.inner.content.write() = CellValue::Pending(pending);
        self.notify_subscribers();
    }

    /// Register a change callback under the given subscriber ID.
    pub fn subscribe<F>(&self, id: SubscriberId, notify: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        trace!(cell = self.id(), ?id, "cell subscribe");
        self.inner.notifiers.write().push((id, Arc::new(notify)));
    }

    /// Remove a change callback.
    pub fn unsubscribe(&self, id: SubscriberId) {
        trace!(cell = self.id(), ?id, "cell unsubscribe");
        self.inner
            .notifiers
            .write()
            .retain(|(existing, _)| *existing != id);
    }

    /// Number of registered change callbacks.
    pub fn subscriber_count(&self) -> usize {
        self.inner.notifiers.read().len()
    }

    pub(crate) fn downgrade(&self) -> Weak<CellInner> {
        Arc::downgrade(&self.inner)
    }

    fn notify_subscribers(&self) {
        // Snapshot under the lock, call outside it: a callback may want to
        // subscribe or unsubscribe this very cell.
        let notifiers: Vec<Arc<dyn Fn() + Send + Sync>> = self
            .inner
            .notifiers
            .read()
            .iter()
            .map(|(_, notify)| Arc::clone(notify))
            .collect();

        for notify in notifiers {
            notify();
        }
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("id", &self.id())
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}
