//! Signal handles.
//!
//! A `Handle` is the opaque wrapper that lets one (store, cell) pair travel
//! through props and children as if it were a plain value. It carries two
//! delegates: `subscribe`, which registers a change callback with the
//! store, and `read`, which fetches the cell's current contents.
//!
//! Handles are identity-stable: [`signal_in`] goes through the registry,
//! so repeated calls for the same (store, cell) pair return the same
//! allocation. Boundaries rely on that to diff handle lists by pointer.

use std::fmt;
use std::sync::Arc;

use super::registry;
use crate::error::{Interrupt, RenderError};
use crate::store::{default_store, Cell, CellValue, Settlement, Store, Subscription};
use crate::value::Value;

type SubscribeFn = dyn Fn(Arc<dyn Fn() + Send + Sync>) -> Subscription + Send + Sync;
type ReadFn = dyn Fn() -> CellValue + Send + Sync;

struct HandleInner {
    subscribe: Box<SubscribeFn>,
    read: Box<ReadFn>,
}

/// An opaque, identity-stable wrapper over one (store, cell) pair.
#[derive(Clone)]
pub struct Handle {
    inner: Arc<HandleInner>,
}

impl Handle {
    pub(crate) fn new(store: &Store, cell: &Cell) -> Self {
        let subscribe = {
            let store = store.clone();
            let cell = cell.clone();
            Box::new(move |notify: Arc<dyn Fn() + Send + Sync>| {
                store.subscribe(&cell, move || notify())
            })
        };
        let read = {
            let store = store.clone();
            let cell = cell.clone();
            Box::new(move || store.read(&cell))
        };
        Self {
            inner: Arc::new(HandleInner { subscribe, read }),
        }
    }

    /// Register a change callback; the guard unsubscribes on drop.
    pub fn subscribe(&self, notify: Arc<dyn Fn() + Send + Sync>) -> Subscription {
        (self.inner.subscribe)(notify)
    }

    /// Read the wrapped cell's current contents.
    pub fn read(&self) -> CellValue {
        (self.inner.read)()
    }

    /// Whether two handles wrap the same (store, cell) pair.
    pub fn same(&self, other: &Handle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for Handle {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl Eq for Handle {}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({:p})", Arc::as_ptr(&self.inner))
    }
}

/// Wrap a cell of the default store as an embeddable signal value.
///
/// The result can be placed anywhere a displayable value is accepted:
/// directly as a child, or nested inside props. Idempotent per cell — the
/// embedded handle is cached.
pub fn signal(cell: &Cell) -> Value {
    signal_in(cell, &default_store())
}

/// Wrap a cell of an explicit store as an embeddable signal value.
pub fn signal_in(cell: &Cell, store: &Store) -> Value {
    Value::Signal(registry::handle_for(store, cell))
}

/// Suspend-capable read of a handle.
///
/// Ready contents return immediately. Pending contents return the resolved
/// value when already fulfilled, fail the render pass when rejected, and
/// otherwise ask the caller to suspend until settlement. Must only be
/// called from a render pass that understands [`Interrupt`].
pub fn read_handle(handle: &Handle) -> Result<Value, Interrupt> {
    match handle.read() {
        CellValue::Ready(value) => Ok(value),
        CellValue::Pending(pending) => match pending.poll() {
            Settlement::Fulfilled(value) => Ok(value),
            Settlement::Rejected(reason) => {
                Err(Interrupt::Failed(RenderError::RejectedRead { reason }))
            }
            Settlement::Unsettled => Err(Interrupt::Suspend(pending)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::PendingValue;

    fn handle_of(value: &Value) -> Handle {
        value.as_signal().cloned().unwrap()
    }

    #[test]
    fn same_pair_yields_the_same_handle() {
        let store = Store::new();
        let cell = Cell::new(0);

        let a = handle_of(&signal_in(&cell, &store));
        let b = handle_of(&signal_in(&cell, &store));
        assert!(a.same(&b));
    }

    #[test]
    fn different_stores_yield_different_handles() {
        let store_a = Store::new();
        let store_b = Store::new();
        let cell = Cell::new(0);

        let a = handle_of(&signal_in(&cell, &store_a));
        let b = handle_of(&signal_in(&cell, &store_b));
        assert!(!a.same(&b));
    }

    #[test]
    fn different_cells_yield_different_handles() {
        let store = Store::new();
        let a = handle_of(&signal_in(&Cell::new(0), &store));
        let b = handle_of(&signal_in(&Cell::new(0), &store));
        assert!(!a.same(&b));
    }

    #[test]
    fn read_handle_returns_ready_values() {
        let store = Store::new();
        let cell = Cell::new("now");
        let handle = handle_of(&signal_in(&cell, &store));

        assert_eq!(read_handle(&handle).unwrap(), Value::from("now"));
    }

    #[test]
    fn read_handle_returns_fulfilled_pending_values() {
        let store = Store::new();
        let pending = PendingValue::new();
        pending.resolve(Value::from("later"));
        let cell = Cell::pending(pending);
        let handle = handle_of(&signal_in(&cell, &store));

        assert_eq!(read_handle(&handle).unwrap(), Value::from("later"));
    }

    #[test]
    fn read_handle_suspends_on_unsettled_pending() {
        let store = Store::new();
        let cell = Cell::pending(PendingValue::new());
        let handle = handle_of(&signal_in(&cell, &store));

        match read_handle(&handle) {
            Err(Interrupt::Suspend(_)) => {}
            other => panic!("expected suspension, got {other:?}"),
        }
    }

    #[test]
    fn read_handle_fails_on_rejected_pending() {
        let store = Store::new();
        let pending = PendingValue::new();
        pending.reject("nope");
        let cell = Cell::pending(pending);
        let handle = handle_of(&signal_in(&cell, &store));

        match read_handle(&handle) {
            Err(Interrupt::Failed(RenderError::RejectedRead { reason })) => {
                assert_eq!(&*reason, "nope");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }
}
