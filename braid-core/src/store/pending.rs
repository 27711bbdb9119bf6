//! Pending asynchronous values.
//!
//! A `PendingValue` is the promise-like payload a cell read can return
//! before its real value exists. Its status machine is:
//!
//! ```text
//! Unset -> Pending -> Fulfilled
//!                  -> Rejected
//! ```
//!
//! `Unset` means nothing has observed the value yet; the first poll or
//! waiter registration moves it to `Pending`. Settlement happens exactly
//! once: a second `resolve`/`reject` is ignored with a warning.
//!
//! Waiters registered with [`PendingValue::on_settle`] run synchronously
//! at settlement (or immediately, when the value already settled). They
//! are used by the render host to queue a re-render; they must not read
//! cells themselves.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

use crate::value::Value;

/// Where a pending value is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingStatus {
    /// Created, never observed.
    Unset,

    /// Observed, not settled.
    Pending,

    /// Settled with a value.
    Fulfilled,

    /// Settled with a rejection reason.
    Rejected,
}

/// Snapshot of a pending value taken by a suspend-capable read.
#[derive(Debug, Clone, PartialEq)]
pub enum Settlement {
    /// Not settled yet; the reader should suspend.
    Unsettled,

    /// Settled with this value.
    Fulfilled(Value),

    /// Settled with this rejection reason.
    Rejected(Arc<str>),
}

type Waiter = Box<dyn FnOnce(&Settlement) + Send>;

struct PendingState {
    status: PendingStatus,
    value: Option<Value>,
    reason: Option<Arc<str>>,
    waiters: Vec<Waiter>,
}

/// A shareable, settle-once asynchronous value.
#[derive(Clone)]
pub struct PendingValue {
    inner: Arc<Mutex<PendingState>>,
}

impl PendingValue {
    /// Create an unsettled pending value.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(PendingState {
                status: PendingStatus::Unset,
                value: None,
                reason: None,
                waiters: Vec::new(),
            })),
        }
    }

    /// Current status.
    pub fn status(&self) -> PendingStatus {
        self.inner.lock().status
    }

    /// The fulfilled value, if settled successfully.
    pub fn value(&self) -> Option<Value> {
        self.inner.lock().value.clone()
    }

    /// The rejection reason, if settled with one.
    pub fn reason(&self) -> Option<Arc<str>> {
        self.inner.lock().reason.clone()
    }

    /// Whether the value has settled either way.
    pub fn is_settled(&self) -> bool {
        matches!(
            self.status(),
            PendingStatus::Fulfilled | PendingStatus::Rejected
        )
    }

    /// Observe the value: marks an `Unset` value as `Pending` and reports
    /// the current settlement.
    pub fn poll(&self) -> Settlement {
        let mut state = self.inner.lock();
        match state.status {
            PendingStatus::Unset => {
                state.status = PendingStatus::Pending;
                Settlement::Unsettled
            }
            PendingStatus::Pending => Settlement::Unsettled,
            PendingStatus::Fulfilled => {
                Settlement::Fulfilled(state.value.clone().unwrap_or(Value::Null))
            }
            PendingStatus::Rejected => Settlement::Rejected(
                state.reason.clone().unwrap_or_else(|| Arc::from("")),
            ),
        }
    }

    /// Settle with a value. Returns false (and changes nothing) when the
    /// value already settled.
    pub fn resolve(&self, value: Value) -> bool {
        self.settle(Settlement::Fulfilled(value))
    }

    /// Settle with a rejection reason. Returns false when already settled.
    pub fn reject(&self, reason: impl Into<Arc<str>>) -> bool {
        self.settle(Settlement::Rejected(reason.into()))
    }

    /// Run `waiter` once the value settles. Runs immediately when it
    /// already has. Registration counts as an observation.
    pub fn on_settle(&self, waiter: impl FnOnce(&Settlement) + Send + 'static) {
        let mut state = self.inner.lock();
        match state.status {
            PendingStatus::Unset | PendingStatus::Pending => {
                state.status = PendingStatus::Pending;
                state.waiters.push(Box::new(waiter));
            }
            PendingStatus::Fulfilled => {
                let settlement =
                    Settlement::Fulfilled(state.value.clone().unwrap_or(Value::Null));
                drop(state);
                waiter(&settlement);
            }
            PendingStatus::Rejected => {
                let settlement = Settlement::Rejected(
                    state.reason.clone().unwrap_or_else(|| Arc::from("")),
                );
                drop(state);
                waiter(&settlement);
            }
        }
    }

    fn settle(&self, settlement: Settlement) -> bool {
        let waiters = {
            let mut state = self.inner.lock();
            if matches!(
                state.status,
                PendingStatus::Fulfilled | PendingStatus::Rejected
            ) {
                warn!("pending value settled twice; second settlement ignored");
                return false;
            }
            match &settlement {
                Settlement::Fulfilled(value) => {
                    state.status = PendingStatus::Fulfilled;
                    state.value = Some(value.clone());
                }
                Settlement::Rejected(reason) => {
                    state.status = PendingStatus::Rejected;
                    state.reason = Some(Arc::clone(reason));
                }
                Settlement::Unsettled => unreachable!("settle called with Unsettled"),
            }
            std::mem::take(&mut state.waiters)
        };

        // Waiters run outside the lock so they may touch this value again.
        for waiter in waiters {
            waiter(&settlement);
        }
        true
    }
}

impl Default for PendingValue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PendingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("PendingValue")
            .field("status", &state.status)
            .field("waiters", &state.waiters.len())
            .finish()
    }
}
