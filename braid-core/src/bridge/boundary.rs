//! The signal boundary.
//!
//! A `SignalBoundary` owns the subscription side of one render boundary.
//! Each render pass hands it the freshly scanned handle list; the boundary
//! stabilizes it against the committed list and resubscribes only when the
//! list actually changed. A fire on any subscribed handle increments a
//! counter and pokes the host's rerender hook — it never reads a cell
//! itself; reads happen during the next render pass.
//!
//! # States
//!
//! Two observable states, derived from the fire counter:
//!
//! - `Idle`: subscribed, every fire already rendered.
//! - `ScheduledRerender`: at least one fire since the last render.
//!
//! # Invariant
//!
//! The set of live subscriptions always equals the most recently committed
//! handle list. Old subscriptions are dropped before the new list is
//! subscribed, and unmounting drops them all.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::debug;

use super::handle::Handle;
use crate::store::Subscription;

/// Observable state of a boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryState {
    /// Subscribed, awaiting a fire.
    Idle,

    /// A fire occurred; a re-render is queued.
    ScheduledRerender,
}

/// Element-wise list comparison with a caller-supplied equality.
///
/// Length change, content change and reorder all count as "different";
/// only the index-wise equal steady state (including empty-to-empty)
/// reports an unchanged list.
pub fn same_list<T>(prev: &[T], next: &[T], eq: impl Fn(&T, &T) -> bool) -> bool {
    prev.len() == next.len() && prev.iter().zip(next).all(|(a, b)| eq(a, b))
}

/// [`same_list`] specialized to handle identity.
pub fn same_handle_list(prev: &[Handle], next: &[Handle]) -> bool {
    same_list(prev, next, Handle::same)
}

/// Subscription manager for one render boundary.
pub struct SignalBoundary {
    handles: Vec<Handle>,
    subscriptions: Vec<Subscription>,
    fires: Arc<AtomicU64>,
    rendered_at: u64,
    request_rerender: Arc<dyn Fn() + Send + Sync>,
}

impl SignalBoundary {
    /// Create an idle boundary with zero subscriptions. `request_rerender`
    /// is the host hook invoked on every fire.
    pub fn new(request_rerender: Arc<dyn Fn() + Send + Sync>) -> Self {
        Self {
            handles: Vec::new(),
            subscriptions: Vec::new(),
            fires: Arc::new(AtomicU64::new(0)),
            rendered_at: 0,
            request_rerender,
        }
    }

    /// Commit this render pass's handle list.
    ///
    /// When the stabilized list matches the committed one, nothing happens
    /// and existing subscriptions stay untouched. Otherwise every old
    /// subscription is dropped and the new list is subscribed.
    pub fn commit(&mut self, next: &[Handle]) {
        if same_handle_list(&self.handles, next) {
            return;
        }
        debug!(
            dropped = self.subscriptions.len(),
            added = next.len(),
            "signal boundary resubscribing"
        );

        // Old guards drop (and unsubscribe) before the new list signs up.
        self.subscriptions.clear();
        self.subscriptions = next
            .iter()
            .map(|handle| {
                let fires = Arc::clone(&self.fires);
                let request = Arc::clone(&self.request_rerender);
                handle.subscribe(Arc::new(move || {
                    fires.fetch_add(1, Ordering::SeqCst);
                    request();
                }))
            })
            .collect();
        self.handles = next.to_vec();
    }

    /// Current observable state.
    pub fn state(&self) -> BoundaryState {
        if self.needs_render() {
            BoundaryState::ScheduledRerender
        } else {
            BoundaryState::Idle
        }
    }

    /// Whether a fire occurred since the last render was marked.
    pub fn needs_render(&self) -> bool {
        self.fires.load(Ordering::SeqCst) != self.rendered_at
    }

    /// Record that the current render pass observed every fire so far.
    pub fn mark_rendered(&mut self) {
        self.rendered_at = self.fires.load(Ordering::SeqCst);
    }

    /// Total fires observed since creation.
    pub fn fire_count(&self) -> u64 {
        self.fires.load(Ordering::SeqCst)
    }

    /// Number of live subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Drop every subscription, as on unmount.
    pub fn unmount(&mut self) {
        self.subscriptions.clear();
        self.handles.clear();
    }
}

impl std::fmt::Debug for SignalBoundary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalBoundary")
            .field("handles", &self.handles.len())
            .field("subscriptions", &self.subscriptions.len())
            .field("state", &self.state())
            .finish()
    }
}
