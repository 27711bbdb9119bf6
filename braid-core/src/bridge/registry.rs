//! Global handle registry.
//!
//! One stable [`Handle`] per (store, cell) pair, for as long as both are
//! reachable. The registry keys on the pair's numeric IDs and holds weak
//! references to both inners; an entry whose store or cell has been
//! dropped no longer answers lookups and is swept out lazily. This is the
//! arena-flavored stand-in for a weak-keyed map: the registry never keeps
//! a store or cell alive.
//!
//! All mutation goes through the concurrent map itself, so callers need no
//! extra locking discipline.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{OnceLock, Weak};

use dashmap::DashMap;
use tracing::trace;

use super::handle::Handle;
use crate::store::{Cell, CellInner, Store, StoreInner};

struct RegistryEntry {
    store: Weak<StoreInner>,
    cell: Weak<CellInner>,
    handle: Handle,
}

impl RegistryEntry {
    fn is_live(&self) -> bool {
        self.store.strong_count() > 0 && self.cell.strong_count() > 0
    }
}

static REGISTRY: OnceLock<DashMap<(u64, u64), RegistryEntry>> = OnceLock::new();

/// Sweep threshold, doubled after each sweep so sweeping stays amortized.
static SWEEP_AT: AtomicUsize = AtomicUsize::new(64);

fn registry() -> &'static DashMap<(u64, u64), RegistryEntry> {
    REGISTRY.get_or_init(DashMap::new)
}

/// Fetch the cached handle for this (store, cell) pair, creating and
/// caching a new one on first request.
pub(crate) fn handle_for(store: &Store, cell: &Cell) -> Handle {
    let map = registry();
    let key = (store.id(), cell.id());

    if let Some(entry) = map.get(&key) {
        if entry.is_live() {
            trace!(store = key.0, cell = key.1, "handle registry hit");
            return entry.handle.clone();
        }
    }

    trace!(store = key.0, cell = key.1, "handle registry miss");
    let handle = Handle::new(store, cell);
    map.insert(
        key,
        RegistryEntry {
            store: store.downgrade(),
            cell: cell.downgrade(),
            handle: handle.clone(),
        },
    );
    maybe_sweep(map);
    handle
}

fn maybe_sweep(map: &DashMap<(u64, u64), RegistryEntry>) {
    if map.len() < SWEEP_AT.load(Ordering::Relaxed) {
        return;
    }
    map.retain(|_, entry| entry.is_live());
    SWEEP_AT.store(64.max(map.len() * 2), Ordering::Relaxed);
    trace!(live = map.len(), "handle registry swept");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_is_idempotent_per_pair() {
        let store = Store::new();
        let cell = Cell::new(0);

        let first = handle_for(&store, &cell);
        let second = handle_for(&store, &cell);
        assert!(first.same(&second));
    }

    #[test]
    fn dropped_cell_frees_its_entry() {
        let store = Store::new();
        let cell = Cell::new(0);
        let key_cell = cell.id();

        let _handle = handle_for(&store, &cell);
        drop(cell);

        // A fresh cell can reuse nothing from the dead entry.
        let other = Cell::new(0);
        assert_ne!(other.id(), key_cell);
        let map = registry();
        let stale = map.get(&(store.id(), key_cell)).unwrap();
        assert!(!stale.is_live());
    }

    #[test]
    fn dropped_store_invalidates_its_entries() {
        let cell = Cell::new(0);
        let store = Store::new();
        let key = (store.id(), cell.id());

        let stale_handle = handle_for(&store, &cell);
        drop(store);

        let map = registry();
        assert!(!map.get(&key).unwrap().is_live());

        // The externally held handle still works; only caching stops.
        drop(stale_handle);
    }
}
