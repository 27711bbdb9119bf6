//! Reactive store abstraction.
//!
//! This module provides the value-cell side of the bridge: cells that hold
//! displayable (or pending) values and notify subscribers on change,
//! stores that scope them, and the pending-value status machine used for
//! asynchronous reads.
//!
//! The bridging layer in [`crate::bridge`] consumes only this surface:
//! `Store::subscribe`, `Store::read`, and `default_store`. It never
//! mutates a cell.

mod cell;
mod pending;
mod store;
mod subscriber;

pub use cell::{Cell, CellValue};
pub use pending::{PendingStatus, PendingValue, Settlement};
pub use store::{default_store, Store};
pub use subscriber::{SubscriberId, Subscription};

pub(crate) use cell::CellInner;
pub(crate) use store::StoreInner;
