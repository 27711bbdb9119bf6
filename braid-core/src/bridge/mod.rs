//! Signal-to-element bridging.
//!
//! This module is the heart of the crate: it connects the reactive store
//! in [`crate::store`] to the element tree in [`crate::render`] so that a
//! value change re-renders only the smallest enclosing boundary.
//!
//! The pieces, leaf to root:
//!
//! - [`Handle`] wraps one (store, cell) pair behind subscribe/read
//!   delegates; the registry keeps one stable handle per pair.
//! - [`signal`] / [`signal_in`] wrap a cell as a [`crate::value::Value`]
//!   that can sit anywhere a displayable value is accepted.
//! - [`find_signals`] and friends walk props and children to discover
//!   embedded handles; [`fill_signal_values`] and friends replace them
//!   with live values, preserving structural sharing.
//! - [`SignalBoundary`] owns the subscription lifecycle of one render
//!   boundary and turns handle fires into rerender requests.

mod boundary;
mod handle;
mod registry;
mod scan;

pub use boundary::{same_handle_list, same_list, BoundaryState, SignalBoundary};
pub use handle::{read_handle, signal, signal_in, Handle};
pub use scan::{
    fill_child_values, fill_prop_values, fill_signal_values, find_signals,
    find_signals_in_children, find_signals_in_props, HandleList,
};
