//! Braid Core
//!
//! This crate bridges fine-grained reactive value cells into a component
//! element tree. A cell is wrapped as an opaque signal value, embedded
//! anywhere in an element's props or children, and when the cell changes
//! only the smallest enclosing render boundary re-executes — the rest of
//! the tree is untouched.
//!
//! # Architecture
//!
//! The crate is organized into four modules:
//!
//! - `store`: reactive value cells, pending asynchronous values, and the
//!   store abstraction with its process-wide default instance
//! - `value`: the displayable value tree that props and children are made
//!   of, including the embedded-signal variant
//! - `bridge`: signal handles, the handle registry, structural scanning
//!   and substitution, and the per-boundary subscription state machine
//! - `render`: element creation with signal detection, and the host
//!   runtime that mounts trees and drives boundary re-renders
//!
//! # Example
//!
//! ```rust
//! use braid_core::{create_element, signal, Cell, Props, Renderer};
//!
//! // A cell holding a counter.
//! let count = Cell::new(1);
//!
//! // Embed it as a child; the factory interposes a render boundary.
//! let app = create_element("span", Props::new(), vec![signal(&count)]);
//!
//! let mut renderer = Renderer::new();
//! renderer.mount(app).unwrap();
//! assert_eq!(renderer.committed().unwrap().text_content(), "1");
//!
//! // The write fires the boundary's subscription; flushing re-renders
//! // just that boundary.
//! count.set(2);
//! renderer.flush().unwrap();
//! assert_eq!(renderer.committed().unwrap().text_content(), "2");
//! ```

pub mod bridge;
pub mod error;
pub mod render;
pub mod store;
pub mod value;

pub use bridge::{
    read_handle, same_handle_list, same_list, signal, signal_in, BoundaryState, Handle,
    SignalBoundary,
};
pub use error::{Interrupt, RenderError};
pub use render::{create_element, Committed, Element, Renderer};
pub use store::{
    default_store, Cell, CellValue, PendingStatus, PendingValue, Settlement, Store, SubscriberId,
    Subscription,
};
pub use value::{Props, Value};
