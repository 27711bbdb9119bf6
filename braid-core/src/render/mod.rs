//! Element creation and the render host.
//!
//! [`create_element`] is the application-facing entry point: it behaves
//! exactly like the plain node primitive until a signal shows up in its
//! inputs, at which point it interposes a render boundary. [`Renderer`]
//! is the host that mounts the resulting trees and drives boundary
//! re-renders.

mod element;
mod factory;
mod runtime;

pub use element::{BoundaryElement, Element, NodeElement, RenderFn};
pub use factory::create_element;
pub use runtime::{Committed, Renderer};
