//! Element descriptions.
//!
//! An `Element` is an immutable description of output, produced by the
//! factory and consumed by the host runtime. Plain nodes carry a tag,
//! props and children; boundary elements carry the handle list discovered
//! at creation plus a deferred render closure that materializes the real
//! node with live values.

use std::fmt;
use std::sync::Arc;

use crate::bridge::Handle;
use crate::error::Interrupt;
use crate::value::{Props, Value};

/// Deferred render callback of a boundary element. Re-invoked on every
/// render pass; may suspend or fail through [`Interrupt`].
pub type RenderFn = Arc<dyn Fn() -> Result<Element, Interrupt> + Send + Sync>;

/// A plain element node.
#[derive(Clone)]
pub struct NodeElement {
    /// Element tag.
    pub tag: Arc<str>,

    /// Property map.
    pub props: Arc<Props>,

    /// Child values (text, nested elements, raw signals).
    pub children: Arc<Vec<Value>>,
}

/// A render boundary wrapping one deferred node creation.
#[derive(Clone)]
pub struct BoundaryElement {
    /// Handles discovered in the wrapped children and props, children
    /// first.
    pub handles: Vec<Handle>,

    /// Produces the wrapped node with current values.
    pub render: RenderFn,
}

/// An element description.
#[derive(Clone)]
pub enum Element {
    /// A plain node.
    Node(NodeElement),

    /// A boundary around a node with embedded signals.
    Boundary(BoundaryElement),
}

impl Element {
    /// The element-creation primitive: builds a plain node directly, with
    /// no scanning and no wrapping.
    pub fn node(tag: impl Into<Arc<str>>, props: Props, children: Vec<Value>) -> Element {
        Element::Node(NodeElement {
            tag: tag.into(),
            props: Arc::new(props),
            children: Arc::new(children),
        })
    }

    /// Whether this is a plain node.
    pub fn is_node(&self) -> bool {
        matches!(self, Element::Node(_))
    }

    /// Whether this is a boundary.
    pub fn is_boundary(&self) -> bool {
        matches!(self, Element::Boundary(_))
    }

    /// The node tag, when this is a plain node.
    pub fn tag(&self) -> Option<&str> {
        match self {
            Element::Node(node) => Some(&node.tag),
            Element::Boundary(_) => None,
        }
    }
}

impl fmt::Debug for NodeElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeElement")
            .field("tag", &self.tag)
            .field("props", &self.props)
            .field("children", &self.children)
            .finish()
    }
}

impl fmt::Debug for BoundaryElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundaryElement")
            .field("handles", &self.handles.len())
            .finish()
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Node(node) => node.fmt(f),
            Element::Boundary(boundary) => boundary.fmt(f),
        }
    }
}
