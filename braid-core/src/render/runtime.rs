//! The render host.
//!
//! `Renderer` is the minimal host engine that drives boundary elements:
//! it mounts an element tree, keeps one persistent `BoundaryInstance` per
//! boundary (state that survives across renders of the same spot in the
//! tree), and re-renders exactly the boundaries whose handles fired.
//!
//! # Scheduling
//!
//! All rerender requests funnel into a shared queue of boundary IDs. A
//! handle fire or a pending-value settlement enqueues the owning
//! boundary's ID; [`Renderer::flush`] drains the queue in rounds,
//! re-rendering each dirty boundary once per round. Requests that arrive
//! for an ID no longer in the tree (the boundary was unmounted, or was
//! replaced by a parent's re-render) are ignored.
//!
//! # Suspension
//!
//! A boundary whose render suspends commits a placeholder, registers a
//! settlement waiter that enqueues its ID, and resumes on the next flush.
//! A rejected read marks the boundary failed and surfaces the error from
//! `mount`/`flush` — the nearest-error-boundary of this host is the root.

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use super::element::{BoundaryElement, Element};
use crate::bridge::SignalBoundary;
use crate::error::{Interrupt, RenderError};
use crate::value::{Props, Value};

/// Bound on flush rounds, in case a subscription fires from within its own
/// render.
const MAX_FLUSH_ROUNDS: usize = 64;

/// Committed output of a mounted tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Committed {
    /// A rendered node.
    Node {
        /// Element tag.
        tag: Arc<str>,
        /// Rendered props.
        props: Arc<Props>,
        /// Rendered children.
        children: Vec<Committed>,
    },

    /// A displayable leaf.
    Text(Value),

    /// A boundary parked on an unsettled pending value.
    Placeholder,

    /// A boundary whose render failed.
    Failed(RenderError),
}

impl Committed {
    /// Concatenated text content of every leaf under this node.
    pub fn text_content(&self) -> String {
        match self {
            Committed::Node { children, .. } => {
                children.iter().map(Committed::text_content).collect()
            }
            Committed::Text(value) => value.to_string(),
            Committed::Placeholder | Committed::Failed(_) => String::new(),
        }
    }
}

/// Shared rerender queue: dirty boundary IDs plus the ID allocator.
struct RenderQueue {
    dirty: Mutex<Vec<u64>>,
    next_id: AtomicU64,
}

impl RenderQueue {
    fn new() -> Self {
        Self {
            dirty: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    fn allocate(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Enqueue a boundary for re-render. Duplicate requests coalesce.
    fn request(&self, id: u64) {
        let mut dirty = self.dirty.lock();
        if !dirty.contains(&id) {
            dirty.push(id);
        }
    }

    fn take(&self) -> Vec<u64> {
        std::mem::take(&mut *self.dirty.lock())
    }
}

/// What a boundary currently shows.
enum InnerState {
    /// Last render succeeded; this is its mounted output.
    Live(Box<Mounted>),

    /// Last render suspended; waiting for settlement.
    Awaiting,

    /// Last render failed.
    Failed(RenderError),
}

/// Persistent per-boundary state, kept across renders.
struct BoundaryInstance {
    id: u64,
    element: BoundaryElement,
    boundary: SignalBoundary,
    inner: InnerState,
}

/// A mounted tree node.
enum Mounted {
    Node {
        tag: Arc<str>,
        props: Arc<Props>,
        children: Vec<Mounted>,
    },
    Text(Value),
    Boundary(Box<BoundaryInstance>),
}

/// The render host.
pub struct Renderer {
    root: Option<Mounted>,
    queue: Arc<RenderQueue>,
}

impl Renderer {
    /// Create an empty renderer.
    pub fn new() -> Self {
        Self {
            root: None,
            queue: Arc::new(RenderQueue::new()),
        }
    }

    /// Mount an element tree, rendering every boundary once.
    ///
    /// The tree stays mounted even when a boundary fails; the first
    /// failure is returned.
    pub fn mount(&mut self, element: Element) -> Result<(), RenderError> {
        self.unmount();
        let mut first_err = None;
        self.root = Some(mount_element(element, &self.queue, &mut first_err));
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Re-render every boundary with a queued rerender request.
    ///
    /// Returns the number of boundary render passes performed. Requests
    /// for unmounted boundaries are dropped silently.
    pub fn flush(&mut self) -> Result<u64, RenderError> {
        let mut passes = 0u64;
        let mut first_err = None;
        let mut rounds = 0usize;

        loop {
            let dirty = self.queue.take();
            if dirty.is_empty() {
                break;
            }
            if rounds == MAX_FLUSH_ROUNDS {
                warn!("flush did not settle after {MAX_FLUSH_ROUNDS} rounds; giving up");
                break;
            }
            rounds += 1;
            let dirty: HashSet<u64> = dirty.into_iter().collect();
            debug!(boundaries = dirty.len(), "flushing rerender requests");
            if let Some(root) = self.root.as_mut() {
                passes += flush_node(root, &dirty, &self.queue, &mut first_err);
            }
        }

        match first_err {
            Some(err) => Err(err),
            None => Ok(passes),
        }
    }

    /// Snapshot of the committed output, if something is mounted.
    pub fn committed(&self) -> Option<Committed> {
        self.root.as_ref().map(snapshot)
    }

    /// Number of live boundary instances in the mounted tree.
    pub fn boundary_count(&self) -> usize {
        self.root.as_ref().map_or(0, count_boundaries)
    }

    /// Tear down the mounted tree, dropping every subscription.
    pub fn unmount(&mut self) {
        self.root = None;
        self.queue.take();
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("mounted", &self.root.is_some())
            .field("boundaries", &self.boundary_count())
            .finish()
    }
}

fn mount_element(
    element: Element,
    queue: &Arc<RenderQueue>,
    first_err: &mut Option<RenderError>,
) -> Mounted {
    match element {
        Element::Node(node) => {
            let children = node
                .children
                .iter()
                .map(|child| mount_child(child, queue, first_err))
                .collect();
            Mounted::Node {
                tag: node.tag,
                props: node.props,
                children,
            }
        }
        Element::Boundary(boundary_element) => {
            let id = queue.allocate();
            let hook = {
                let queue = Arc::clone(queue);
                Arc::new(move || queue.request(id))
            };
            let mut instance = BoundaryInstance {
                id,
                element: boundary_element,
                boundary: SignalBoundary::new(hook),
                inner: InnerState::Awaiting,
            };
            render_instance(&mut instance, queue, first_err);
            Mounted::Boundary(Box::new(instance))
        }
    }
}

fn mount_child(
    child: &Value,
    queue: &Arc<RenderQueue>,
    first_err: &mut Option<RenderError>,
) -> Mounted {
    match child {
        Value::Element(element) => mount_element((**element).clone(), queue, first_err),
        other => Mounted::Text(other.clone()),
    }
}

/// One render pass of one boundary instance.
fn render_instance(
    instance: &mut BoundaryInstance,
    queue: &Arc<RenderQueue>,
    first_err: &mut Option<RenderError>,
) {
    instance.boundary.commit(&instance.element.handles);
    instance.boundary.mark_rendered();

    match (instance.element.render)() {
        Ok(element) => {
            // Replacing the inner tree drops the previous one, which tears
            // down any nested boundary subscriptions.
            instance.inner =
                InnerState::Live(Box::new(mount_element(element, queue, first_err)));
        }
        Err(Interrupt::Suspend(pending)) => {
            debug!(boundary = instance.id, "render suspended on pending value");
            let id = instance.id;
            let settle_queue = Arc::clone(queue);
            pending.on_settle(move |_| settle_queue.request(id));
            instance.inner = InnerState::Awaiting;
        }
        Err(Interrupt::Failed(err)) => {
            debug!(boundary = instance.id, %err, "render failed");
            instance.inner = InnerState::Failed(err.clone());
            if first_err.is_none() {
                *first_err = Some(err);
            }
        }
    }
}

fn flush_node(
    node: &mut Mounted,
    dirty: &HashSet<u64>,
    queue: &Arc<RenderQueue>,
    first_err: &mut Option<RenderError>,
) -> u64 {
    match node {
        Mounted::Node { children, .. } => children
            .iter_mut()
            .map(|child| flush_node(child, dirty, queue, first_err))
            .sum(),
        Mounted::Text(_) => 0,
        Mounted::Boundary(instance) => {
            if dirty.contains(&instance.id) {
                render_instance(instance, queue, first_err);
                1
            } else if let InnerState::Live(inner) = &mut instance.inner {
                flush_node(inner, dirty, queue, first_err)
            } else {
                0
            }
        }
    }
}

fn snapshot(node: &Mounted) -> Committed {
    match node {
        Mounted::Node {
            tag,
            props,
            children,
        } => Committed::Node {
            tag: Arc::clone(tag),
            props: Arc::clone(props),
            children: children.iter().map(snapshot).collect(),
        },
        Mounted::Text(value) => Committed::Text(value.clone()),
        // Boundaries are transparent in committed output.
        Mounted::Boundary(instance) => match &instance.inner {
            InnerState::Live(inner) => snapshot(inner),
            InnerState::Awaiting => Committed::Placeholder,
            InnerState::Failed(err) => Committed::Failed(err.clone()),
        },
    }
}

fn count_boundaries(node: &Mounted) -> usize {
    match node {
        Mounted::Node { children, .. } => children.iter().map(count_boundaries).sum(),
        Mounted::Text(_) => 0,
        Mounted::Boundary(instance) => {
            1 + match &instance.inner {
                InnerState::Live(inner) => count_boundaries(inner),
                _ => 0,
            }
        }
    }
}
