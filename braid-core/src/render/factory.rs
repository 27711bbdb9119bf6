//! Element creation with signal detection.
//!
//! `create_element` is the drop-in replacement for the node-creation
//! primitive. It scans the supplied children and props for embedded
//! signals; with none present it builds the node directly — same output,
//! zero overhead. With at least one present it emits a boundary element
//! instead, carrying the discovered handles (children first, then props)
//! and a deferred closure that substitutes current values and builds the
//! real node.

use std::sync::Arc;

use tracing::trace;

use super::element::{BoundaryElement, Element, NodeElement, RenderFn};
use crate::bridge::{
    fill_child_values, fill_prop_values, find_signals_in_children, find_signals_in_props,
};
use crate::value::{Props, Value};

/// Create an element, routing through a signal boundary when needed.
pub fn create_element(tag: impl Into<Arc<str>>, props: Props, children: Vec<Value>) -> Element {
    let mut handles = find_signals_in_children(&children);
    handles.extend(find_signals_in_props(&props));

    if handles.is_empty() {
        return Element::node(tag, props, children);
    }

    let tag = tag.into();
    trace!(tag = %tag, signals = handles.len(), "routing element through a boundary");

    let props = Arc::new(props);
    let children = Arc::new(children);
    let render: RenderFn = {
        let tag = Arc::clone(&tag);
        Arc::new(move || {
            // Children substitute shallowly, props deeply.
            let children = fill_child_values(&children)?;
            let props = fill_prop_values(&props)?;
            Ok(Element::Node(NodeElement {
                tag: Arc::clone(&tag),
                props,
                children,
            }))
        })
    };

    Element::Boundary(BoundaryElement {
        handles: handles.into_vec(),
        render,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::signal_in;
    use crate::store::{Cell, Store};
    use indexmap::indexmap;

    #[test]
    fn signal_free_calls_build_the_node_directly() {
        let element = create_element(
            "div",
            indexmap! { "title".to_string() => Value::from("hi") },
            vec![Value::from("body")],
        );

        assert!(element.is_node());
        assert_eq!(element.tag(), Some("div"));
    }

    #[test]
    fn a_signal_child_routes_through_a_boundary() {
        let store = Store::new();
        let cell = Cell::new(1);

        let element = create_element("span", Props::new(), vec![signal_in(&cell, &store)]);
        assert!(element.is_boundary());
    }

    #[test]
    fn a_signal_nested_in_props_routes_through_a_boundary() {
        let store = Store::new();
        let cell = Cell::new(1);
        let props = indexmap! {
            "style".to_string() => Value::map(indexmap! {
                "width".to_string() => signal_in(&cell, &store),
            }),
        };

        let element = create_element("div", props, vec![]);
        assert!(element.is_boundary());
    }

    #[test]
    fn handle_order_is_children_first_then_props() {
        let store = Store::new();
        let child_cell = Cell::new(1);
        let prop_cell = Cell::new(2);
        let child_signal = signal_in(&child_cell, &store);
        let prop_signal = signal_in(&prop_cell, &store);

        let element = create_element(
            "div",
            indexmap! { "count".to_string() => prop_signal.clone() },
            vec![child_signal.clone()],
        );

        let boundary = match element {
            Element::Boundary(b) => b,
            other => panic!("expected a boundary, got {other:?}"),
        };
        assert_eq!(boundary.handles.len(), 2);
        assert!(boundary.handles[0].same(child_signal.as_signal().unwrap()));
        assert!(boundary.handles[1].same(prop_signal.as_signal().unwrap()));
    }

    #[test]
    fn the_deferred_render_substitutes_current_values() {
        let store = Store::new();
        let cell = Cell::new(1);

        let element = create_element("span", Props::new(), vec![signal_in(&cell, &store)]);
        let boundary = match element {
            Element::Boundary(b) => b,
            other => panic!("expected a boundary, got {other:?}"),
        };

        let rendered = (boundary.render)().unwrap();
        match &rendered {
            Element::Node(node) => assert_eq!(node.children[0], Value::from(1)),
            other => panic!("expected a node, got {other:?}"),
        }

        // A later invocation sees the new value: no output caching.
        cell.set(2);
        let rendered = (boundary.render)().unwrap();
        match &rendered {
            Element::Node(node) => assert_eq!(node.children[0], Value::from(2)),
            other => panic!("expected a node, got {other:?}"),
        }
    }
}
