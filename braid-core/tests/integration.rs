//! Integration tests for the signal bridge.
//!
//! These tests exercise the full path: a cell wrapped as a signal value,
//! embedded in an element, mounted by the host, and re-rendered when the
//! cell changes or a pending value settles.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use indexmap::indexmap;

use braid_core::bridge::find_signals;
use braid_core::{
    create_element, default_store, signal, signal_in, Cell, Committed, PendingValue, Props,
    RenderError, Renderer, Store, Value,
};

/// Wrapping the same cell twice yields the same embedded handle.
#[test]
fn signal_wrapping_is_idempotent_per_cell() {
    let store = Store::new();
    let cell = Cell::new(0);

    let a = signal_in(&cell, &store);
    let b = signal_in(&cell, &store);
    assert!(a
        .as_signal()
        .unwrap()
        .same(b.as_signal().unwrap()));

    // And likewise through the default store.
    let c = signal(&cell);
    let d = signal(&cell);
    assert!(c.as_signal().unwrap().same(d.as_signal().unwrap()));
}

/// The default store is shared process-wide.
#[test]
fn default_store_identity_is_stable() {
    assert_eq!(default_store().id(), default_store().id());
}

/// A counter cell embedded as a direct child re-renders its boundary only.
#[test]
fn counter_child_rerenders_through_the_boundary() {
    let store = Store::new();
    let counter = Cell::new(1);
    let mut renderer = Renderer::new();

    let app = create_element(
        "div",
        Props::new(),
        vec![
            Value::from("static "),
            Value::element(create_element(
                "span",
                Props::new(),
                vec![signal_in(&counter, &store)],
            )),
        ],
    );
    renderer.mount(app).unwrap();
    assert_eq!(renderer.boundary_count(), 1);
    assert_eq!(renderer.committed().unwrap().text_content(), "static 1");

    counter.set(2);
    assert_eq!(renderer.flush().unwrap(), 1);
    assert_eq!(renderer.committed().unwrap().text_content(), "static 2");
}

/// Without signals, the factory output is a plain node tree.
#[test]
fn signal_free_trees_have_no_wrapper() {
    let element = create_element(
        "section",
        indexmap! { "id".to_string() => Value::from("main") },
        vec![Value::from("static content")],
    );
    assert!(element.is_node());

    let mut renderer = Renderer::new();
    renderer.mount(element).unwrap();
    assert_eq!(renderer.boundary_count(), 0);
}

/// A pending cell suspends the boundary and resumes with the settled
/// value, even when settlement happens on another thread.
#[test]
fn pending_cell_resolves_across_threads() {
    let store = Store::new();
    let pending = PendingValue::new();
    let cell = Cell::pending(pending.clone());
    let mut renderer = Renderer::new();

    let app = create_element("span", Props::new(), vec![signal_in(&cell, &store)]);
    renderer.mount(app).unwrap();
    assert_eq!(renderer.committed(), Some(Committed::Placeholder));

    let resolver = thread::spawn(move || {
        thread::sleep(Duration::from_millis(10));
        pending.resolve(Value::from("ready"));
    });
    resolver.join().unwrap();

    renderer.flush().unwrap();
    assert_eq!(renderer.committed().unwrap().text_content(), "ready");
}

/// A rejected pending cell fails the render pass with its reason.
#[test]
fn pending_cell_rejection_fails_the_pass() {
    let store = Store::new();
    let pending = PendingValue::new();
    let cell = Cell::pending(pending.clone());
    let mut renderer = Renderer::new();

    let app = create_element("span", Props::new(), vec![signal_in(&cell, &store)]);
    renderer.mount(app).unwrap();

    pending.reject("E");
    assert_eq!(
        renderer.flush().unwrap_err(),
        RenderError::RejectedRead {
            reason: Arc::from("E")
        }
    );
}

/// The substitution asymmetry: a signal nested inside a child's own
/// structure is detected (and subscribed) but not substituted, while the
/// identical nesting inside props is substituted.
#[test]
fn children_and_props_substitute_asymmetrically() {
    let store = Store::new();
    let cell = Cell::new("live");
    let nested = Value::map(indexmap! {
        "inner".to_string() => signal_in(&cell, &store),
    });

    let app = create_element(
        "div",
        indexmap! { "wrap".to_string() => nested.clone() },
        vec![nested.clone()],
    );

    // Both occurrences are discovered.
    let boundary = match &app {
        braid_core::Element::Boundary(b) => b,
        other => panic!("expected a boundary, got {other:?}"),
    };
    assert_eq!(boundary.handles.len(), 2);

    let mut renderer = Renderer::new();
    renderer.mount(app).unwrap();

    match renderer.committed().unwrap() {
        Committed::Node {
            props, children, ..
        } => {
            // Props path: deep substitution happened.
            match &props["wrap"] {
                Value::Map(map) => assert_eq!(map["inner"], Value::from("live")),
                other => panic!("expected a map prop, got {other:?}"),
            }
            // Children path: the nested signal is still raw.
            match &children[0] {
                Committed::Text(Value::Map(map)) => assert!(map["inner"].is_signal()),
                other => panic!("expected a raw map child, got {other:?}"),
            }
        }
        other => panic!("expected a node, got {other:?}"),
    }
}

/// The same signal in several places produces duplicate scan entries but
/// a single working boundary.
#[test]
fn repeated_signals_scan_as_duplicates() {
    let store = Store::new();
    let cell = Cell::new(7);
    let wrapped = signal_in(&cell, &store);

    let structure = Value::list(vec![wrapped.clone(), wrapped.clone()]);
    assert_eq!(find_signals(&structure).len(), 2);

    let mut renderer = Renderer::new();
    let app = create_element(
        "div",
        Props::new(),
        vec![wrapped.clone(), Value::from("/"), wrapped],
    );
    renderer.mount(app).unwrap();
    assert_eq!(renderer.committed().unwrap().text_content(), "7/7");

    cell.set(8);
    renderer.flush().unwrap();
    assert_eq!(renderer.committed().unwrap().text_content(), "8/8");
}

/// Unmounting tears every subscription down; later writes go nowhere.
#[test]
fn unmount_disconnects_the_cell() {
    let store = Store::new();
    let cell = Cell::new(0);
    let mut renderer = Renderer::new();

    let app = create_element("span", Props::new(), vec![signal_in(&cell, &store)]);
    renderer.mount(app).unwrap();
    assert_eq!(cell.subscriber_count(), 1);

    renderer.unmount();
    assert_eq!(cell.subscriber_count(), 0);

    cell.set(99);
    assert_eq!(renderer.flush().unwrap(), 0);
    assert_eq!(renderer.committed(), None);
}

/// Two independent signal children of one element share one boundary;
/// either firing re-renders it with both current values.
#[test]
fn multiple_signals_share_one_boundary() {
    let store = Store::new();
    let first = Cell::new("a");
    let second = Cell::new("b");
    let mut renderer = Renderer::new();

    let app = create_element(
        "div",
        Props::new(),
        vec![signal_in(&first, &store), signal_in(&second, &store)],
    );
    renderer.mount(app).unwrap();
    assert_eq!(renderer.boundary_count(), 1);
    assert_eq!(renderer.committed().unwrap().text_content(), "ab");

    second.set("c");
    assert_eq!(renderer.flush().unwrap(), 1);
    assert_eq!(renderer.committed().unwrap().text_content(), "ac");
}
