//! Structural scanning and value substitution.
//!
//! Two walks over the same value shapes:
//!
//! - `find_signals*` collects every embedded [`Handle`] depth-first in
//!   encounter order, so a boundary knows what to subscribe to.
//! - `fill_*` replaces signals with their current read value, preserving
//!   structural sharing: an allocation with no signals underneath comes
//!   back untouched, observable via `Arc::ptr_eq`.
//!
//! Substitution is deliberately asymmetric between the two element inputs.
//! Properties are filled deeply ([`fill_signal_values`] recurses through
//! lists and maps), while children are filled shallowly
//! ([`fill_child_values`] replaces only children that are signals
//! themselves). A signal buried inside a child's own structure is still
//! detected and subscribed, but renders as an opaque marker. Matching the
//! two paths up would change observable output, so both are kept exact.
//!
//! Nested elements are opaque to both walks; primitives, null and text
//! contribute nothing. Duplicate handles produce duplicate list entries —
//! list stabilization is the boundary's job, not the scanner's.

use std::sync::Arc;

use indexmap::IndexMap;
use smallvec::SmallVec;

use super::handle::{read_handle, Handle};
use crate::error::Interrupt;
use crate::value::{Props, Value};

/// Handle list produced by a scan. Most structures embed only a few.
pub type HandleList = SmallVec<[Handle; 4]>;

/// Collect every handle embedded in a value, depth-first.
pub fn find_signals(value: &Value) -> HandleList {
    let mut out = HandleList::new();
    collect(value, &mut out);
    out
}

/// Collect every handle embedded in a children list.
pub fn find_signals_in_children(children: &[Value]) -> HandleList {
    let mut out = HandleList::new();
    for child in children {
        collect(child, &mut out);
    }
    out
}

/// Collect every handle embedded in a properties map.
pub fn find_signals_in_props(props: &Props) -> HandleList {
    let mut out = HandleList::new();
    for value in props.values() {
        collect(value, &mut out);
    }
    out
}

fn collect(value: &Value, out: &mut HandleList) {
    match value {
        Value::Signal(handle) => out.push(handle.clone()),
        Value::List(items) => {
            for item in items.iter() {
                collect(item, out);
            }
        }
        Value::Map(map) => {
            for nested in map.values() {
                collect(nested, out);
            }
        }
        _ => {}
    }
}

/// Deeply replace every embedded signal with its current read value.
///
/// Returns the original allocation when nothing inside changed. May
/// suspend through [`read_handle`], so call it only from a render pass.
pub fn fill_signal_values(value: &Value) -> Result<Value, Interrupt> {
    Ok(fill(value)?.unwrap_or_else(|| value.clone()))
}

/// Deeply substitute a properties map, sharing it when unchanged.
pub fn fill_prop_values(props: &Arc<Props>) -> Result<Arc<Props>, Interrupt> {
    let mut replaced: Option<Props> = None;
    for (index, (key, value)) in props.iter().enumerate() {
        match fill(value)? {
            Some(new_value) => {
                let out = replaced.get_or_insert_with(|| prefix_of(props, index));
                out.insert(key.clone(), new_value);
            }
            None => {
                if let Some(out) = replaced.as_mut() {
                    out.insert(key.clone(), value.clone());
                }
            }
        }
    }
    Ok(replaced.map(Arc::new).unwrap_or_else(|| Arc::clone(props)))
}

/// Shallowly substitute a children list: only children that are signals
/// themselves are replaced. Shared when unchanged.
pub fn fill_child_values(children: &Arc<Vec<Value>>) -> Result<Arc<Vec<Value>>, Interrupt> {
    let mut replaced: Option<Vec<Value>> = None;
    for (index, child) in children.iter().enumerate() {
        if let Value::Signal(handle) = child {
            let value = read_handle(handle)?;
            replaced
                .get_or_insert_with(|| children[..index].to_vec())
                .push(value);
        } else if let Some(out) = replaced.as_mut() {
            out.push(child.clone());
        }
    }
    Ok(replaced
        .map(Arc::new)
        .unwrap_or_else(|| Arc::clone(children)))
}

/// Inner walk: `None` means "unchanged, reuse the input".
fn fill(value: &Value) -> Result<Option<Value>, Interrupt> {
    match value {
        Value::Signal(handle) => read_handle(handle).map(Some),
        Value::List(items) => {
            let mut replaced: Option<Vec<Value>> = None;
            for (index, item) in items.iter().enumerate() {
                match fill(item)? {
                    Some(new_item) => {
                        replaced
                            .get_or_insert_with(|| items[..index].to_vec())
                            .push(new_item);
                    }
                    None => {
                        if let Some(out) = replaced.as_mut() {
                            out.push(item.clone());
                        }
                    }
                }
            }
            Ok(replaced.map(|items| Value::List(Arc::new(items))))
        }
        Value::Map(map) => {
            let mut replaced: Option<IndexMap<String, Value>> = None;
            for (index, (key, nested)) in map.iter().enumerate() {
                match fill(nested)? {
                    Some(new_value) => {
                        let out = replaced.get_or_insert_with(|| prefix_of(map, index));
                        out.insert(key.clone(), new_value);
                    }
                    None => {
                        if let Some(out) = replaced.as_mut() {
                            out.insert(key.clone(), nested.clone());
                        }
                    }
                }
            }
            Ok(replaced.map(|map| Value::Map(Arc::new(map))))
        }
        _ => Ok(None),
    }
}

fn prefix_of(map: &IndexMap<String, Value>, len: usize) -> IndexMap<String, Value> {
    map.iter()
        .take(len)
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::handle::signal_in;
    use crate::store::{Cell, Store};
    use indexmap::indexmap;

    fn signal_value(store: &Store, value: impl Into<Value>) -> Value {
        signal_in(&Cell::new(value), store)
    }

    #[test]
    fn finds_handles_at_all_depths_in_encounter_order() {
        let store = Store::new();
        let s0 = signal_value(&store, 0);
        let s1 = signal_value(&store, 1);
        let s3 = signal_value(&store, 3);

        // Depth 0, depth 1, and depth 3 occurrences.
        let structure = Value::list(vec![
            s0.clone(),
            Value::map(indexmap! {
                "a".to_string() => s1.clone(),
                "b".to_string() => Value::list(vec![Value::map(indexmap! {
                    "deep".to_string() => s3.clone(),
                })]),
            }),
        ]);

        let found = find_signals(&structure);
        assert_eq!(found.len(), 3);
        assert!(found[0].same(s0.as_signal().unwrap()));
        assert!(found[1].same(s1.as_signal().unwrap()));
        assert!(found[2].same(s3.as_signal().unwrap()));
    }

    #[test]
    fn finds_nothing_in_signal_free_values() {
        assert!(find_signals(&Value::Null).is_empty());
        assert!(find_signals(&Value::from(7)).is_empty());
        assert!(find_signals(&Value::from("text")).is_empty());
        assert!(find_signals(&Value::list(vec![Value::from(1), Value::from(2)])).is_empty());
        assert!(find_signals(&Value::map(indexmap! {
            "k".to_string() => Value::from("v"),
        }))
        .is_empty());
    }

    #[test]
    fn duplicate_handles_are_not_deduplicated() {
        let store = Store::new();
        let s = signal_value(&store, 1);
        let structure = Value::list(vec![s.clone(), s.clone()]);

        let found = find_signals(&structure);
        assert_eq!(found.len(), 2);
        assert!(found[0].same(&found[1]));
    }

    #[test]
    fn fill_returns_the_same_allocation_when_nothing_changed() {
        let siblings = Arc::new(vec![Value::from(1), Value::from("two")]);
        let value = Value::List(Arc::clone(&siblings));

        match fill_signal_values(&value).unwrap() {
            Value::List(out) => assert!(Arc::ptr_eq(&out, &siblings)),
            other => panic!("expected a list, got {other:?}"),
        }
    }

    #[test]
    fn fill_replaces_only_the_signal_field() {
        let store = Store::new();
        let shared_sibling = Arc::new(vec![Value::from("stable")]);
        let map = Arc::new(indexmap! {
            "static".to_string() => Value::List(Arc::clone(&shared_sibling)),
            "live".to_string() => signal_value(&store, 9),
        });
        let value = Value::Map(Arc::clone(&map));

        let filled = fill_signal_values(&value).unwrap();
        let out = match &filled {
            Value::Map(out) => out,
            other => panic!("expected a map, got {other:?}"),
        };

        // New map allocation, substituted field, untouched sibling.
        assert!(!Arc::ptr_eq(out, &map));
        assert_eq!(out["live"], Value::from(9));
        match &out["static"] {
            Value::List(items) => assert!(Arc::ptr_eq(items, &shared_sibling)),
            other => panic!("expected the shared list, got {other:?}"),
        }
    }

    #[test]
    fn child_fill_is_shallow() {
        let store = Store::new();
        let direct = signal_value(&store, 1);
        let nested = Value::list(vec![signal_value(&store, 2)]);
        let children = Arc::new(vec![direct, nested]);

        let filled = fill_child_values(&children).unwrap();
        assert_eq!(filled[0], Value::from(1));
        // The nested occurrence stays a raw signal.
        match &filled[1] {
            Value::List(items) => assert!(items[0].is_signal()),
            other => panic!("expected nested list, got {other:?}"),
        }
    }

    #[test]
    fn child_fill_shares_signal_free_lists() {
        let children = Arc::new(vec![Value::from("a"), Value::from("b")]);
        let filled = fill_child_values(&children).unwrap();
        assert!(Arc::ptr_eq(&filled, &children));
    }

    #[test]
    fn prop_fill_recurses() {
        let store = Store::new();
        let props = Arc::new(indexmap! {
            "wrap".to_string() => Value::map(indexmap! {
                "inner".to_string() => signal_value(&store, "deep"),
            }),
        });

        let filled = fill_prop_values(&props).unwrap();
        match &filled["wrap"] {
            Value::Map(inner) => assert_eq!(inner["inner"], Value::from("deep")),
            other => panic!("expected a map, got {other:?}"),
        }
    }
}
