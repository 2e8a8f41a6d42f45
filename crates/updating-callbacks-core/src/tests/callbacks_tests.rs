use super::*;
use crate::callbacks;

fn double((x,): (i32,)) -> i32 {
    x * 2
}

fn negate((x,): (i32,)) -> i32 {
    -x
}

#[test]
fn macro_builds_nested_mapping() {
    let tree: Callbacks<(i32,), i32> = callbacks! {
        double => double,
        inner: {
            negate => negate,
            deeper: { triple => |(x,): (i32,)| x * 3 },
        },
        empty: {},
    };

    assert_eq!(tree.len(), 3);
    assert_eq!(tree.callback("double").unwrap().call((4,)), 8);
    let inner = tree.nested("inner").unwrap();
    assert_eq!(inner.callback("negate").unwrap().call((4,)), -4);
    assert_eq!(inner.nested("deeper").unwrap().callback("triple").unwrap().call((4,)), 12);
    assert!(tree.nested("empty").unwrap().is_empty());
    assert!(tree.callback("inner").is_none());
    assert!(tree.nested("double").is_none());
}

#[test]
fn shape_describes_kinds_per_key() {
    let tree: Callbacks<(i32,), i32> = callbacks! {
        a => double,
        b: { c => negate },
    };

    let mut expected_b = BTreeMap::new();
    expected_b.insert("c".to_string(), Shape::Callable);
    let mut expected = BTreeMap::new();
    expected.insert("a".to_string(), Shape::Callable);
    expected.insert("b".to_string(), Shape::Nested(expected_b));

    assert_eq!(tree.shape(), Shape::Nested(expected));
    assert_eq!(tree.get("a").map(CallbackTree::kind), Some(CallbackKind::Callable));
    assert_eq!(tree.get("b").map(CallbackTree::kind), Some(CallbackKind::Nested));
}

#[test]
fn insert_does_not_affect_other_snapshot_holders() {
    let original: Callbacks<(i32,), i32> = callbacks! { a => double };
    let mut edited = original.clone();
    assert!(edited.ptr_eq(&original));

    edited.insert("a", Callback::new(negate));
    edited.insert("b", Callbacks::new());

    assert!(!edited.ptr_eq(&original));
    assert_eq!(original.len(), 1);
    assert_eq!(original.callback("a").unwrap().call((5,)), 10);
    assert_eq!(edited.callback("a").unwrap().call((5,)), -5);
    assert!(edited.remove("b").is_some());
    assert!(!edited.contains_key("b"));
}

#[test]
fn collects_from_iterator() {
    let tree: Callbacks<(i32,), i32> = vec![
        ("a", CallbackTree::from(Callback::new(double))),
        ("b", CallbackTree::from(Callbacks::new())),
    ]
    .into_iter()
    .collect();

    let mut keys: Vec<_> = tree.keys().collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["a", "b"]);
}
