use super::*;
use crate::{callbacks, CallbackError, CallbackKind};
use std::cell::Cell;

type Args = (i64, i64);

fn sum((a, b): Args) -> i64 {
    a + b
}

fn max((a, b): Args) -> i64 {
    a.max(b)
}

fn difference((a, b): Args) -> i64 {
    a - b
}

fn product((a, b): Args) -> i64 {
    a * b
}

#[test]
fn get_or_init_runs_create_once() {
    let creations = Cell::new(0);
    let mut slot: UpdatingRef<i32, Rc<i32>> = UpdatingRef::new(1);
    assert!(!slot.is_initialized());

    let first = slot.update(2, |cell| {
        creations.set(creations.get() + 1);
        Rc::new(cell.get() * 10)
    });
    let second = slot.update(3, |_| {
        creations.set(creations.get() + 1);
        Rc::new(0)
    });

    assert_eq!(creations.get(), 1);
    assert!(slot.is_initialized());
    assert!(Rc::ptr_eq(&first, &second));
    assert_eq!(*first, 20);
    assert_eq!(slot.cell().get(), 3);
}

#[test]
fn shadow_identity_is_stable_across_refreshes() {
    let mut slot = UpdatingCallbacks::new(callbacks! { a => sum });
    let first = slot.update(callbacks! { a => sum });

    for _ in 0..5 {
        let again = slot.update(callbacks! { a => max });
        assert!(again.ptr_eq(&first));
    }
}

#[test]
fn latest_supplied_callbacks_win() {
    let v1: Callbacks<Args, i64> = callbacks! {
        a => sum,
        b => max,
        c: { d => difference, e: { f => product } },
    };
    let v2: Callbacks<Args, i64> = callbacks! {
        a => product,
        b => difference,
        c: { d => max, e: { f => sum } },
    };

    let mut slot = UpdatingCallbacks::new(v1.clone());
    let shadow = slot.update(v1);
    let f = shadow.trampoline_at("c.e.f").unwrap().clone();
    assert_eq!(f.call((42, 23)), Ok(product((42, 23))));

    let after = slot.update(v2);
    assert!(after.ptr_eq(&shadow));
    assert_eq!(shadow.trampoline("a").unwrap().call((23, 42)), Ok(product((23, 42))));
    assert_eq!(f.call((42, 23)), Ok(sum((42, 23))));
}

#[test]
fn shape_drift_fails_lazily_without_rebuilding() {
    let mut slot = UpdatingCallbacks::new(callbacks! { a => sum, b => max });
    let shadow = slot.update(callbacks! { a => sum, b => max });

    let drifted = slot.update(callbacks! { a: { inner => sum }, b => max });

    assert!(drifted.ptr_eq(&shadow));
    assert_eq!(drifted.shape(), callbacks!(a => sum, b => max).shape());
    assert_eq!(shadow.trampoline("b").unwrap().call((1, 2)), Ok(2));
    assert_eq!(
        shadow.trampoline("a").unwrap().call((1, 2)),
        Err(CallbackError::ShapeViolation {
            path: "a".into(),
            expected: CallbackKind::Callable,
            found: Some(CallbackKind::Nested),
        })
    );

    slot.update(callbacks! { a => difference, b => max });
    assert_eq!(shadow.trampoline("a").unwrap().call((1, 2)), Ok(-1));
}

#[test]
fn writes_through_cell_are_seen_on_next_call() {
    let mut slot = UpdatingCallbacks::new(callbacks! { a => sum });
    let shadow = slot.shadow();

    slot.cell().replace(callbacks! { a => product });

    assert_eq!(shadow.trampoline("a").unwrap().call((3, 4)), Ok(12));
    assert!(slot.current().callback("a").is_some());
}

#[test]
fn empty_callbacks_are_supported() {
    let mut slot: UpdatingCallbacks<Args, i64> = UpdatingCallbacks::new(Callbacks::new());
    let shadow = slot.update(Callbacks::new());

    assert!(shadow.is_empty());
    assert!(slot.update(Callbacks::new()).ptr_eq(&shadow));
}

#[test]
fn stable_callback_forwards_to_latest() {
    let mut slot = UpdatingCallback::new(Callback::new(sum));
    let stable = slot.update(Callback::new(sum));
    assert_eq!(stable.call((2, 3)), 5);

    let again = slot.update(Callback::new(product));
    assert!(again.ptr_eq(&stable));
    assert_eq!(stable.call((2, 3)), 6);
}

#[test]
fn stable_callback_is_not_the_supplied_callback() {
    let supplied = Callback::new(sum);
    let mut slot = UpdatingCallback::new(supplied.clone());
    let stable = slot.update(supplied.clone());

    assert!(!stable.ptr_eq(&supplied));
    assert!(slot.cell().get().ptr_eq(&supplied));
}

#[test]
fn stable_callback_sees_captured_state_of_latest_closure() {
    let mut slot = UpdatingCallback::new(Callback::new(|()| 0));
    let stable = slot.stable();

    for generation in 1..=3 {
        slot.update(Callback::new(move |()| generation));
    }

    assert_eq!(stable.call(()), 3);
}
