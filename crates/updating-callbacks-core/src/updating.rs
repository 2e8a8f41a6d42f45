//! Per-slot state that keeps one stable handle alive across refreshes while
//! the value behind it is replaced.

use std::rc::Rc;

use crate::callbacks::{Callback, Callbacks};
use crate::owned::Owned;
use crate::replace::{Accessor, ShadowCallbacks};

/// A cell holding the latest value for a slot plus a stable handle built from
/// that cell the first time it is requested.
pub struct UpdatingRef<T, S> {
    current: Owned<T>,
    stable: Option<S>,
}

impl<T, S: Clone> UpdatingRef<T, S> {
    pub fn new(initial: T) -> Self {
        Self {
            current: Owned::new(initial),
            stable: None,
        }
    }

    /// Handle to the cell. Writes through it are seen by the stable handle on
    /// its next use.
    pub fn cell(&self) -> Owned<T> {
        self.current.clone()
    }

    pub fn set_current(&self, value: T) {
        self.current.replace(value);
    }

    pub fn is_initialized(&self) -> bool {
        self.stable.is_some()
    }

    /// Return the stable handle, running `create` only if none exists yet.
    pub fn get_or_init(&mut self, create: impl FnOnce(&Owned<T>) -> S) -> S {
        if let Some(stable) = &self.stable {
            return stable.clone();
        }
        let stable = create(&self.current);
        self.stable = Some(stable.clone());
        stable
    }

    /// One refresh cycle: store `value`, then hand back the stable handle.
    pub fn update(&mut self, value: T, create: impl FnOnce(&Owned<T>) -> S) -> S {
        self.set_current(value);
        self.get_or_init(create)
    }
}

/// Stable shadow over a callback tree that is re-supplied every refresh.
///
/// The shadow is built from the shape of the first mapping and never rebuilt;
/// later mappings with a different shape surface as
/// [`crate::CallbackError::ShapeViolation`] when an affected trampoline is
/// called.
pub struct UpdatingCallbacks<A, R> {
    slot: UpdatingRef<Callbacks<A, R>, ShadowCallbacks<A, R>>,
}

impl<A: 'static, R: 'static> UpdatingCallbacks<A, R> {
    pub fn new(initial: Callbacks<A, R>) -> Self {
        Self {
            slot: UpdatingRef::new(initial),
        }
    }

    pub fn update(&mut self, callbacks: Callbacks<A, R>) -> ShadowCallbacks<A, R> {
        self.slot.set_current(callbacks);
        self.shadow()
    }

    pub fn shadow(&mut self) -> ShadowCallbacks<A, R> {
        self.slot.get_or_init(|cell| {
            let template = cell.get();
            let reader = cell.clone();
            let accessor: Accessor<A, R> = Rc::new(move || Ok(reader.get()));
            ShadowCallbacks::build(&template, accessor)
        })
    }

    pub fn cell(&self) -> Owned<Callbacks<A, R>> {
        self.slot.cell()
    }

    pub fn current(&self) -> Callbacks<A, R> {
        self.slot.cell().get()
    }
}

/// Single-callback form of [`UpdatingCallbacks`]. The stable callback cannot
/// fail: there is no shape to drift.
pub struct UpdatingCallback<A, R> {
    slot: UpdatingRef<Callback<A, R>, Callback<A, R>>,
}

impl<A: 'static, R: 'static> UpdatingCallback<A, R> {
    pub fn new(initial: Callback<A, R>) -> Self {
        Self {
            slot: UpdatingRef::new(initial),
        }
    }

    pub fn update(&mut self, callback: Callback<A, R>) -> Callback<A, R> {
        self.slot.set_current(callback);
        self.stable()
    }

    pub fn stable(&mut self) -> Callback<A, R> {
        self.slot.get_or_init(|cell| {
            let reader = cell.clone();
            Callback::new(move |args| reader.get().call(args))
        })
    }

    pub fn cell(&self) -> Owned<Callback<A, R>> {
        self.slot.cell()
    }
}

#[cfg(test)]
#[path = "tests/updating_tests.rs"]
mod tests;
