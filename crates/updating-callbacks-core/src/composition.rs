use std::hash::Hash;

use crate::callbacks::{Callback, Callbacks};
use crate::hash::hash_one;
use crate::owned::Owned;
use crate::replace::ShadowCallbacks;
use crate::slot_table::SlotTable;
use crate::updating::{UpdatingCallback, UpdatingCallbacks};
use crate::Key;

/// One refresh pass over a [`SlotTable`].
///
/// Values handed to `updating_callbacks` / `updating_callback` on a slot's
/// first pass seed its cell directly. On later passes the write is queued
/// and committed when the pass finishes, so code running during the pass
/// still sees the previous pass's callbacks.
pub struct Composer<'a> {
    slots: &'a mut SlotTable,
    side_effects: Vec<Box<dyn FnOnce()>>,
}

impl<'a> Composer<'a> {
    pub(crate) fn new(slots: &'a mut SlotTable) -> Self {
        Self {
            slots,
            side_effects: Vec::new(),
        }
    }

    pub fn with_group<R>(&mut self, key: Key, f: impl FnOnce(&mut Composer<'a>) -> R) -> R {
        self.slots.start(key);
        let result = f(self);
        self.slots.end();
        result
    }

    /// Group keyed by an arbitrary hashable value, for slots whose position
    /// alone does not identify them (conditional branches, list items).
    /// A keyed group keeps its slots when siblings before it come and go.
    pub fn with_key<K: Hash, R>(&mut self, key: &K, f: impl FnOnce(&mut Composer<'a>) -> R) -> R {
        self.with_group(hash_one(key), f)
    }

    pub fn remember<T: 'static>(&mut self, init: impl FnOnce() -> T) -> Owned<T> {
        self.slots.remember(init)
    }

    pub fn register_side_effect(&mut self, effect: impl FnOnce() + 'static) {
        self.side_effects.push(Box::new(effect));
    }

    pub fn take_side_effects(&mut self) -> Vec<Box<dyn FnOnce()>> {
        std::mem::take(&mut self.side_effects)
    }

    /// Stable shadow of `callbacks` for the slot at the cursor.
    pub fn updating_callbacks<A: 'static, R: 'static>(
        &mut self,
        callbacks: Callbacks<A, R>,
    ) -> ShadowCallbacks<A, R> {
        let mut seeded = false;
        let slot = self.slots.remember(|| {
            seeded = true;
            UpdatingCallbacks::new(callbacks.clone())
        });
        let shadow = slot.update(|slot| slot.shadow());
        if !seeded {
            let cell = slot.with(|slot| slot.cell());
            self.register_side_effect(move || {
                cell.replace(callbacks);
            });
        }
        shadow
    }

    /// Stable callback forwarding to `callback` for the slot at the cursor.
    pub fn updating_callback<A: 'static, R: 'static>(
        &mut self,
        callback: Callback<A, R>,
    ) -> Callback<A, R> {
        let mut seeded = false;
        let slot = self.slots.remember(|| {
            seeded = true;
            UpdatingCallback::new(callback.clone())
        });
        let stable = slot.update(|slot| slot.stable());
        if !seeded {
            let cell = slot.with(|slot| slot.cell());
            self.register_side_effect(move || {
                cell.replace(callback);
            });
        }
        stable
    }
}

/// Owns a slot table and runs refresh passes over it.
#[derive(Default)]
pub struct Composition {
    slots: SlotTable,
    passes: u64,
}

impl Composition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one refresh pass. Queued cell writes are committed and slots the
    /// pass did not reach are dropped before this returns.
    pub fn refresh<R>(&mut self, key: Key, content: impl FnOnce(&mut Composer<'_>) -> R) -> R {
        self.slots.reset();
        let (result, side_effects) = {
            let mut composer = Composer::new(&mut self.slots);
            let result = composer.with_group(key, content);
            let side_effects = composer.take_side_effects();
            (result, side_effects)
        };
        for effect in side_effects {
            effect();
        }
        self.slots.trim_to_cursor();
        self.passes += 1;
        log::trace!(
            "refresh pass {} finished with {} slots",
            self.passes,
            self.slots.len()
        );
        result
    }

    pub fn pass_count(&self) -> u64 {
        self.passes
    }

    pub fn slot_count(&self) -> usize {
        self.slots.value_count()
    }
}

#[cfg(test)]
#[path = "tests/composition_tests.rs"]
mod tests;
