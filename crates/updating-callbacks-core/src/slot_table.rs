use std::any::Any;

use crate::owned::Owned;
use crate::Key;

/// Positional storage for values remembered across refresh passes.
///
/// A pass walks the table from the start; every `remember` call claims the
/// next slot. A group whose key is not at the cursor is looked up among the
/// following siblings of the same parent and moved back into place, so keyed
/// regions keep their slots when a sibling before them appears or vanishes.
/// Whatever a group did not reach by its `end` is discarded.
#[derive(Default)]
pub struct SlotTable {
    slots: Vec<Slot>,
    cursor: usize,
    group_stack: Vec<GroupFrame>,
}

enum Slot {
    Group { key: Key, len: usize },
    Value(Box<dyn Any>),
}

impl Slot {
    /// Slots covered by this entry, group header included.
    fn span(&self) -> usize {
        match self {
            Slot::Group { len, .. } => (*len).max(1),
            Slot::Value(_) => 1,
        }
    }
}

struct GroupFrame {
    start: usize,
    // Slots after the group's region; untouched while the group is open.
    tail: usize,
}

impl SlotTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a group at the cursor and return its slot position.
    pub fn start(&mut self, key: Key) -> usize {
        let cursor = self.cursor;
        match self.find_group(key) {
            Some(position) if position == cursor => {}
            Some(position) => {
                let span = self.slots[position].span();
                log::trace!("moving group from position {position} to {cursor}");
                let moved: Vec<Slot> = self.slots.drain(position..position + span).collect();
                self.slots.splice(cursor..cursor, moved);
            }
            None => self.slots.insert(cursor, Slot::Group { key, len: 1 }),
        }
        let region_end = cursor + self.slots[cursor].span();
        self.group_stack.push(GroupFrame {
            start: cursor,
            tail: self.slots.len() - region_end,
        });
        self.cursor += 1;
        cursor
    }

    pub fn end(&mut self) {
        if let Some(frame) = self.group_stack.pop() {
            let region_end = self.slots.len().saturating_sub(frame.tail);
            self.discard_range(self.cursor, region_end);
            let cursor = self.cursor;
            if let Some(Slot::Group { len, .. }) = self.slots.get_mut(frame.start) {
                *len = cursor - frame.start;
            }
        }
    }

    /// How many groups are currently open.
    pub fn depth(&self) -> usize {
        self.group_stack.len()
    }

    pub fn remember<T: 'static>(&mut self, init: impl FnOnce() -> T) -> Owned<T> {
        let cursor = self.cursor;
        let in_region = cursor < self.scan_bound();
        if in_region {
            if let Some(Slot::Value(value)) = self.slots.get(cursor) {
                if let Some(existing) = value.downcast_ref::<Owned<T>>() {
                    let existing = existing.clone();
                    self.cursor += 1;
                    return existing;
                }
            }
        }
        let owned = Owned::new(init());
        let slot = Slot::Value(Box::new(owned.clone()));
        match self.slots.get(cursor) {
            Some(Slot::Value(_)) if in_region => {
                log::trace!("replacing value of another type at position {cursor}");
                self.slots[cursor] = slot;
            }
            _ => self.slots.insert(cursor, slot),
        }
        self.cursor += 1;
        owned
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
        self.group_stack.clear();
    }

    /// Drop every slot the last pass did not reach.
    pub fn trim_to_cursor(&mut self) {
        self.discard_range(self.cursor, self.slots.len());
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of remembered values, groups excluded.
    pub fn value_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Value(_)))
            .count()
    }

    /// End of the open group's region, or of the table at the top level.
    fn scan_bound(&self) -> usize {
        match self.group_stack.last() {
            Some(frame) => self.slots.len().saturating_sub(frame.tail),
            None => self.slots.len(),
        }
    }

    /// Position of the sibling group keyed `key` at or after the cursor.
    fn find_group(&self, key: Key) -> Option<usize> {
        let bound = self.scan_bound();
        let mut position = self.cursor;
        while position < bound {
            match &self.slots[position] {
                Slot::Group { key: existing, .. } if *existing == key => return Some(position),
                slot => position += slot.span(),
            }
        }
        None
    }

    fn discard_range(&mut self, from: usize, to: usize) {
        if from < to {
            log::trace!("discarding {} slots from position {from}", to - from);
            self.slots.drain(from..to);
        }
    }
}

#[cfg(test)]
#[path = "tests/slot_table_tests.rs"]
mod tests;
