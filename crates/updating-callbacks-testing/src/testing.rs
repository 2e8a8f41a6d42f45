use std::cell::RefCell;
use std::rc::Rc;

use updating_callbacks_core::{location_key, Callback, Composer, Composition, Key};

/// Shared record of which callbacks ran, in order.
#[derive(Clone, Default)]
pub struct CallLog {
    entries: Rc<RefCell<Vec<String>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.entries.borrow_mut().push(entry.into());
    }

    /// A callback that records `name` with its arguments, then returns
    /// `result(args)`.
    pub fn recorder<A, R>(&self, name: &str, result: impl Fn(&A) -> R + 'static) -> Callback<A, R>
    where
        A: std::fmt::Debug + 'static,
        R: 'static,
    {
        let log = self.clone();
        let name = name.to_owned();
        Callback::new(move |args: A| {
            log.push(format!("{name}{args:?}"));
            result(&args)
        })
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

/// Drives a content function through repeated refresh passes, standing in
/// for the render loop of a real host.
pub struct CompositionHarness<T> {
    composition: Composition,
    root_key: Key,
    content: Box<dyn FnMut(&mut Composer<'_>) -> T>,
}

impl<T> CompositionHarness<T> {
    pub fn new(content: impl FnMut(&mut Composer<'_>) -> T + 'static) -> Self {
        Self {
            composition: Composition::new(),
            root_key: location_key(file!(), line!(), column!()),
            content: Box::new(content),
        }
    }

    /// Run one pass and return what the content produced.
    pub fn refresh(&mut self) -> T {
        let content = &mut self.content;
        self.composition
            .refresh(self.root_key, |composer| content(composer))
    }

    /// Run `passes` passes, returning the output of the last one.
    pub fn refresh_times(&mut self, passes: usize) -> Option<T> {
        let mut last = None;
        for _ in 0..passes {
            last = Some(self.refresh());
        }
        last
    }

    pub fn pass_count(&self) -> u64 {
        self.composition.pass_count()
    }

    pub fn slot_count(&self) -> usize {
        self.composition.slot_count()
    }
}
