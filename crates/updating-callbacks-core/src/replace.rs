//! Builds shadow mappings whose leaves forward to whatever mapping an
//! accessor currently returns.

use std::fmt;
use std::rc::Rc;

use crate::callbacks::{Callback, CallbackKind, CallbackTree, Callbacks, Shape};
use crate::collections::map::HashMap;
use crate::error::CallbackError;

/// Resolves the current mapping for a slot, or for a subtree of it.
pub type Accessor<A, R> = Rc<dyn Fn() -> Result<Callbacks<A, R>, CallbackError>>;

/// Forwarding callable bound to one key of a mapping.
///
/// Holds no callback of its own: every call resolves the accessor again and
/// invokes whatever callable is bound to the key at that moment.
pub struct Trampoline<A, R> {
    key: Rc<str>,
    path: Rc<str>,
    accessor: Accessor<A, R>,
}

impl<A, R> Clone for Trampoline<A, R> {
    fn clone(&self) -> Self {
        Self {
            key: Rc::clone(&self.key),
            path: Rc::clone(&self.path),
            accessor: Rc::clone(&self.accessor),
        }
    }
}

impl<A: 'static, R: 'static> Trampoline<A, R> {
    fn new(accessor: Accessor<A, R>, key: &str, path: &str) -> Self {
        Self {
            key: key.into(),
            path: path.into(),
            accessor,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Dotted location of this trampoline inside its root mapping.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The callable currently bound to this trampoline's key.
    pub fn resolve(&self) -> Result<Callback<A, R>, CallbackError> {
        let current = (self.accessor)()?;
        match current.get(&self.key) {
            Some(CallbackTree::Callable(callback)) => Ok(callback.clone()),
            other => Err(CallbackError::shape_violation(
                &self.path,
                CallbackKind::Callable,
                other.map(CallbackTree::kind),
            )),
        }
    }

    pub fn call(&self, args: A) -> Result<R, CallbackError> {
        match self.resolve() {
            Ok(callback) => Ok(callback.call(args)),
            Err(err) => {
                log::debug!("trampoline `{}` could not forward: {err}", self.path);
                Err(err)
            }
        }
    }

    /// Adapt into a plain [`Callback`] that reports shape violations in its
    /// return value.
    pub fn to_callback(&self) -> Callback<A, Result<R, CallbackError>> {
        let trampoline = self.clone();
        Callback::new(move |args| trampoline.call(args))
    }
}

impl<A, R> fmt::Debug for Trampoline<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trampoline").field("path", &self.path).finish()
    }
}

pub enum ShadowEntry<A, R> {
    Trampoline(Trampoline<A, R>),
    Nested(ShadowCallbacks<A, R>),
}

impl<A, R> Clone for ShadowEntry<A, R> {
    fn clone(&self) -> Self {
        match self {
            ShadowEntry::Trampoline(trampoline) => ShadowEntry::Trampoline(trampoline.clone()),
            ShadowEntry::Nested(nested) => ShadowEntry::Nested(nested.clone()),
        }
    }
}

impl<A, R> ShadowEntry<A, R> {
    pub fn kind(&self) -> CallbackKind {
        match self {
            ShadowEntry::Trampoline(_) => CallbackKind::Callable,
            ShadowEntry::Nested(_) => CallbackKind::Nested,
        }
    }

    pub fn shape(&self) -> Shape {
        match self {
            ShadowEntry::Trampoline(_) => Shape::Callable,
            ShadowEntry::Nested(nested) => nested.shape(),
        }
    }
}

impl<A, R> fmt::Debug for ShadowEntry<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShadowEntry::Trampoline(trampoline) => fmt::Debug::fmt(trampoline, f),
            ShadowEntry::Nested(nested) => fmt::Debug::fmt(nested, f),
        }
    }
}

/// Structural mirror of a [`Callbacks`] mapping with every callable replaced
/// by a [`Trampoline`].
///
/// Clones share storage; [`ShadowCallbacks::ptr_eq`] tells whether two
/// handles are the same shadow.
pub struct ShadowCallbacks<A, R> {
    entries: Rc<HashMap<String, ShadowEntry<A, R>>>,
}

impl<A, R> Clone for ShadowCallbacks<A, R> {
    fn clone(&self) -> Self {
        Self {
            entries: Rc::clone(&self.entries),
        }
    }
}

impl<A: 'static, R: 'static> ShadowCallbacks<A, R> {
    /// Build from a snapshot already obtained through `resolve`. Only the
    /// snapshot's shape is used; values are looked up again on every call.
    pub(crate) fn build(template: &Callbacks<A, R>, resolve: Accessor<A, R>) -> Self {
        Self::build_at(template, resolve, "")
    }

    fn build_at(template: &Callbacks<A, R>, resolve: Accessor<A, R>, path: &str) -> Self {
        let mut entries = HashMap::with_capacity(template.len());
        for (key, value) in template.iter() {
            let entry_path = child_path(path, key);
            let entry = match value {
                CallbackTree::Callable(_) => {
                    ShadowEntry::Trampoline(Trampoline::new(Rc::clone(&resolve), key, &entry_path))
                }
                CallbackTree::Nested(nested) => {
                    let nested_resolve = nested_accessor(Rc::clone(&resolve), key, &entry_path);
                    ShadowEntry::Nested(Self::build_at(nested, nested_resolve, &entry_path))
                }
            };
            entries.insert(key.to_owned(), entry);
        }
        log::trace!(
            "built callback shadow at `{path}` with {} entries",
            entries.len()
        );
        Self {
            entries: Rc::new(entries),
        }
    }
}

impl<A, R> ShadowCallbacks<A, R> {
    pub fn get(&self, key: &str) -> Option<&ShadowEntry<A, R>> {
        self.entries.get(key)
    }

    pub fn trampoline(&self, key: &str) -> Option<&Trampoline<A, R>> {
        match self.get(key)? {
            ShadowEntry::Trampoline(trampoline) => Some(trampoline),
            ShadowEntry::Nested(_) => None,
        }
    }

    pub fn nested(&self, key: &str) -> Option<&ShadowCallbacks<A, R>> {
        match self.get(key)? {
            ShadowEntry::Nested(nested) => Some(nested),
            ShadowEntry::Trampoline(_) => None,
        }
    }

    /// Look up a trampoline by dotted path, e.g. `"c.e.f"`.
    ///
    /// Every `.` separates two keys. Keys that contain a `.` themselves are
    /// reached through [`ShadowCallbacks::trampoline_in`].
    pub fn trampoline_at(&self, path: &str) -> Option<&Trampoline<A, R>> {
        let segments: Vec<&str> = path.split('.').collect();
        self.trampoline_in(&segments)
    }

    /// Look up a trampoline by its keys from the root, one key per segment.
    pub fn trampoline_in(&self, segments: &[&str]) -> Option<&Trampoline<A, R>> {
        let (leaf, parents) = segments.split_last()?;
        let mut current = self;
        for key in parents {
            current = current.nested(key)?;
        }
        current.trampoline(leaf)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ShadowEntry<A, R>)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn shape(&self) -> Shape {
        Shape::Nested(
            self.entries
                .iter()
                .map(|(key, value)| (key.clone(), value.shape()))
                .collect(),
        )
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.entries, &other.entries)
    }
}

impl<A, R> fmt::Debug for ShadowCallbacks<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

/// Build a shadow of the mapping returned by `resolve`.
///
/// `resolve` is called once now to discover the shape and again on every
/// trampoline call. The result is not cached; callers that need a stable
/// shadow keep it themselves (see [`crate::UpdatingCallbacks`]).
pub fn replace_callbacks<A: 'static, R: 'static>(
    resolve: impl Fn() -> Callbacks<A, R> + 'static,
) -> ShadowCallbacks<A, R> {
    let template = resolve();
    let resolve: Accessor<A, R> = Rc::new(move || Ok(resolve()));
    ShadowCallbacks::build(&template, resolve)
}

fn nested_accessor<A: 'static, R: 'static>(
    parent: Accessor<A, R>,
    key: &str,
    path: &str,
) -> Accessor<A, R> {
    let key: Rc<str> = key.into();
    let path: Rc<str> = path.into();
    Rc::new(move || {
        let current = parent()?;
        match current.get(&key) {
            Some(CallbackTree::Nested(nested)) => Ok(nested.clone()),
            other => Err(CallbackError::shape_violation(
                &path,
                CallbackKind::Nested,
                other.map(CallbackTree::kind),
            )),
        }
    })
}

fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_owned()
    } else {
        format!("{parent}.{key}")
    }
}

#[cfg(test)]
#[path = "tests/replace_tests.rs"]
mod tests;
