use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::collections::map::HashMap;

/// Reference-counted callable taking its arguments as a tuple `A`.
///
/// Arity is carried by the tuple type: `Callback<(i32, i32), i32>` is a
/// two-argument function, `Callback<(), ()>` takes nothing.
pub struct Callback<A, R = ()> {
    inner: Rc<dyn Fn(A) -> R>,
}

impl<A, R> Clone for Callback<A, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<A, R> Callback<A, R> {
    pub fn new(f: impl Fn(A) -> R + 'static) -> Self {
        Self { inner: Rc::new(f) }
    }

    pub fn call(&self, args: A) -> R {
        (self.inner)(args)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<A, R, F> From<F> for Callback<A, R>
where
    F: Fn(A) -> R + 'static,
{
    fn from(f: F) -> Self {
        Self::new(f)
    }
}

impl<A, R> fmt::Debug for Callback<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({:p})", Rc::as_ptr(&self.inner) as *const ())
    }
}

/// Which of the two cases a mapping value is.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CallbackKind {
    Callable,
    Nested,
}

impl fmt::Display for CallbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackKind::Callable => f.write_str("callable"),
            CallbackKind::Nested => f.write_str("nested mapping"),
        }
    }
}

/// Structural description of a mapping: which keys exist and whether each one
/// is a callable or another mapping. Two mappings with equal shapes are
/// interchangeable behind the same shadow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Shape {
    Callable,
    Nested(BTreeMap<String, Shape>),
}

impl Shape {
    pub fn empty() -> Self {
        Shape::Nested(BTreeMap::new())
    }

    pub fn kind(&self) -> CallbackKind {
        match self {
            Shape::Callable => CallbackKind::Callable,
            Shape::Nested(_) => CallbackKind::Nested,
        }
    }
}

/// A value inside a [`Callbacks`] mapping.
pub enum CallbackTree<A, R> {
    Callable(Callback<A, R>),
    Nested(Callbacks<A, R>),
}

impl<A, R> Clone for CallbackTree<A, R> {
    fn clone(&self) -> Self {
        match self {
            CallbackTree::Callable(callback) => CallbackTree::Callable(callback.clone()),
            CallbackTree::Nested(nested) => CallbackTree::Nested(nested.clone()),
        }
    }
}

impl<A, R> CallbackTree<A, R> {
    pub fn kind(&self) -> CallbackKind {
        match self {
            CallbackTree::Callable(_) => CallbackKind::Callable,
            CallbackTree::Nested(_) => CallbackKind::Nested,
        }
    }

    pub fn shape(&self) -> Shape {
        match self {
            CallbackTree::Callable(_) => Shape::Callable,
            CallbackTree::Nested(nested) => nested.shape(),
        }
    }
}

impl<A, R> From<Callback<A, R>> for CallbackTree<A, R> {
    fn from(callback: Callback<A, R>) -> Self {
        CallbackTree::Callable(callback)
    }
}

impl<A, R> From<Callbacks<A, R>> for CallbackTree<A, R> {
    fn from(nested: Callbacks<A, R>) -> Self {
        CallbackTree::Nested(nested)
    }
}

impl<A, R> fmt::Debug for CallbackTree<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackTree::Callable(callback) => fmt::Debug::fmt(callback, f),
            CallbackTree::Nested(nested) => fmt::Debug::fmt(nested, f),
        }
    }
}

/// Immutable snapshot of a named-function mapping.
///
/// Snapshots share their storage, so handing one to a slot every refresh and
/// resolving it from trampolines costs a reference count bump, not a copy.
/// Mappings are assembled bottom-up by value, which rules out cycles.
pub struct Callbacks<A, R> {
    entries: Rc<HashMap<String, CallbackTree<A, R>>>,
}

impl<A, R> Clone for Callbacks<A, R> {
    fn clone(&self) -> Self {
        Self {
            entries: Rc::clone(&self.entries),
        }
    }
}

impl<A, R> Default for Callbacks<A, R> {
    fn default() -> Self {
        Self {
            entries: Rc::new(HashMap::new()),
        }
    }
}

impl<A, R> Callbacks<A, R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(mut self, key: impl Into<String>, callback: impl Into<Callback<A, R>>) -> Self {
        self.insert(key, CallbackTree::Callable(callback.into()));
        self
    }

    pub fn with_nested(mut self, key: impl Into<String>, nested: Callbacks<A, R>) -> Self {
        self.insert(key, CallbackTree::Nested(nested));
        self
    }

    /// Insert or replace a value. Other holders of this snapshot keep seeing
    /// the old contents.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<CallbackTree<A, R>>,
    ) -> Option<CallbackTree<A, R>> {
        Rc::make_mut(&mut self.entries).insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<CallbackTree<A, R>> {
        Rc::make_mut(&mut self.entries).remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&CallbackTree<A, R>> {
        self.entries.get(key)
    }

    pub fn callback(&self, key: &str) -> Option<&Callback<A, R>> {
        match self.get(key)? {
            CallbackTree::Callable(callback) => Some(callback),
            CallbackTree::Nested(_) => None,
        }
    }

    pub fn nested(&self, key: &str) -> Option<&Callbacks<A, R>> {
        match self.get(key)? {
            CallbackTree::Nested(nested) => Some(nested),
            CallbackTree::Callable(_) => None,
        }
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

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CallbackTree<A, R>)> {
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

impl<A, R, K> FromIterator<(K, CallbackTree<A, R>)> for Callbacks<A, R>
where
    K: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, CallbackTree<A, R>)>>(iter: I) -> Self {
        Self {
            entries: Rc::new(iter.into_iter().map(|(key, value)| (key.into(), value)).collect()),
        }
    }
}

impl<A, R> fmt::Debug for Callbacks<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

/// Build a [`Callbacks`] snapshot.
///
/// Leaves use `key => expr`, where `expr` converts into a [`Callback`];
/// nested mappings use `key: { ... }`.
///
/// ```
/// use updating_callbacks_core::{callbacks, Callbacks};
///
/// fn add((a, b): (i32, i32)) -> i32 {
///     a + b
/// }
///
/// let tree: Callbacks<(i32, i32), i32> = callbacks! {
///     add => add,
///     math: { mul => |(a, b): (i32, i32)| a * b },
/// };
/// assert_eq!(tree.nested("math").unwrap().callback("mul").unwrap().call((3, 4)), 12);
/// ```
#[macro_export]
macro_rules! callbacks {
    (@entries $callbacks:ident;) => {};
    (@entries $callbacks:ident; $key:ident : { $($inner:tt)* } $(, $($rest:tt)*)?) => {
        $callbacks = $callbacks.with_nested(stringify!($key), $crate::callbacks!($($inner)*));
        $($crate::callbacks!(@entries $callbacks; $($rest)*);)?
    };
    (@entries $callbacks:ident; $key:ident => $value:expr $(, $($rest:tt)*)?) => {
        $callbacks = $callbacks.with_callback(stringify!($key), $value);
        $($crate::callbacks!(@entries $callbacks; $($rest)*);)?
    };
    ($($body:tt)*) => {{
        #[allow(unused_mut)]
        let mut callbacks = $crate::Callbacks::new();
        $crate::callbacks!(@entries callbacks; $($body)*);
        callbacks
    }};
}

#[cfg(test)]
#[path = "tests/callbacks_tests.rs"]
mod tests;
