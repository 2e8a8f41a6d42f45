use crate::callbacks::Callback;

/// Treat an optional callback as always present: calling the result forwards
/// to `callback` when there is one and yields `None` otherwise.
pub fn wrap_optional<A: 'static, R: 'static>(callback: Option<Callback<A, R>>) -> Callback<A, Option<R>> {
    Callback::new(move |args| callback.as_ref().map(|callback| callback.call(args)))
}

#[cfg(test)]
#[path = "tests/helpers_tests.rs"]
mod tests;
