use crate::callbacks::CallbackKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackError {
    /// The value bound to `path` no longer has the kind it had when the shadow
    /// was built. `found` is `None` when the key disappeared altogether.
    ShapeViolation {
        path: String,
        expected: CallbackKind,
        found: Option<CallbackKind>,
    },
}

impl CallbackError {
    pub(crate) fn shape_violation(
        path: &str,
        expected: CallbackKind,
        found: Option<CallbackKind>,
    ) -> Self {
        CallbackError::ShapeViolation {
            path: path.to_owned(),
            expected,
            found,
        }
    }

    /// Keys from the root joined with `.`. A key that contains a `.` reads
    /// the same as the nested keys it would split into.
    pub fn path(&self) -> &str {
        match self {
            CallbackError::ShapeViolation { path, .. } => path,
        }
    }
}

impl std::fmt::Display for CallbackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallbackError::ShapeViolation {
                path,
                expected,
                found: Some(found),
            } => write!(
                f,
                "Callbacks object changed unexpectedly: `{path}` is a {found}, expected a {expected}"
            ),
            CallbackError::ShapeViolation {
                path,
                expected,
                found: None,
            } => write!(
                f,
                "Callbacks object changed unexpectedly: `{path}` is missing, expected a {expected}"
            ),
        }
    }
}

impl std::error::Error for CallbackError {}
