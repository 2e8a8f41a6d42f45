//! Testing utilities and harness for updating-callbacks

pub mod testing;

pub use testing::*;

pub mod prelude {
    pub use crate::testing::*;
    pub use updating_callbacks_core::{callbacks, Callback, CallbackError, Callbacks, Composer};
}
