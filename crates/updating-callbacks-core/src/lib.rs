#![doc = r"Stable forwarding references to callbacks that are replaced on every refresh."]

pub mod callbacks;
pub mod collections;
pub mod composition;
pub mod error;
pub mod hash;
pub mod helpers;
pub mod owned;
pub mod replace;
pub mod slot_table;
pub mod updating;

pub use callbacks::{Callback, CallbackKind, CallbackTree, Callbacks, Shape};
pub use composition::{Composer, Composition};
pub use error::CallbackError;
pub use hash::location_key;
pub use helpers::wrap_optional;
pub use owned::Owned;
pub use replace::{replace_callbacks, Accessor, ShadowCallbacks, ShadowEntry, Trampoline};
pub use slot_table::SlotTable;
pub use updating::{UpdatingCallback, UpdatingCallbacks, UpdatingRef};

pub type Key = u64;
