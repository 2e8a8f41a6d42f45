use core::hash::Hash;
use std::hash::Hasher;

use crate::Key;

#[cfg(feature = "std-hash")]
pub mod default {
    pub use std::collections::hash_map::DefaultHasher;

    #[inline]
    pub fn new() -> DefaultHasher {
        DefaultHasher::new()
    }
}

#[cfg(not(feature = "std-hash"))]
pub mod default {
    pub use ahash::AHasher as DefaultHasher;

    #[inline]
    pub fn new() -> DefaultHasher {
        DefaultHasher::default()
    }
}

/// Hash a single value with whichever default hasher is active.
#[inline]
pub fn hash_one<T: Hash>(v: &T) -> Key {
    let mut h = default::new();
    v.hash(&mut h);
    h.finish()
}

/// Group key derived from a call site, used to give every `with_group` call
/// its own region of the slot table.
pub fn location_key(file: &str, line: u32, column: u32) -> Key {
    let mut h = default::new();
    file.hash(&mut h);
    line.hash(&mut h);
    column.hash(&mut h);
    h.finish()
}
