//! Private module for selective re-export.

use serde::Serialize;
use std::fmt::{self, Debug, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};

/// An opaque identity classifying a transport channel.
///
/// Two mediums are equal iff they came from the same [`Medium::new`] call;
/// clones and copies share that identity. A medium carries no data and
/// affects neither delay nor effect unless a [`Signal`](crate::Signal)
/// implementation consults it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Medium(u64);

impl Medium {
    /// Allocates a fresh identity, distinct from every other medium in the
    /// process.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Medium {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Medium(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl Debug for Medium {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "Medium({})", self.0)
    }
}
