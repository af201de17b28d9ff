//! Collaborators injected into the cache
//!
//! The cache never reads the wall clock or touches the filesystem directly.
//! It goes through a [`Clock`] and a [`CacheFs`], so tests can substitute
//! fixed time and failing filesystems without any global state.

mod clock;
mod fs;

pub use clock::{Clock, FixedClock, SystemClock};
pub use fs::{CacheFs, TokioFs};
