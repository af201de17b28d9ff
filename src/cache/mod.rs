//! Single-value TTL cache persisted to disk
//!
//! A [`FileCache`] keeps one opaque string per key in
//! `<directory>/tiny-cache-<key>` alongside its save time, and answers whether
//! that value is still fresh under a configurable [`Ttl`].

mod error;
mod file_cache;
mod options;
mod record;

pub use error::{CacheError, Result};
pub use file_cache::{FileCache, EPOCH_ZERO, FILE_PREFIX};
pub use options::{CacheOptions, Ttl, ValidityPolicy, DEFAULT_DIRECTORY, DEFAULT_DURATION_SECS};
pub use record::CacheRecord;
