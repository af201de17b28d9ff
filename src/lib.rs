//! Tiny Cache
//!
//! A minimal on-disk cache holding one string value per key, with a
//! time-to-live check. Callers save an expensive result once and read it
//! back while `is_cache_valid` holds.
//!
//! ```no_run
//! use tiny_cache::{CacheOptions, FileCache};
//!
//! # async fn demo() -> tiny_cache::Result<()> {
//! let mut cache = FileCache::new("feed_hash", CacheOptions::default().with_duration(3600));
//! let body = if cache.is_cache_valid().await {
//!     cache.read().await?
//! } else {
//!     let fresh = String::from("{\"items\":[]}");
//!     cache.save(fresh.as_str()).await?;
//!     fresh
//! };
//! # let _ = body;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod cli;
pub mod providers;

pub use cache::{CacheError, CacheOptions, CacheRecord, FileCache, Result, Ttl, ValidityPolicy};
