//! Cache configuration
//!
//! Options are plain values supplied at construction. They derive
//! `Deserialize` so a host application can embed them in its own config file:
//!
//! ```json
//! { "directory": ".cache", "duration": 3600, "validity": "ttl" }
//! ```

use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Default base directory, resolved against the working directory
pub const DEFAULT_DIRECTORY: &str = ".cache";

/// Default time-to-live: 24 hours
pub const DEFAULT_DURATION_SECS: i64 = 60 * 60 * 24;

/// How long a saved value stays fresh
///
/// Encoded as a bare integer of seconds where `-1` means infinite. Other
/// negative values are accepted and simply describe an already-expired TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum Ttl {
    /// Never expires
    Infinite,
    /// Expires this many seconds after the save
    Seconds(i64),
}

impl Ttl {
    pub fn from_secs(secs: i64) -> Self {
        if secs == -1 {
            Ttl::Infinite
        } else {
            Ttl::Seconds(secs)
        }
    }

    /// Seconds as stored in config, `-1` for infinite
    pub fn as_secs(self) -> i64 {
        match self {
            Ttl::Infinite => -1,
            Ttl::Seconds(secs) => secs,
        }
    }

    /// Expiration instant in milliseconds, `None` when the TTL is infinite
    pub fn expires_at(self, created_at: i64) -> Option<i64> {
        match self {
            Ttl::Infinite => None,
            Ttl::Seconds(secs) => Some(created_at.saturating_add(secs.saturating_mul(1000))),
        }
    }

    /// Whether a value saved at `created_at` is still fresh at `now` (both ms)
    pub fn is_fresh(self, created_at: i64, now: i64) -> bool {
        match self.expires_at(created_at) {
            None => true,
            Some(expiration) => expiration > now,
        }
    }
}

impl Default for Ttl {
    fn default() -> Self {
        Ttl::Seconds(DEFAULT_DURATION_SECS)
    }
}

impl From<i64> for Ttl {
    fn from(secs: i64) -> Self {
        Ttl::from_secs(secs)
    }
}

impl From<Ttl> for i64 {
    fn from(ttl: Ttl) -> Self {
        ttl.as_secs()
    }
}

/// How `is_cache_valid` treats a cache file that exists on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidityPolicy {
    /// An existing file is valid only while its TTL has not elapsed
    #[default]
    Ttl,
    /// Any existing file is valid regardless of its age
    FilePresence,
}

/// Options for a [`FileCache`](super::FileCache)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheOptions {
    /// Base directory for cache files
    pub directory: PathBuf,
    /// Time-to-live applied by `is_cache_valid`
    pub duration: Ttl,
    /// Treatment of files already on disk
    pub validity: ValidityPolicy,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_DIRECTORY),
            duration: Ttl::default(),
            validity: ValidityPolicy::default(),
        }
    }
}

impl CacheOptions {
    /// Options rooted in the platform cache directory for `app_name`
    ///
    /// Uses `~/.cache/<app_name>/` on Linux, or the equivalent elsewhere.
    /// Returns `None` if no home directory can be determined.
    pub fn in_user_cache_dir(app_name: &str) -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", app_name)?;
        Some(Self::default().with_directory(project_dirs.cache_dir()))
    }

    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    /// Sets the TTL in seconds, `-1` for infinite
    pub fn with_duration(mut self, secs: i64) -> Self {
        self.duration = Ttl::from_secs(secs);
        self
    }

    pub fn with_ttl(mut self, ttl: Ttl) -> Self {
        self.duration = ttl;
        self
    }

    pub fn with_validity(mut self, validity: ValidityPolicy) -> Self {
        self.validity = validity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = CacheOptions::default();
        assert_eq!(options.directory, PathBuf::from(".cache"));
        assert_eq!(options.duration, Ttl::Seconds(86_400));
        assert_eq!(options.validity, ValidityPolicy::Ttl);
    }

    #[test]
    fn test_minus_one_is_infinite() {
        assert_eq!(Ttl::from_secs(-1), Ttl::Infinite);
        assert_eq!(Ttl::from_secs(0), Ttl::Seconds(0));
        assert_eq!(Ttl::from_secs(-5), Ttl::Seconds(-5));
        assert_eq!(Ttl::Infinite.as_secs(), -1);
    }

    #[test]
    fn test_freshness_math() {
        let now = 1_628_043_400_000;
        assert!(Ttl::Seconds(50).is_fresh(now - 20_000, now));
        assert!(!Ttl::Seconds(50).is_fresh(now - 100_000, now));
        // Expiration equal to now is already stale
        assert!(!Ttl::Seconds(50).is_fresh(now - 50_000, now));
        assert!(Ttl::Infinite.is_fresh(0, now));
    }

    #[test]
    fn test_huge_ttl_does_not_overflow() {
        assert!(Ttl::Seconds(i64::MAX).is_fresh(1, 2));
        assert_eq!(Ttl::Seconds(i64::MAX).expires_at(i64::MAX), Some(i64::MAX));
    }

    #[test]
    fn test_deserialize_partial_options() {
        let options: CacheOptions =
            serde_json::from_str(r#"{"duration": -1}"#).expect("Should parse");
        assert_eq!(options.duration, Ttl::Infinite);
        assert_eq!(options.directory, PathBuf::from(".cache"));

        let options: CacheOptions = serde_json::from_str(
            r#"{"directory": "/tmp/.cache", "duration": 50, "validity": "filePresence"}"#,
        )
        .expect("Should parse");
        assert_eq!(options.directory, PathBuf::from("/tmp/.cache"));
        assert_eq!(options.duration, Ttl::Seconds(50));
        assert_eq!(options.validity, ValidityPolicy::FilePresence);
    }

    #[test]
    fn test_ttl_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Ttl::Infinite).unwrap(), "-1");
        assert_eq!(serde_json::to_string(&Ttl::Seconds(60)).unwrap(), "60");
    }

    #[test]
    fn test_in_user_cache_dir() {
        if let Some(options) = CacheOptions::in_user_cache_dir("tiny-cache") {
            let path_str = options.directory.to_string_lossy();
            assert!(path_str.contains("tiny-cache"));
            assert!(options.directory.is_absolute());
        }
        // Passes when no home directory is available (e.g. CI)
    }
}
