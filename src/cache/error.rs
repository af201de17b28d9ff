//! Error types for cache operations

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by [`FileCache`](super::FileCache) operations
///
/// Nothing is retried. A missing cache file is only an error for `read`;
/// the status checks degrade to `false` instead.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The cache directory could not be created
    #[error("Failed to create cache directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The cache file could not be written
    #[error("Failed to write cache file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The cache file is missing or unreadable
    #[error("Failed to read cache file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The cache file does not hold a `{createdAt, contents}` record
    #[error("Malformed cache record in {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The cache file exists but could not be removed
    #[error("Failed to remove cache file {}: {source}", .path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CacheError {
    /// Returns true when the underlying cause is a missing file
    pub fn is_not_found(&self) -> bool {
        match self {
            CacheError::CreateDir { source, .. }
            | CacheError::Write { source, .. }
            | CacheError::Read { source, .. }
            | CacheError::Remove { source, .. } => source.kind() == io::ErrorKind::NotFound,
            CacheError::Malformed { .. } => false,
        }
    }
}

/// Result alias for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_error_mentions_path() {
        let err = CacheError::Read {
            path: PathBuf::from("/tmp/.cache/tiny-cache-abc"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        let msg = err.to_string();
        assert!(msg.contains("tiny-cache-abc"));
        assert!(msg.contains("gone"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_malformed_is_not_not_found() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = CacheError::Malformed {
            path: PathBuf::from("x"),
            source,
        };
        assert!(!err.is_not_found());
        assert!(err.to_string().starts_with("Malformed cache record"));
    }
}
