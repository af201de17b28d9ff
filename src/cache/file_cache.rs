//! Single-key TTL file cache
//!
//! A [`FileCache`] owns one key. Saving writes a `{createdAt, contents}`
//! record to `<directory>/tiny-cache-<key>` and keeps a copy of the payload
//! in memory for the lifetime of the instance.
//!
//! # Validity
//!
//! `is_cache_valid` checks the file on disk first. Under the default
//! [`ValidityPolicy::Ttl`], an existing file is only valid while its TTL has
//! not elapsed: presence is necessary but not sufficient. This differs from
//! the historical behavior, where any existing file counted as valid
//! regardless of age; that behavior is still available as
//! [`ValidityPolicy::FilePresence`].
//!
//! `read` never consults freshness. Callers gate on `is_cache_valid` first.

use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, trace, warn};

use super::error::{CacheError, Result};
use super::options::{CacheOptions, Ttl, ValidityPolicy};
use super::record::CacheRecord;
use crate::providers::{CacheFs, Clock, SystemClock, TokioFs};

/// Prefix shared by every cache file name
pub const FILE_PREFIX: &str = "tiny-cache-";

/// Save time that never counts as a save, even when passed as an override
pub const EPOCH_ZERO: i64 = 0;

/// Cache for one string value identified by `key`
#[derive(Debug, Clone)]
pub struct FileCache {
    key: String,
    options: CacheOptions,
    /// Milliseconds since the epoch of the last save
    created_at: Option<i64>,
    in_memory: Option<String>,
    fs: Arc<dyn CacheFs>,
    clock: Arc<dyn Clock>,
}

impl FileCache {
    /// Creates a cache backed by `tokio::fs` and the system clock
    ///
    /// Performs no I/O. `key` is used verbatim in the file name and must be
    /// safe to use as a path component.
    pub fn new(key: impl Into<String>, options: CacheOptions) -> Self {
        Self::with_providers(key, options, Arc::new(TokioFs), Arc::new(SystemClock))
    }

    /// Creates a cache with explicit filesystem and clock providers
    pub fn with_providers(
        key: impl Into<String>,
        options: CacheOptions,
        fs: Arc<dyn CacheFs>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            key: key.into(),
            options,
            created_at: None,
            in_memory: None,
            fs,
            clock,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn options(&self) -> &CacheOptions {
        &self.options
    }

    /// Save time of this instance's last successful save, if any
    pub fn created_at(&self) -> Option<i64> {
        self.created_at
    }

    pub fn file_name(&self) -> String {
        format!("{}{}", FILE_PREFIX, self.key)
    }

    /// The configured directory as an absolute, lexically normalized path
    ///
    /// Relative directories resolve against the current working directory at
    /// call time. If the working directory cannot be determined the path is
    /// only normalized.
    pub fn resolved_directory(&self) -> PathBuf {
        let directory = &self.options.directory;
        if directory.is_absolute() {
            return normalize(directory);
        }
        match std::env::current_dir() {
            Ok(cwd) => normalize(&cwd.join(directory)),
            Err(_) => normalize(directory),
        }
    }

    pub fn resolved_file_path(&self) -> PathBuf {
        self.resolved_directory().join(self.file_name())
    }

    /// Stores `payload` in memory and writes it to disk
    ///
    /// Always refreshes the save time and rewrites the file, even when the
    /// payload is unchanged. Directory or write failures are returned as-is.
    pub async fn save(&mut self, payload: impl Into<String>) -> Result<()> {
        let payload = payload.into();
        let created_at = self.clock.now_millis();
        self.created_at = Some(created_at);

        let record = CacheRecord::new(created_at, payload.as_str());
        self.in_memory = Some(payload);

        let directory = self.resolved_directory();
        self.fs
            .create_dir_all(&directory)
            .await
            .map_err(|source| CacheError::CreateDir {
                path: directory.clone(),
                source,
            })?;

        let path = directory.join(self.file_name());
        let json = record
            .to_json()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
            .map_err(|source| CacheError::Write {
                path: path.clone(),
                source,
            })?;

        self.fs
            .write_atomic(&path, json.as_bytes())
            .await
            .map_err(|source| CacheError::Write {
                path: path.clone(),
                source,
            })?;

        debug!(key = %self.key, path = %path.display(), created_at, "Saved cache entry");
        Ok(())
    }

    /// Returns the cached payload
    ///
    /// The in-memory copy wins whenever this instance has saved one, however
    /// old it is. Otherwise the record is read from disk; a disk hit does not
    /// populate memory. A missing file is an error.
    pub async fn read(&self) -> Result<String> {
        if let Some(payload) = &self.in_memory {
            trace!(key = %self.key, "Serving cache entry from memory");
            return Ok(payload.clone());
        }

        let record = self.read_record().await?;
        debug!(key = %self.key, created_at = record.created_at, "Read cache entry from disk");
        Ok(record.contents)
    }

    /// Whether a regular file exists at the cache path
    ///
    /// Any status error, including not-found, yields `false`.
    pub async fn is_cached(&self) -> bool {
        let path = self.resolved_file_path();
        match self.fs.is_file(&path).await {
            Ok(is_file) => is_file,
            Err(e) => {
                trace!(key = %self.key, error = %e, "Cache file status unavailable");
                false
            }
        }
    }

    /// Freshness under the configured duration and this instance's save time
    pub async fn is_cache_valid(&self) -> bool {
        self.is_cache_valid_with(self.options.duration, None).await
    }

    /// Freshness under an explicit `duration` and optional `created_at`
    ///
    /// `created_at` (milliseconds) overrides the instance's own save time
    /// without mutating it, which allows checking hypothetical freshness.
    /// Without a file on disk the instance must have saved a payload itself;
    /// an override alone never makes an empty cache valid.
    /// Never fails: status and parse errors degrade to the in-memory check.
    pub async fn is_cache_valid_with(&self, duration: Ttl, created_at: Option<i64>) -> bool {
        let created_at = match created_at {
            Some(EPOCH_ZERO) => None,
            Some(at) => Some(at),
            None => self.created_at,
        };
        let now = self.clock.now_millis();

        if self.is_cached().await {
            match self.options.validity {
                ValidityPolicy::FilePresence => return true,
                ValidityPolicy::Ttl => {
                    let stored = match created_at {
                        Some(at) => Some(at),
                        None => match self.read_record().await {
                            Ok(record) => Some(record.created_at),
                            Err(e) => {
                                warn!(key = %self.key, error = %e, "Ignoring unreadable cache file");
                                None
                            }
                        },
                    };
                    if let Some(stored) = stored {
                        let fresh = duration.is_fresh(stored, now);
                        trace!(key = %self.key, created_at = stored, fresh, "Checked cache file freshness");
                        return fresh;
                    }
                }
            }
        }

        if self.in_memory.is_none() {
            return false;
        }
        let Some(created_at) = created_at else {
            return false;
        };
        let fresh = duration.is_fresh(created_at, now);
        trace!(key = %self.key, created_at, fresh, "Checked in-memory freshness");
        fresh
    }

    /// Removes the cache file and forgets the in-memory copy
    ///
    /// A file that is already gone is not an error.
    pub async fn invalidate(&mut self) -> Result<()> {
        self.created_at = None;
        self.in_memory = None;

        let path = self.resolved_file_path();
        match self.fs.remove_file(&path).await {
            Ok(()) => {
                debug!(key = %self.key, path = %path.display(), "Removed cache entry");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CacheError::Remove { path, source }),
        }
    }

    /// Loads the full record from disk, ignoring the in-memory copy
    pub async fn read_record(&self) -> Result<CacheRecord> {
        let path = self.resolved_file_path();
        let raw = self
            .fs
            .read_to_string(&path)
            .await
            .map_err(|source| CacheError::Read {
                path: path.clone(),
                source,
            })?;
        CacheRecord::from_json(&raw).map_err(|source| CacheError::Malformed { path, source })
    }
}

/// Collapses `.` and `..` components without touching the filesystem
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                let last = out.components().next_back();
                let at_root = matches!(last, Some(Component::RootDir | Component::Prefix(_)));
                let after_normal = matches!(last, Some(Component::Normal(_)));
                if after_normal {
                    out.pop();
                } else if !at_root {
                    out.push("..");
                }
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}
