//! Filesystem access for cache files

use std::fmt::Debug;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::fs;

/// The filesystem operations the cache needs
///
/// Every method suspends until the underlying I/O completes.
#[async_trait]
pub trait CacheFs: Send + Sync + Debug {
    /// Creates `path` and all missing parents; succeeds if it already exists
    async fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Replaces the contents of `path` as a whole
    async fn write_atomic(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    async fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Whether `path` itself (not a symlink target) is a regular file
    async fn is_file(&self, path: &Path) -> io::Result<bool>;

    async fn remove_file(&self, path: &Path) -> io::Result<()>;
}

/// [`CacheFs`] backed by `tokio::fs`
///
/// Writes go to a sibling temporary file which is then renamed over the
/// target, so a concurrent reader sees either the old or the new record.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFs;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Hidden temporary name next to `path`, unique within this process
fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let seq = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    path.with_file_name(format!(".{}.{}.{}.tmp", file_name, std::process::id(), seq))
}

#[async_trait]
impl CacheFs for TokioFs {
    async fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path).await
    }

    async fn write_atomic(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let temp = temp_path_for(path);
        if let Err(e) = fs::write(&temp, contents).await {
            let _ = fs::remove_file(&temp).await;
            return Err(e);
        }
        if let Err(e) = fs::rename(&temp, path).await {
            let _ = fs::remove_file(&temp).await;
            return Err(e);
        }
        Ok(())
    }

    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path).await
    }

    async fn is_file(&self, path: &Path) -> io::Result<bool> {
        Ok(fs::symlink_metadata(path).await?.is_file())
    }

    async fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path).await
    }
}
