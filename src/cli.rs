//! Command-line interface for inspecting cache files
//!
//! This module handles parsing of CLI arguments using clap and running the
//! selected subcommand against a [`FileCache`].

use std::path::{Component, Path, PathBuf};

use chrono::DateTime;
use clap::{Parser, Subcommand};
use thiserror::Error;
use tokio::io::AsyncReadExt;

use crate::cache::{
    CacheError, CacheOptions, FileCache, Ttl, ValidityPolicy, DEFAULT_DIRECTORY, DEFAULT_DURATION_SECS,
};

/// Name used for the platform cache directory
pub const APP_NAME: &str = "tiny-cache";

/// Error types for the command-line tool
#[derive(Debug, Error)]
pub enum CliError {
    /// The key cannot be used as a single file name component
    #[error("Invalid key: '{0}'. Keys must be non-empty and contain no path separators")]
    InvalidKey(String),

    /// `--user-cache` was given but the platform has no cache directory
    #[error("Could not determine the user cache directory (no home directory?)")]
    NoUserCacheDir,

    /// No cached value exists for the key
    #[error("Nothing cached for key '{0}'")]
    NotCached(String),

    /// Reading the value from stdin failed
    #[error("Failed to read value from stdin: {0}")]
    Stdin(#[from] std::io::Error),

    /// A cache operation failed
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Tiny Cache - inspect and manage on-disk TTL cache entries
#[derive(Parser, Debug)]
#[command(name = "tiny-cache")]
#[command(about = "Inspect and manage on-disk TTL cache entries")]
#[command(version)]
pub struct Cli {
    /// Base directory for cache files
    #[arg(long, short = 'd', global = true, value_name = "DIR", default_value = DEFAULT_DIRECTORY)]
    pub dir: PathBuf,

    /// Time-to-live in seconds, -1 for infinite
    #[arg(
        long,
        global = true,
        value_name = "SECS",
        default_value_t = DEFAULT_DURATION_SECS,
        allow_negative_numbers = true
    )]
    pub duration: i64,

    /// Treat any existing cache file as valid regardless of its age
    #[arg(long, global = true)]
    pub file_presence: bool,

    /// Use the platform cache directory (`~/.cache/tiny-cache` on Linux) instead of --dir
    #[arg(long, global = true)]
    pub user_cache: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands, each operating on a single key
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the resolved cache file path
    Path { key: String },
    /// Print whether the entry exists and is still fresh
    Status { key: String },
    /// Print the cached value
    Read { key: String },
    /// Store a value; pass `-` to read it from stdin
    Save { key: String, value: String },
    /// Remove the cache file
    Clear { key: String },
}

impl Command {
    pub fn key(&self) -> &str {
        match self {
            Command::Path { key }
            | Command::Status { key }
            | Command::Read { key }
            | Command::Save { key, .. }
            | Command::Clear { key } => key,
        }
    }
}

impl Cli {
    /// Cache options derived from the global flags
    ///
    /// # Returns
    /// * `Ok(CacheOptions)` rooted in `--dir`, or the user cache directory with `--user-cache`
    /// * `Err(CliError::NoUserCacheDir)` if `--user-cache` is set and no home directory exists
    pub fn options(&self) -> Result<CacheOptions, CliError> {
        let validity = if self.file_presence {
            ValidityPolicy::FilePresence
        } else {
            ValidityPolicy::Ttl
        };
        let base = if self.user_cache {
            CacheOptions::in_user_cache_dir(APP_NAME).ok_or(CliError::NoUserCacheDir)?
        } else {
            CacheOptions::default().with_directory(&self.dir)
        };
        Ok(base
            .with_ttl(Ttl::from_secs(self.duration))
            .with_validity(validity))
    }
}

/// Validates that a key names exactly one ordinary path component.
///
/// # Arguments
/// * `key` - The key from the command line
///
/// # Returns
/// * `Ok(&str)` if the key is usable in a file name
/// * `Err(CliError::InvalidKey)` otherwise
pub fn validate_key(key: &str) -> Result<&str, CliError> {
    let mut components = Path::new(key).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) if part == key => Ok(key),
        _ => Err(CliError::InvalidKey(key.to_string())),
    }
}

/// Runs the parsed command and returns the text to print on stdout.
pub async fn run(cli: &Cli) -> Result<String, CliError> {
    let key = validate_key(cli.command.key())?;
    let mut cache = FileCache::new(key, cli.options()?);

    match &cli.command {
        Command::Path { .. } => Ok(cache.resolved_file_path().display().to_string()),
        Command::Status { .. } => {
            let cached = cache.is_cached().await;
            let valid = cache.is_cache_valid().await;
            let mut out = format!("cached: {}\nvalid: {}", cached, valid);
            if cached {
                if let Ok(record) = cache.read_record().await {
                    let created = DateTime::from_timestamp_millis(record.created_at)
                        .map(|at| at.to_rfc3339())
                        .unwrap_or_else(|| record.created_at.to_string());
                    out.push_str(&format!("\ncreated_at: {}", created));
                }
            }
            Ok(out)
        }
        Command::Read { .. } => match cache.read().await {
            Ok(value) => Ok(value),
            Err(e) if e.is_not_found() => Err(CliError::NotCached(key.to_string())),
            Err(e) => Err(e.into()),
        },
        Command::Save { value, .. } => {
            let value = if value == "-" {
                let mut buf = String::new();
                tokio::io::stdin().read_to_string(&mut buf).await?;
                buf
            } else {
                value.clone()
            };
            cache.save(value).await?;
            Ok(cache.resolved_file_path().display().to_string())
        }
        Command::Clear { .. } => {
            cache.invalidate().await?;
            Ok(String::new())
        }
    }
}
