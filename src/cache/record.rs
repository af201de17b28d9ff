//! On-disk cache record
//!
//! Each key maps to one file holding a flat JSON object with exactly two
//! fields, `createdAt` (milliseconds since the epoch) and `contents` (the
//! payload, stored verbatim and never decoded).

use serde::{Deserialize, Serialize};

/// The record written to `tiny-cache-<key>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheRecord {
    /// Save time in milliseconds since the Unix epoch
    pub created_at: i64,
    /// The opaque payload
    pub contents: String,
}

impl CacheRecord {
    pub fn new(created_at: i64, contents: impl Into<String>) -> Self {
        Self {
            created_at,
            contents: contents.into(),
        }
    }

    /// Encodes the record as compact JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decodes a record, failing on missing fields or wrong types
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}
