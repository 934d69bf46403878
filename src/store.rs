//! Durable single-record heartbeat storage.
//!
//! The store keeps exactly one JSON record (`{"timestamp": <unix millis>}`)
//! in a local file. Only the most recent liveness signal matters, so a full
//! replace on every write keeps the store O(1) in size indefinitely.

use crate::core::HeartbeatStore;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Failure modes of the heartbeat store.
///
/// A missing record file is NOT an error (it means "never run before") and is
/// reported as `Ok(None)` from `read`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O failure unrelated to absence (permissions, disk full).
    #[error("heartbeat store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The record file exists but its content could not be parsed.
    #[error("heartbeat record malformed: {0}")]
    Malformed(String),
}

/// The persisted record shape.
#[derive(Debug, Serialize, Deserialize)]
struct HeartbeatRecord {
    /// Unix timestamp in milliseconds.
    timestamp: i64,
}

/// File-backed implementation of [`HeartbeatStore`].
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash mid-write never leaves a truncated record behind.
pub struct FileHeartbeatStore {
    path: PathBuf,
}

impl FileHeartbeatStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl HeartbeatStore for FileHeartbeatStore {
    fn read(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e)),
        };

        let record: HeartbeatRecord = serde_json::from_str(&raw)
            .map_err(|e| StoreError::Malformed(e.to_string()))?;

        match Utc.timestamp_millis_opt(record.timestamp) {
            chrono::LocalResult::Single(ts) => Ok(Some(ts)),
            _ => Err(StoreError::Malformed(format!(
                "timestamp {} is out of range",
                record.timestamp
            ))),
        }
    }

    fn write(&self, timestamp: DateTime<Utc>) -> Result<(), StoreError> {
        let record = HeartbeatRecord {
            timestamp: timestamp.timestamp_millis(),
        };
        // serde_json serialization of this struct cannot fail.
        let raw = serde_json::to_string(&record)
            .map_err(|e| StoreError::Malformed(e.to_string()))?;

        let temp = self.temp_path();
        fs::write(&temp, raw)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}
