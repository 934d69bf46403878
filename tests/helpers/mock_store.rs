//! An in-memory heartbeat store for testing the detector and recorder.

use chrono::{DateTime, Utc};
use homebeat::core::HeartbeatStore;
use homebeat::store::StoreError;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub struct MockHeartbeatStore {
    record: Mutex<Option<DateTime<Utc>>>,
    writes: Mutex<Vec<DateTime<Utc>>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MockHeartbeatStore {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_record(timestamp: DateTime<Utc>) -> Self {
        let store = Self::default();
        *store.record.lock().unwrap() = Some(timestamp);
        store
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn record(&self) -> Option<DateTime<Utc>> {
        *self.record.lock().unwrap()
    }

    /// All successful writes, in order.
    pub fn writes(&self) -> Vec<DateTime<Utc>> {
        self.writes.lock().unwrap().clone()
    }
}

impl HeartbeatStore for MockHeartbeatStore {
    fn read(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "simulated read failure",
            )));
        }
        Ok(*self.record.lock().unwrap())
    }

    fn write(&self, timestamp: DateTime<Utc>) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Io(io::Error::new(
                io::ErrorKind::Other,
                "simulated write failure",
            )));
        }
        *self.record.lock().unwrap() = Some(timestamp);
        self.writes.lock().unwrap().push(timestamp);
        Ok(())
    }
}
