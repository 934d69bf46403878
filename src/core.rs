//! Core domain types and service traits for homebeat
//!
//! This module defines the fundamental data structures and trait contracts
//! that govern component interactions throughout the application.

use crate::store::StoreError;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

/// An outage inferred at startup from the gap between the last persisted
/// heartbeat and the current time.
///
/// Produced at most once per process lifetime by the `OutageDetector`,
/// consumed by a `Notifier`, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutageEvent {
    /// The last heartbeat written before the process stopped.
    pub last_heartbeat_at: DateTime<Utc>,
    /// The moment the restarted process classified the gap.
    pub recovered_at: DateTime<Utc>,
}

impl OutageEvent {
    /// The inferred downtime window.
    pub fn downtime(&self) -> Duration {
        self.recovered_at - self.last_heartbeat_at
    }

    /// Downtime in whole minutes, as reported to the operator.
    pub fn downtime_minutes(&self) -> i64 {
        self.downtime().num_minutes()
    }
}

/// A point-in-time read of host metrics, produced per status query.
///
/// Individual fields degrade to `None` when a sensor is unavailable
/// (CPU temperature on most virtualized hosts, for example) rather than
/// failing the whole snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    /// CPU package temperature in Celsius, if the host exposes a sensor.
    pub cpu_temp_celsius: Option<f32>,
    /// Physical memory in use, bytes.
    pub mem_used_bytes: u64,
    /// Total physical memory, bytes.
    pub mem_total_bytes: u64,
    /// Used space on the primary volume, bytes.
    pub disk_used_bytes: u64,
    /// Capacity of the primary volume, bytes.
    pub disk_total_bytes: u64,
    /// OS distribution string (e.g., "Debian GNU/Linux 12").
    pub os_distro: Option<String>,
    /// Kernel version string.
    pub kernel_version: Option<String>,
    /// Seconds since boot.
    pub uptime_seconds: u64,
}

impl MetricsSnapshot {
    /// Used fraction of the primary volume, in percent.
    pub fn disk_percent(&self) -> f64 {
        if self.disk_total_bytes == 0 {
            return 0.0;
        }
        self.disk_used_bytes as f64 / self.disk_total_bytes as f64 * 100.0
    }
}

/// An inbound chat message as seen by the command dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// The channel the message was posted in.
    pub channel_id: String,
    /// Whether the author is a bot account (bot traffic is never a command).
    pub author_is_bot: bool,
    /// Raw message text.
    pub content: String,
}

// =============================================================================
// Service Traits
// =============================================================================

/// A wall-clock source.
///
/// The detector and recorder take their notion of "now" through this trait so
/// tests can replay clock anomalies without touching the real clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The real system clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Durable single-record storage for the liveness timestamp.
///
/// Exactly one record exists at a time; every write fully replaces the prior
/// value. Absence is a valid state meaning "never run before" or "storage was
/// cleared" and is reported as `Ok(None)`, never as an error.
pub trait HeartbeatStore: Send + Sync {
    /// Returns the last written timestamp, or `None` if no record exists.
    ///
    /// I/O failures unrelated to absence (permissions, disk errors) and
    /// unparseable records surface as distinct `StoreError` variants.
    fn read(&self) -> Result<Option<DateTime<Utc>>, StoreError>;

    /// Atomically replaces the stored timestamp.
    fn write(&self, timestamp: DateTime<Utc>) -> Result<(), StoreError>;
}

/// Delivers operator-facing messages to the chat channel.
///
/// All three calls are best-effort: callers log a failure and move on, they
/// never retry or block progress on delivery.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Announces a recovered outage.
    async fn notify_outage(&self, event: &OutageEvent) -> Result<()>;

    /// Replies to a status query with a metrics report.
    async fn notify_snapshot(&self, snapshot: &MetricsSnapshot) -> Result<()>;

    /// Replies with a generic error message when metrics capture failed.
    async fn notify_error(&self, text: &str) -> Result<()>;
}

/// Gathers a live snapshot of host metrics.
#[async_trait]
pub trait MetricsProvider: Send + Sync {
    /// Captures a snapshot.
    ///
    /// # Returns
    /// * `Ok(MetricsSnapshot)` with per-field degradation for missing sensors
    /// * `Err` only on total capture failure
    async fn capture(&self) -> Result<MetricsSnapshot>;
}
