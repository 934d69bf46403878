//! Startup outage detection.
//!
//! The detector runs exactly once per process lifetime, before the recorder's
//! first tick: it reads the last persisted heartbeat, classifies the gap to
//! the current time, re-arms the heartbeat record, and delivers at most one
//! recovery notification.

use crate::core::{Clock, HeartbeatStore, Notifier, OutageEvent};
use chrono::Duration;
use log::{debug, error, info, warn};
use std::sync::Arc;

/// Outcome of comparing a heartbeat gap against the suppression threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapClassification {
    /// Gap within the threshold: a routine restart, no notification.
    WithinThreshold,
    /// Negative gap: the record is from the future (clock moved backward or
    /// the file was tampered with). Suppressed, logged as an anomaly.
    ClockAnomaly,
    /// Gap beyond the threshold: a real outage worth reporting.
    Outage,
}

/// Classifies a heartbeat gap.
///
/// The boundary is inclusive on the quiet side: `gap == threshold` is still a
/// routine restart. Only a strictly greater gap produces an outage.
pub fn classify_gap(gap: Duration, threshold: Duration) -> GapClassification {
    if gap < Duration::zero() {
        GapClassification::ClockAnomaly
    } else if gap > threshold {
        GapClassification::Outage
    } else {
        GapClassification::WithinThreshold
    }
}

/// The startup outage detector.
pub struct OutageDetector {
    store: Arc<dyn HeartbeatStore>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    threshold: Duration,
}

impl OutageDetector {
    pub fn new(
        store: Arc<dyn HeartbeatStore>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
        threshold: Duration,
    ) -> Self {
        Self {
            store,
            clock,
            notifier,
            threshold,
        }
    }

    /// Runs the single startup pass.
    ///
    /// Never fails the process: store failures are logged and treated as a
    /// first run, delivery failures are logged and dropped. Returns the
    /// outage event if one was produced, mainly for logging and tests.
    pub async fn run_startup_pass(&self) -> Option<OutageEvent> {
        let last_heartbeat = match self.store.read() {
            Ok(record) => record,
            Err(e) => {
                error!("Failed to read heartbeat record, treating as first run: {}", e);
                None
            }
        };

        let event = match last_heartbeat {
            None => {
                info!("No prior heartbeat record found; skipping outage check");
                None
            }
            Some(last) => {
                let now = self.clock.now();
                let gap = now - last;
                match classify_gap(gap, self.threshold) {
                    GapClassification::WithinThreshold => {
                        debug!(
                            "Last heartbeat {}s ago, within the {}s threshold; routine restart",
                            gap.num_seconds(),
                            self.threshold.num_seconds()
                        );
                        None
                    }
                    GapClassification::ClockAnomaly => {
                        warn!(
                            "Stored heartbeat is {}s in the future; clock anomaly, suppressing",
                            (-gap).num_seconds()
                        );
                        None
                    }
                    GapClassification::Outage => Some(OutageEvent {
                        last_heartbeat_at: last,
                        recovered_at: now,
                    }),
                }
            }
        };

        // Re-arm before any blocking delivery so a hung chat call cannot
        // inflate the downtime measured by a subsequent restart.
        if let Err(e) = self.store.write(self.clock.now()) {
            error!("Failed to re-arm heartbeat record: {}", e);
        }

        if let Some(event) = &event {
            info!(
                "Outage detected: down for {} minutes (last heartbeat {})",
                event.downtime_minutes(),
                event.last_heartbeat_at
            );
            if let Err(e) = self.notifier.notify_outage(event).await {
                error!("Failed to deliver outage notification: {}", e);
            }
        }

        event
    }
}
