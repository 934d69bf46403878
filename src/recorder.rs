//! Periodic heartbeat recording.

use crate::core::{Clock, HeartbeatStore};
use log::{debug, error, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;

/// Writes the current time to the heartbeat store on a fixed interval, for
/// the remaining lifetime of the process.
///
/// A failed write is logged and the schedule continues uninterrupted; the
/// next scheduled tick is the retry.
pub struct HeartbeatRecorder {
    store: Arc<dyn HeartbeatStore>,
    clock: Arc<dyn Clock>,
    interval: Duration,
}

impl HeartbeatRecorder {
    pub fn new(store: Arc<dyn HeartbeatStore>, clock: Arc<dyn Clock>, interval: Duration) -> Self {
        Self {
            store,
            clock,
            interval,
        }
    }

    /// Runs the recording loop until the shutdown signal arrives.
    pub async fn run(self, mut shutdown_rx: tokio::sync::watch::Receiver<()>) {
        let mut timer = interval(self.interval);
        // The detector has just re-armed the record; skip the interval's
        // immediate first tick so writes land one full interval apart.
        timer.tick().await;

        info!(
            "Heartbeat recorder started (interval {}s)",
            self.interval.as_secs()
        );

        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.changed() => {
                    info!("Heartbeat recorder received shutdown signal. Exiting.");
                    break;
                }
                _ = timer.tick() => {
                    let now = self.clock.now();
                    match self.store.write(now) {
                        Ok(()) => debug!("Heartbeat written at {}", now),
                        Err(e) => error!("Failed to write heartbeat: {}", e),
                    }
                }
            }
        }
    }
}
