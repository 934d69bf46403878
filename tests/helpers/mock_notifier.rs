//! A recording notifier for testing delivery paths without a network.

use async_trait::async_trait;
use homebeat::core::{MetricsSnapshot, Notifier, OutageEvent};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub struct RecordingNotifier {
    outages: Mutex<Vec<OutageEvent>>,
    snapshots: Mutex<Vec<MetricsSnapshot>>,
    errors: Mutex<Vec<String>>,
    fail_delivery: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_delivery(&self, fail: bool) {
        self.fail_delivery.store(fail, Ordering::SeqCst);
    }

    pub fn outages(&self) -> Vec<OutageEvent> {
        self.outages.lock().unwrap().clone()
    }

    pub fn snapshots(&self) -> Vec<MetricsSnapshot> {
        self.snapshots.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify_outage(&self, event: &OutageEvent) -> anyhow::Result<()> {
        if self.fail_delivery.load(Ordering::SeqCst) {
            anyhow::bail!("simulated delivery failure");
        }
        self.outages.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn notify_snapshot(&self, snapshot: &MetricsSnapshot) -> anyhow::Result<()> {
        if self.fail_delivery.load(Ordering::SeqCst) {
            anyhow::bail!("simulated delivery failure");
        }
        self.snapshots.lock().unwrap().push(snapshot.clone());
        Ok(())
    }

    async fn notify_error(&self, text: &str) -> anyhow::Result<()> {
        if self.fail_delivery.load(Ordering::SeqCst) {
            anyhow::bail!("simulated delivery failure");
        }
        self.errors.lock().unwrap().push(text.to_string());
        Ok(())
    }
}
