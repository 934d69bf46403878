//! A canned metrics provider for status-command tests.

use async_trait::async_trait;
use homebeat::core::{MetricsProvider, MetricsSnapshot};
use std::sync::Mutex;

/// Returns a preset snapshot, or a total-capture failure when none is set.
pub struct FakeMetricsProvider {
    snapshot: Mutex<Option<MetricsSnapshot>>,
}

impl FakeMetricsProvider {
    pub fn returning(snapshot: MetricsSnapshot) -> Self {
        Self {
            snapshot: Mutex::new(Some(snapshot)),
        }
    }

    pub fn failing() -> Self {
        Self {
            snapshot: Mutex::new(None),
        }
    }
}

#[async_trait]
impl MetricsProvider for FakeMetricsProvider {
    async fn capture(&self) -> anyhow::Result<MetricsSnapshot> {
        match self.snapshot.lock().unwrap().clone() {
            Some(snapshot) => Ok(snapshot),
            None => anyhow::bail!("simulated total capture failure"),
        }
    }
}
