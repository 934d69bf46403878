//! Status command dispatch.
//!
//! A reactive loop that consumes inbound chat messages from the gateway,
//! filters for the status trigger, captures a metrics snapshot, and forwards
//! the result to the notifier.

use crate::core::{InboundMessage, MetricsProvider, Notifier};
use log::{debug, error, info};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

/// The single recognized trigger phrase, matched case-insensitively.
pub const STATUS_TRIGGER: &str = "!status";

/// Generic reply sent when metrics capture fails entirely.
pub const CAPTURE_FAILURE_REPLY: &str = "Error fetching system metrics.";

/// Returns true when an inbound message is a status query this agent should
/// answer: posted by a human, in the configured channel, matching the
/// trigger phrase regardless of case.
pub fn is_status_command(msg: &InboundMessage, channel_id: &str) -> bool {
    !msg.author_is_bot
        && msg.channel_id == channel_id
        && msg.content.trim().eq_ignore_ascii_case(STATUS_TRIGGER)
}

/// The command dispatcher actor.
pub struct CommandDispatcher {
    channel_id: String,
    inbound_rx: mpsc::Receiver<InboundMessage>,
    provider: Arc<dyn MetricsProvider>,
    notifier: Arc<dyn Notifier>,
}

impl CommandDispatcher {
    pub fn new(
        channel_id: String,
        inbound_rx: mpsc::Receiver<InboundMessage>,
        provider: Arc<dyn MetricsProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            channel_id,
            inbound_rx,
            provider,
            notifier,
        }
    }

    /// Runs the dispatch loop until shutdown or until the gateway closes the
    /// inbound channel.
    pub async fn run(mut self, mut shutdown_rx: watch::Receiver<()>) {
        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.changed() => {
                    info!("Command dispatcher received shutdown signal. Exiting.");
                    break;
                }
                msg = self.inbound_rx.recv() => {
                    match msg {
                        Some(msg) => {
                            if is_status_command(&msg, &self.channel_id) {
                                debug!("Status query received");
                                self.handle_status_query().await;
                            }
                        }
                        None => {
                            info!("Inbound message channel closed. Command dispatcher exiting.");
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Captures a snapshot and replies. Total capture failure yields a
    /// single generic error reply; delivery failures are logged and dropped.
    async fn handle_status_query(&self) {
        match self.provider.capture().await {
            Ok(snapshot) => {
                if let Err(e) = self.notifier.notify_snapshot(&snapshot).await {
                    error!("Failed to deliver status report: {}", e);
                }
            }
            Err(e) => {
                error!("Metrics capture failed: {}", e);
                if let Err(e) = self.notifier.notify_error(CAPTURE_FAILURE_REPLY).await {
                    error!("Failed to deliver capture-failure reply: {}", e);
                }
            }
        }
    }
}
