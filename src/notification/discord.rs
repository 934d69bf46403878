//! A client for sending notifications to a Discord channel.

use crate::core::{MetricsSnapshot, Notifier, OutageEvent};
use crate::formatting;
use async_trait::async_trait;
use chrono::Utc;
use log::{error, info};
use serde_json::{json, Value};
use std::time::Duration;

const DISCORD_API_BASE: &str = "https://discord.com/api/v10";

/// Embed accent colors, matching the original operator dashboard style.
const COLOR_RECOVERY_GREEN: u32 = 0x2ecc71;
const COLOR_STATUS_SLATE: u32 = 0x34495e;

const EMBED_FOOTER: &str = "Home Server Node";

/// A client that posts messages to one Discord channel through the REST API.
///
/// Requests carry a bounded timeout so a hung network call can never stall
/// the detector's startup sequence.
pub struct DiscordNotifier {
    http: reqwest::Client,
    api_base: String,
    token: String,
    channel_id: String,
}

impl DiscordNotifier {
    /// Creates a new notifier targeting the given channel.
    pub fn new(token: String, channel_id: String) -> anyhow::Result<Self> {
        Self::with_api_base(token, channel_id, DISCORD_API_BASE.to_string())
    }

    /// Creates a notifier against a custom API base URL (used by tests to
    /// point at a local mock server).
    pub fn with_api_base(
        token: String,
        channel_id: String,
        api_base: String,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            http,
            api_base,
            token,
            channel_id,
        })
    }

    async fn post_message(&self, payload: &Value) -> anyhow::Result<()> {
        let url = format!("{}/channels/{}/messages", self.api_base, self.channel_id);
        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bot {}", self.token))
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            error!(
                "Discord message delivery failed: status {}, body: {}",
                status, body
            );
            anyhow::bail!("Discord API returned status {}", status)
        }
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn notify_outage(&self, event: &OutageEvent) -> anyhow::Result<()> {
        let embed = json!({
            "title": "System Power Recovery",
            "color": COLOR_RECOVERY_GREEN,
            "fields": [
                {
                    "name": "Last Recorded Heartbeat",
                    "value": formatting::discord_timestamp(event.last_heartbeat_at),
                    "inline": false
                },
                {
                    "name": "Recovery Time",
                    "value": formatting::discord_timestamp(event.recovered_at),
                    "inline": false
                },
                {
                    "name": "Total Downtime",
                    "value": formatting::downtime_line(event),
                    "inline": false
                }
            ],
            "footer": { "text": EMBED_FOOTER }
        });

        self.post_message(&json!({ "embeds": [embed] })).await?;
        info!(
            "Recovery alert sent: {} mins downtime",
            event.downtime_minutes()
        );
        Ok(())
    }

    async fn notify_snapshot(&self, snapshot: &MetricsSnapshot) -> anyhow::Result<()> {
        let embed = json!({
            "title": "Home Server Status Report",
            "color": COLOR_STATUS_SLATE,
            "fields": [
                { "name": "CPU Temperature", "value": formatting::cpu_temp_line(snapshot), "inline": true },
                { "name": "Memory Usage", "value": formatting::memory_line(snapshot), "inline": true },
                { "name": "System Uptime", "value": formatting::uptime_line(snapshot), "inline": true },
                { "name": "Storage Usage", "value": formatting::storage_line(snapshot), "inline": false },
                { "name": "Operating System", "value": formatting::os_line(snapshot), "inline": true },
                { "name": "Kernel Version", "value": formatting::kernel_line(snapshot), "inline": true }
            ],
            "timestamp": Utc::now().to_rfc3339(),
            "footer": { "text": EMBED_FOOTER }
        });

        self.post_message(&json!({ "embeds": [embed] })).await?;
        info!("Status report sent");
        Ok(())
    }

    async fn notify_error(&self, text: &str) -> anyhow::Result<()> {
        self.post_message(&json!({ "content": text })).await
    }
}
