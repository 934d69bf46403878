//! Rendering of outage events and metrics snapshots into message text.
//!
//! Kept separate from delivery so the exact operator-facing strings can be
//! unit tested without a network.

use crate::core::{MetricsSnapshot, OutageEvent};
use chrono::{DateTime, Utc};

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Renders an absolute time as Discord timestamp markup, which the client
/// displays in the viewer's local timezone.
pub fn discord_timestamp(ts: DateTime<Utc>) -> String {
    format!("<t:{}:f>", ts.timestamp())
}

/// Downtime in whole minutes, e.g. "5 minutes".
pub fn downtime_line(event: &OutageEvent) -> String {
    format!("{} minutes", event.downtime_minutes())
}

/// CPU temperature field, e.g. "42 Celsius", or "N/A Celsius" when the host
/// exposes no usable sensor.
pub fn cpu_temp_line(snapshot: &MetricsSnapshot) -> String {
    match snapshot.cpu_temp_celsius {
        Some(temp) => format!("{} Celsius", temp.round() as i64),
        None => "N/A Celsius".to_string(),
    }
}

/// Memory usage, e.g. "1.23GB / 4.00GB".
pub fn memory_line(snapshot: &MetricsSnapshot) -> String {
    format!(
        "{:.2}GB / {:.2}GB",
        snapshot.mem_used_bytes as f64 / BYTES_PER_GB,
        snapshot.mem_total_bytes as f64 / BYTES_PER_GB
    )
}

/// System uptime, e.g. "3h 7m".
pub fn uptime_line(snapshot: &MetricsSnapshot) -> String {
    let hours = snapshot.uptime_seconds / 3600;
    let mins = (snapshot.uptime_seconds % 3600) / 60;
    format!("{}h {}m", hours, mins)
}

/// Primary volume usage, e.g. "10.00GB / 50.00GB (20.0%)".
pub fn storage_line(snapshot: &MetricsSnapshot) -> String {
    format!(
        "{:.2}GB / {:.2}GB ({:.1}%)",
        snapshot.disk_used_bytes as f64 / BYTES_PER_GB,
        snapshot.disk_total_bytes as f64 / BYTES_PER_GB,
        snapshot.disk_percent()
    )
}

/// OS distribution field value.
pub fn os_line(snapshot: &MetricsSnapshot) -> String {
    snapshot.os_distro.clone().unwrap_or_else(|| "N/A".to_string())
}

/// Kernel version field value.
pub fn kernel_line(snapshot: &MetricsSnapshot) -> String {
    snapshot
        .kernel_version
        .clone()
        .unwrap_or_else(|| "N/A".to_string())
}
