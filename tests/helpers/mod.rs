pub mod fake_metrics;
pub mod manual_clock;
pub mod mock_notifier;
pub mod mock_store;

use chrono::{TimeZone, Utc};
use homebeat::core::MetricsSnapshot;

/// A fixed reference instant used as "now" across detector tests.
pub fn reference_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// A fully populated snapshot for status-path tests.
pub fn sample_snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        cpu_temp_celsius: Some(48.0),
        mem_used_bytes: 2 * 1024 * 1024 * 1024,
        mem_total_bytes: 8 * 1024 * 1024 * 1024,
        disk_used_bytes: 100 * 1024 * 1024 * 1024,
        disk_total_bytes: 500 * 1024 * 1024 * 1024,
        os_distro: Some("Debian GNU/Linux 12".to_string()),
        kernel_version: Some("6.1.0-18-amd64".to_string()),
        uptime_seconds: 7265,
    }
}
