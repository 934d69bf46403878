//! # Host Metrics Probe
//!
//! This module defines the `SystemProbe`, the component responsible for
//! gathering live host metrics (CPU temperature, memory, disk, OS info,
//! uptime) via the `sysinfo` crate when a status query arrives.
//!
//! Individual sensors degrade independently: a host without a readable CPU
//! temperature sensor (common on virtualized hardware) still produces a
//! snapshot, with that field marked unavailable.

use crate::core::{MetricsProvider, MetricsSnapshot};
use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use std::path::Path;
use sysinfo::{Components, Disks, System};

/// sysinfo-backed implementation of [`MetricsProvider`].
///
/// Stateless: each capture refreshes a fresh `System`, since snapshots are
/// taken on demand rather than on a sampling loop.
pub struct SystemProbe;

impl SystemProbe {
    pub fn new() -> Self {
        Self
    }

    /// Picks the CPU temperature from the component list, if any sensor
    /// looks like it belongs to the CPU.
    fn cpu_temperature(components: &Components) -> Option<f32> {
        let cpu_sensor = components.iter().find(|c| {
            let label = c.label().to_lowercase();
            label.contains("cpu") || label.contains("tctl") || label.contains("package")
        });

        cpu_sensor
            .or_else(|| components.iter().next())
            .map(|c| c.temperature())
            .filter(|t| t.is_finite() && *t > 0.0)
    }
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetricsProvider for SystemProbe {
    async fn capture(&self) -> Result<MetricsSnapshot> {
        let mut sys = System::new();
        sys.refresh_memory();

        if sys.total_memory() == 0 {
            anyhow::bail!("failed to read memory information");
        }

        // The primary volume is the one mounted at the filesystem root,
        // falling back to the largest disk when no root mount is listed.
        let disks = Disks::new_with_refreshed_list();
        let primary = disks
            .iter()
            .find(|d| d.mount_point() == Path::new("/"))
            .or_else(|| disks.iter().max_by_key(|d| d.total_space()));

        let (disk_used, disk_total) = match primary {
            Some(disk) => (
                disk.total_space().saturating_sub(disk.available_space()),
                disk.total_space(),
            ),
            None => anyhow::bail!("no disks found"),
        };

        let components = Components::new_with_refreshed_list();
        let cpu_temp = Self::cpu_temperature(&components);
        if cpu_temp.is_none() {
            debug!("No usable CPU temperature sensor found");
        }

        Ok(MetricsSnapshot {
            cpu_temp_celsius: cpu_temp,
            mem_used_bytes: sys.used_memory(),
            mem_total_bytes: sys.total_memory(),
            disk_used_bytes: disk_used,
            disk_total_bytes: disk_total,
            os_distro: System::long_os_version().or_else(System::name),
            kernel_version: System::kernel_version(),
            uptime_seconds: System::uptime(),
        })
    }
}
