//! Point-in-time view of host statistics.
//!
//! All probing goes through `sysinfo`, which carries the per-OS
//! implementations. [`HostSnapshot::capture`] refreshes a fresh `System`,
//! `Disks` and `Networks` and copies what the producers need into plain
//! structs, so producers never touch `sysinfo` directly and can be tested
//! with hand-built snapshots.

use std::{
    collections::BTreeMap,
    time::{SystemTime, UNIX_EPOCH},
};

use sysinfo::{Disks, Networks, System, MINIMUM_CPU_UPDATE_INTERVAL};

/// Per-core CPU statistics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuStat {
    /// Busy percentage over the sampling window, 0–100.
    pub usage_percent: f32,
    pub frequency_mhz: u64,
}

/// Physical memory and swap, in bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStat {
    pub total: u64,
    pub available: u64,
    pub used: u64,
    pub free: u64,
    pub swap_total: u64,
    pub swap_used: u64,
    pub swap_free: u64,
}

/// One mounted filesystem.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilesystemStat {
    pub device: String,
    pub mount_point: String,
    pub fs_type: String,
    pub size_bytes: u64,
    pub avail_bytes: u64,
}

/// Cumulative counters of one network interface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceStat {
    pub name: String,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    pub rx_packets: u64,
    pub tx_packets: u64,
    pub rx_errors: u64,
    pub tx_errors: u64,
}

/// 1, 5 and 15 minute load averages.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoadStat {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

/// Kernel identification and clock.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SystemStat {
    pub sysname: String,
    pub release: String,
    pub version: String,
    pub nodename: String,
    /// Unix time of the last boot, seconds.
    pub boot_time_seconds: u64,
    /// Unix time at capture, seconds with fractional part.
    pub time_seconds: f64,
}

/// Everything the producers read during one gather.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostSnapshot {
    pub cpus: Vec<CpuStat>,
    pub memory: MemoryStat,
    /// Sorted by mount point, one entry per mount point.
    pub filesystems: Vec<FilesystemStat>,
    /// Sorted by interface name.
    pub interfaces: Vec<InterfaceStat>,
    /// `None` where the OS has no load average.
    pub load: Option<LoadStat>,
    pub system: SystemStat,
}

impl HostSnapshot {
    /// Refreshes host statistics from scratch.
    ///
    /// Blocking: CPU usage needs two refreshes separated by
    /// `MINIMUM_CPU_UPDATE_INTERVAL`, and disk enumeration may stall on slow
    /// mounts. Call from `spawn_blocking` inside async code.
    pub fn capture() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu();
        std::thread::sleep(MINIMUM_CPU_UPDATE_INTERVAL);
        sys.refresh_cpu();
        sys.refresh_memory();

        let cpus = sys
            .cpus()
            .iter()
            .map(|cpu| CpuStat {
                usage_percent: cpu.cpu_usage(),
                frequency_mhz: cpu.frequency(),
            })
            .collect();

        let memory = MemoryStat {
            total: sys.total_memory(),
            available: sys.available_memory(),
            used: sys.used_memory(),
            free: sys.free_memory(),
            swap_total: sys.total_swap(),
            swap_used: sys.used_swap(),
            swap_free: sys.free_swap(),
        };

        // Bind mounts can report the same mount point more than once.
        let disks = Disks::new_with_refreshed_list();
        let filesystems: BTreeMap<String, FilesystemStat> = disks
            .list()
            .iter()
            .map(|disk| {
                let mount_point = disk.mount_point().to_string_lossy().into_owned();
                let stat = FilesystemStat {
                    device: disk.name().to_string_lossy().into_owned(),
                    mount_point: mount_point.clone(),
                    fs_type: disk.file_system().to_string_lossy().into_owned(),
                    size_bytes: disk.total_space(),
                    avail_bytes: disk.available_space(),
                };
                (mount_point, stat)
            })
            .collect();

        let networks = Networks::new_with_refreshed_list();
        let mut interfaces: Vec<InterfaceStat> = networks
            .iter()
            .map(|(name, data)| InterfaceStat {
                name: name.clone(),
                rx_bytes: data.total_received(),
                tx_bytes: data.total_transmitted(),
                rx_packets: data.total_packets_received(),
                tx_packets: data.total_packets_transmitted(),
                rx_errors: data.total_errors_on_received(),
                tx_errors: data.total_errors_on_transmitted(),
            })
            .collect();
        interfaces.sort_by(|a, b| a.name.cmp(&b.name));

        Self {
            cpus,
            memory,
            filesystems: filesystems.into_values().collect(),
            interfaces,
            load: capture_load(),
            system: capture_system(),
        }
    }
}

#[cfg(unix)]
fn capture_load() -> Option<LoadStat> {
    let load = System::load_average();
    Some(LoadStat {
        one: load.one,
        five: load.five,
        fifteen: load.fifteen,
    })
}

#[cfg(not(unix))]
fn capture_load() -> Option<LoadStat> {
    None
}

fn capture_system() -> SystemStat {
    let time_seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default();

    SystemStat {
        sysname: System::name().unwrap_or_default(),
        release: System::kernel_version().unwrap_or_default(),
        version: System::os_version().unwrap_or_default(),
        nodename: System::host_name().unwrap_or_default(),
        boot_time_seconds: System::boot_time(),
        time_seconds,
    }
}

#[cfg(all(test, target_os = "linux"))]
mod tests {
    use super::*;

    #[test]
    fn capture_reports_cpus_memory_and_clock() {
        let host = HostSnapshot::capture();

        assert!(!host.cpus.is_empty());
        assert!(host.memory.total > 0);
        assert!(host.load.is_some());
        assert!(host.system.boot_time_seconds > 0);
        assert!(host.system.time_seconds > host.system.boot_time_seconds as f64);
    }

    #[test]
    fn capture_keeps_interfaces_and_mounts_sorted() {
        let host = HostSnapshot::capture();

        let names: Vec<&str> = host.interfaces.iter().map(|i| i.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);

        let mounts: Vec<&str> = host
            .filesystems
            .iter()
            .map(|f| f.mount_point.as_str())
            .collect();
        let mut unique = mounts.clone();
        unique.dedup();
        assert_eq!(mounts, unique);
    }
}
