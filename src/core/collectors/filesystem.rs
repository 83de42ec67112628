use prometheus::{GaugeVec, Opts, Registry};

use super::{host::HostSnapshot, traits::MetricProducer, types::CollectorResult};
use crate::register_collector;

const LABELS: [&str; 3] = ["device", "fstype", "mountpoint"];

/// Capacity of every mounted filesystem.
///
/// Each mount point becomes one sample per family, labelled with the backing
/// device, filesystem type and mount point.
#[derive(Debug, Clone, Default)]
pub struct FilesystemCollector;

impl FilesystemCollector {
    pub fn new() -> Self {
        FilesystemCollector
    }
}

impl MetricProducer for FilesystemCollector {
    fn produce(&self, host: &HostSnapshot, registry: &Registry) -> CollectorResult<()> {
        let size = GaugeVec::new(
            Opts::new("node_filesystem_size_bytes", "Filesystem size in bytes."),
            &LABELS,
        )?;
        let avail = GaugeVec::new(
            Opts::new(
                "node_filesystem_avail_bytes",
                "Filesystem space available to non-root users in bytes.",
            ),
            &LABELS,
        )?;

        for fs in &host.filesystems {
            let labels = [
                fs.device.as_str(),
                fs.fs_type.as_str(),
                fs.mount_point.as_str(),
            ];
            size.with_label_values(&labels).set(fs.size_bytes as f64);
            avail.with_label_values(&labels).set(fs.avail_bytes as f64);
        }

        registry.register(Box::new(size))?;
        registry.register(Box::new(avail))?;
        Ok(())
    }
}

register_collector!(FilesystemCollector, "filesystem");
