use prometheus::{Gauge, GaugeVec, Opts, Registry};

use super::{host::HostSnapshot, traits::MetricProducer, types::CollectorResult};
use crate::register_collector;

/// Boot time, wall clock and kernel identification.
#[derive(Debug, Clone, Default)]
pub struct SystemCollector;

impl SystemCollector {
    pub fn new() -> Self {
        SystemCollector
    }
}

impl MetricProducer for SystemCollector {
    fn produce(&self, host: &HostSnapshot, registry: &Registry) -> CollectorResult<()> {
        let sys = &host.system;

        if sys.boot_time_seconds > 0 {
            let boot_time = Gauge::new("node_boot_time_seconds", "Node boot time, in unixtime.")?;
            boot_time.set(sys.boot_time_seconds as f64);
            registry.register(Box::new(boot_time))?;
        }

        let time = Gauge::new(
            "node_time_seconds",
            "System time in seconds since epoch (1970).",
        )?;
        time.set(sys.time_seconds);
        registry.register(Box::new(time))?;

        let uname = GaugeVec::new(
            Opts::new(
                "node_uname_info",
                "Labeled system information as provided by the uname system call.",
            ),
            &["sysname", "release", "version", "nodename"],
        )?;
        uname
            .with_label_values(&[
                sys.sysname.as_str(),
                sys.release.as_str(),
                sys.version.as_str(),
                sys.nodename.as_str(),
            ])
            .set(1.0);
        registry.register(Box::new(uname))?;

        Ok(())
    }
}

register_collector!(SystemCollector, "system");
