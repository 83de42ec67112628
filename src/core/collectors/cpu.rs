use prometheus::{GaugeVec, Opts, Registry};

use super::{host::HostSnapshot, traits::MetricProducer, types::CollectorResult};
use crate::register_collector;

/// Per-core CPU usage and clock frequency.
#[derive(Debug, Clone, Default)]
pub struct CpuCollector;

impl CpuCollector {
    pub fn new() -> Self {
        CpuCollector
    }
}

impl MetricProducer for CpuCollector {
    fn produce(&self, host: &HostSnapshot, registry: &Registry) -> CollectorResult<()> {
        let usage = GaugeVec::new(
            Opts::new(
                "node_cpu_usage_ratio",
                "Fraction of time the CPU was busy during the sampling window.",
            ),
            &["cpu"],
        )?;
        let frequency = GaugeVec::new(
            Opts::new(
                "node_cpu_frequency_hertz",
                "Current CPU clock frequency in hertz.",
            ),
            &["cpu"],
        )?;

        for (index, cpu) in host.cpus.iter().enumerate() {
            let label = index.to_string();
            // sysinfo reports 0-100; exporters use 0-1 ratios
            let ratio = f64::from(cpu.usage_percent) / 100.0;
            usage.with_label_values(&[label.as_str()]).set(ratio);
            frequency
                .with_label_values(&[label.as_str()])
                .set(cpu.frequency_mhz as f64 * 1_000_000.0);
        }

        registry.register(Box::new(usage))?;
        registry.register(Box::new(frequency))?;
        Ok(())
    }
}

register_collector!(CpuCollector, "cpu");
