use prometheus::{Gauge, Registry};

use super::{
    error::CollectorError, host::HostSnapshot, traits::MetricProducer, types::CollectorResult,
};
use crate::register_collector;

/// Physical memory and swap usage.
#[derive(Debug, Clone, Default)]
pub struct MemoryCollector;

impl MemoryCollector {
    pub fn new() -> Self {
        MemoryCollector
    }
}

impl MetricProducer for MemoryCollector {
    fn produce(&self, host: &HostSnapshot, registry: &Registry) -> CollectorResult<()> {
        let mem = &host.memory;
        // Every real host has memory; zero means the probe returned nothing.
        if mem.total == 0 {
            return Err(CollectorError::probe("memory", "total memory reported as 0"));
        }

        let gauges = [
            (
                "node_memory_total_bytes",
                "Total physical memory in bytes.",
                mem.total,
            ),
            (
                "node_memory_available_bytes",
                "Memory available for new allocations without swapping, in bytes.",
                mem.available,
            ),
            ("node_memory_used_bytes", "Memory in use, in bytes.", mem.used),
            ("node_memory_free_bytes", "Unused memory in bytes.", mem.free),
            (
                "node_memory_swap_total_bytes",
                "Total swap space in bytes.",
                mem.swap_total,
            ),
            (
                "node_memory_swap_used_bytes",
                "Swap space in use, in bytes.",
                mem.swap_used,
            ),
            (
                "node_memory_swap_free_bytes",
                "Unused swap space in bytes.",
                mem.swap_free,
            ),
        ];

        for (name, help, bytes) in gauges {
            let gauge = Gauge::new(name, help)?;
            gauge.set(bytes as f64);
            registry.register(Box::new(gauge))?;
        }
        Ok(())
    }
}

register_collector!(MemoryCollector, "memory");
