use prometheus::{IntCounterVec, Opts, Registry};

use super::{
    host::{HostSnapshot, InterfaceStat},
    traits::MetricProducer,
    types::CollectorResult,
};
use crate::register_collector;

/// Counter families emitted per interface: (name, help, accessor).
const COUNTERS: [(&str, &str, fn(&InterfaceStat) -> u64); 6] = [
    (
        "node_network_receive_bytes_total",
        "Network device statistic receive_bytes.",
        |i| i.rx_bytes,
    ),
    (
        "node_network_transmit_bytes_total",
        "Network device statistic transmit_bytes.",
        |i| i.tx_bytes,
    ),
    (
        "node_network_receive_packets_total",
        "Network device statistic receive_packets.",
        |i| i.rx_packets,
    ),
    (
        "node_network_transmit_packets_total",
        "Network device statistic transmit_packets.",
        |i| i.tx_packets,
    ),
    (
        "node_network_receive_errs_total",
        "Network device statistic receive_errs.",
        |i| i.rx_errors,
    ),
    (
        "node_network_transmit_errs_total",
        "Network device statistic transmit_errs.",
        |i| i.tx_errors,
    ),
];

/// Cumulative traffic counters for every network interface.
///
/// The counters are rebuilt every gather, so each one starts at zero and is
/// raised straight to the total the kernel reports.
#[derive(Debug, Clone, Default)]
pub struct NetworkCollector;

impl NetworkCollector {
    pub fn new() -> Self {
        NetworkCollector
    }
}

impl MetricProducer for NetworkCollector {
    fn produce(&self, host: &HostSnapshot, registry: &Registry) -> CollectorResult<()> {
        for (name, help, read) in COUNTERS {
            let counter = IntCounterVec::new(Opts::new(name, help), &["device"])?;
            for iface in &host.interfaces {
                counter
                    .with_label_values(&[iface.name.as_str()])
                    .inc_by(read(iface));
            }
            registry.register(Box::new(counter))?;
        }
        Ok(())
    }
}

register_collector!(NetworkCollector, "network");
