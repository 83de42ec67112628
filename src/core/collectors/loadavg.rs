use prometheus::{Gauge, Registry};

use super::{
    error::CollectorError, host::HostSnapshot, traits::MetricProducer, types::CollectorResult,
};
use crate::register_collector;

/// System load average over 1, 5 and 15 minutes.
///
/// Only registered on unix targets; other systems have no load average.
#[derive(Debug, Clone, Default)]
pub struct LoadAverageCollector;

impl LoadAverageCollector {
    pub fn new() -> Self {
        LoadAverageCollector
    }
}

impl MetricProducer for LoadAverageCollector {
    fn produce(&self, host: &HostSnapshot, registry: &Registry) -> CollectorResult<()> {
        let load = host
            .load
            .ok_or_else(|| CollectorError::probe("loadavg", "load average not reported"))?;

        for (name, help, value) in [
            ("node_load1", "1m load average.", load.one),
            ("node_load5", "5m load average.", load.five),
            ("node_load15", "15m load average.", load.fifteen),
        ] {
            let gauge = Gauge::new(name, help)?;
            gauge.set(value);
            registry.register(Box::new(gauge))?;
        }
        Ok(())
    }
}

#[cfg(unix)]
register_collector!(LoadAverageCollector, "loadavg");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{collectors::host::LoadStat, exposition::testing::value};

    #[test]
    fn test_load_families() {
        let host = HostSnapshot {
            load: Some(LoadStat {
                one: 0.5,
                five: 1.25,
                fifteen: 2.0,
            }),
            ..Default::default()
        };

        let registry = Registry::new();
        LoadAverageCollector::new()
            .produce(&host, &registry)
            .unwrap();
        let values: Vec<(String, f64)> = registry
            .gather()
            .iter()
            .map(|f| (f.get_name().to_string(), value(f, 0)))
            .collect();

        assert_eq!(
            values,
            vec![
                ("node_load1".to_string(), 0.5),
                ("node_load15".to_string(), 2.0),
                ("node_load5".to_string(), 1.25),
            ]
        );
    }

    #[test]
    fn test_missing_load_is_a_probe_failure() {
        let err = LoadAverageCollector::new()
            .produce(&HostSnapshot::default(), &Registry::new())
            .unwrap_err();
        assert!(err.to_string().contains("load average not reported"));
    }
}
