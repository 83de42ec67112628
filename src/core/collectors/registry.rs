use std::{collections::BTreeMap, time::Instant};

use prometheus::{GaugeVec, Opts, Registry};
use tracing::{debug, warn};

use super::{
    error::CollectorError, host::HostSnapshot, traits::MetricProducer, types::CollectorResult,
};
use crate::core::exposition::MetricFamily;

/// Family reporting how long each producer took.
pub const SCRAPE_DURATION_FAMILY: &str = "node_scrape_collector_duration_seconds";
/// Family reporting whether each producer succeeded (1) or failed (0).
pub const SCRAPE_SUCCESS_FAMILY: &str = "node_scrape_collector_success";

/// Metadata for a single producer that will be submitted to the global inventory.
/// Each producer provides a name and a factory function that builds a fresh instance.
pub struct CollectorMeta {
    pub name: &'static str,
    pub factory: fn() -> Box<dyn MetricProducer>,
}

// Tell the `inventory` crate to collect all submitted `CollectorMeta` values.
inventory::collect!(CollectorMeta);

/// A set of named producers that gather together.
///
/// A registry is built fresh for every gather and thrown away afterwards, so
/// no producer state survives from one tick to the next. Producers are kept
/// ordered by name, which keeps log output and scrape families stable.
pub struct CollectorRegistry {
    collectors: BTreeMap<&'static str, Box<dyn MetricProducer>>,
}

impl CollectorRegistry {
    /// Creates a registry with no producers.
    pub fn new() -> Self {
        Self {
            collectors: BTreeMap::new(),
        }
    }

    /// Instantiates producers submitted via the `inventory` crate.
    ///
    /// With `enabled == None` every available producer is used; otherwise only
    /// the named ones are.
    ///
    /// # Errors
    ///
    /// `CollectorNotFound` for a name that was never submitted and
    /// `DuplicateCollector` if two submissions share a name.
    pub fn from_inventory(enabled: Option<&[String]>) -> CollectorResult<Self> {
        if let Some(names) = enabled {
            if let Some(missing) = names.iter().find(|n| !Self::is_available(n)) {
                return Err(CollectorError::CollectorNotFound(missing.clone()));
            }
        }

        let mut registry = Self::new();
        for meta in inventory::iter::<CollectorMeta> {
            let wanted = enabled.map_or(true, |names| names.iter().any(|n| n == meta.name));
            if wanted {
                registry.register(meta.name, (meta.factory)())?;
            }
        }
        Ok(registry)
    }

    /// Adds a producer under `name`.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateCollector` if the name is already taken.
    pub fn register(
        &mut self,
        name: &'static str,
        producer: Box<dyn MetricProducer>,
    ) -> CollectorResult<()> {
        if self.collectors.contains_key(name) {
            return Err(CollectorError::DuplicateCollector(name.to_string()));
        }
        self.collectors.insert(name, producer);
        Ok(())
    }

    /// Names of all producers compiled into this binary, sorted.
    pub fn available() -> Vec<&'static str> {
        let mut names: Vec<&'static str> = inventory::iter::<CollectorMeta>
            .into_iter()
            .map(|meta| meta.name)
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Checks whether a producer with the given name was compiled in.
    pub fn is_available(name: &str) -> bool {
        inventory::iter::<CollectorMeta>
            .into_iter()
            .any(|meta| meta.name == name)
    }

    /// Returns the names of the producers in this registry, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        self.collectors.keys().copied().collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.collectors.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.collectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collectors.is_empty()
    }

    /// Runs every producer against `host` and merges their families.
    ///
    /// Each producer registers into its own fresh `prometheus::Registry`,
    /// which is gathered only if the producer succeeded. A failing producer
    /// is logged and reported through the scrape-success family; it does not
    /// fail the gather. The returned families are sorted by name.
    ///
    /// # Errors
    ///
    /// `DuplicateFamily` when two producers (or a producer and the scrape
    /// families) emit the same family name.
    pub fn gather(&self, host: &HostSnapshot) -> CollectorResult<Vec<MetricFamily>> {
        let mut families: BTreeMap<String, (&'static str, MetricFamily)> = BTreeMap::new();
        let durations = GaugeVec::new(
            Opts::new(
                SCRAPE_DURATION_FAMILY,
                "relaybee: Duration of a collector scrape.",
            ),
            &["collector"],
        )?;
        let successes = GaugeVec::new(
            Opts::new(
                SCRAPE_SUCCESS_FAMILY,
                "relaybee: Whether a collector succeeded.",
            ),
            &["collector"],
        )?;

        for (&name, producer) in &self.collectors {
            let start = Instant::now();
            let registry = Registry::new();
            let result = producer.produce(host, &registry);
            let elapsed = start.elapsed().as_secs_f64();

            let success = match result {
                Ok(()) => {
                    let produced = registry.gather();
                    debug!("Collector '{}' produced {} families", name, produced.len());
                    for family in produced {
                        insert_family(&mut families, name, family)?;
                    }
                    1.0
                }
                Err(e) => {
                    warn!("Collector '{}' failed: {}", name, e);
                    0.0
                }
            };

            durations.with_label_values(&[name]).set(elapsed);
            successes.with_label_values(&[name]).set(success);
        }

        let scrape = Registry::new();
        scrape.register(Box::new(durations))?;
        scrape.register(Box::new(successes))?;
        for family in scrape.gather() {
            insert_family(&mut families, "scrape", family)?;
        }

        Ok(families.into_values().map(|(_, family)| family).collect())
    }
}

fn insert_family(
    families: &mut BTreeMap<String, (&'static str, MetricFamily)>,
    owner: &'static str,
    family: MetricFamily,
) -> CollectorResult<()> {
    if let Some((first, _)) = families.get(family.get_name()) {
        return Err(CollectorError::DuplicateFamily {
            family: family.get_name().to_string(),
            first: first.to_string(),
            second: owner.to_string(),
        });
    }
    families.insert(family.get_name().to_string(), (owner, family));
    Ok(())
}

impl Default for CollectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Macro used by producer implementations to register themselves
/// with the global inventory at compile time.
#[macro_export]
macro_rules! register_collector {
    ($collector_type:ty, $name:expr) => {
        inventory::submit! {
            $crate::core::collectors::registry::CollectorMeta {
                name: $name,
                factory: || {
                    Box::new(<$collector_type>::default())
                        as Box<dyn $crate::core::collectors::traits::MetricProducer>
                },
            }
        }
    };
}
