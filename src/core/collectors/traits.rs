use prometheus::Registry;

use super::{host::HostSnapshot, types::CollectorResult};

/// A core trait that every metric producer must implement.
///
/// A producer turns one [`HostSnapshot`] into `prometheus` metrics and
/// registers them into a registry that lives for a single gather. The
/// snapshot is captured once per gather and shared by all producers, so
/// producers do no I/O of their own and are plain, synchronous functions of
/// their input.
///
/// The trait is marked with `'static` so that factories can be stored in the
/// `inventory` registry without lifetime complications.
pub trait MetricProducer: Send + Sync + 'static {
    /// Registers this producer's metrics, set from the snapshot.
    ///
    /// Families left without samples are pruned when the registry is
    /// gathered. A returned error marks the producer as failed for this
    /// gather and discards whatever it registered; the other producers are
    /// unaffected.
    fn produce(&self, host: &HostSnapshot, registry: &Registry) -> CollectorResult<()>;
}
