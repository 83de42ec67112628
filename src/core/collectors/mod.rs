/// CPU usage and frequency producer.
pub mod cpu;

/// Error types shared by the metrics source and all producers.
pub mod error;

/// Mounted filesystem capacity producer.
pub mod filesystem;

/// Point-in-time host statistics read by every producer.
pub mod host;

/// 1, 5 and 15 minute load average producer (unix only).
pub mod loadavg;

/// Physical memory and swap producer.
pub mod memory;

/// Network interface traffic producer.
pub mod network;

/// Producer registry and gather orchestration.
pub mod registry;

/// Platform-selected metrics source.
pub mod source;

/// Boot time, clock and uname producer.
pub mod system;

/// Core trait implemented by every producer.
pub mod traits;

/// Common result type.
pub mod types;

// ----------------------------------------------------------------------------
// Re-exports for public API
// ----------------------------------------------------------------------------

pub use cpu::CpuCollector;
pub use error::CollectorError;
pub use filesystem::FilesystemCollector;
pub use host::HostSnapshot;
pub use loadavg::LoadAverageCollector;
pub use memory::MemoryCollector;
pub use network::NetworkCollector;
pub use registry::CollectorRegistry;
pub use source::{platform_source, HostSource, MetricsSource, UnsupportedSource};
pub use system::SystemCollector;
pub use traits::MetricProducer;
pub use types::CollectorResult;
