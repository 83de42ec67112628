//! Prometheus text exposition (format 0.0.4) for single metric families.
//!
//! Families are the `prometheus` crate's protobuf model, as returned by a
//! [`prometheus::Registry`] gather. [`encode`] renders exactly one family
//! with [`TextEncoder`], so a caller can drop a family that fails and keep
//! the rest. Encoding is a pure function of the family: the same family
//! always produces the same bytes.

use prometheus::{Encoder, TextEncoder};
use thiserror::Error;

pub use prometheus::proto::{MetricFamily, MetricType};

/// Reasons a family cannot be encoded.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The text encoder has no representation for untyped families.
    #[error("Metric family '{0}' is untyped")]
    Untyped(String),

    #[error("Failed to encode metric family '{family}': {source}")]
    Encoder {
        family: String,
        #[source]
        source: prometheus::Error,
    },
}

impl EncodeError {
    /// Name of the family that failed to encode.
    pub fn family(&self) -> &str {
        match self {
            EncodeError::Untyped(family) | EncodeError::Encoder { family, .. } => family,
        }
    }
}

/// Encodes one family into its text exposition form.
///
/// # Errors
///
/// Returns `EncodeError` for an untyped family or one the encoder rejects
/// (no name, no metrics).
pub fn encode(family: &MetricFamily) -> Result<Vec<u8>, EncodeError> {
    if family.get_field_type() == MetricType::UNTYPED {
        return Err(EncodeError::Untyped(family.get_name().to_string()));
    }

    let mut buf = Vec::with_capacity(64 + family.get_metric().len() * 48);
    TextEncoder::new()
        .encode(std::slice::from_ref(family), &mut buf)
        .map_err(|source| EncodeError::Encoder {
            family: family.get_name().to_string(),
            source,
        })?;
    Ok(buf)
}

/// Appends the text form of `family` to `out`.
///
/// `out` is left untouched when an error is returned.
pub fn encode_into(family: &MetricFamily, out: &mut Vec<u8>) -> Result<(), EncodeError> {
    out.extend_from_slice(&encode(family)?);
    Ok(())
}

/// Shared helpers for tests that build or inspect families.
#[cfg(test)]
pub(crate) mod testing {
    use prometheus::{core::Collector, Gauge};

    use super::{MetricFamily, MetricType};

    /// A single unlabelled gauge family.
    pub(crate) fn gauge(name: &str, value: f64) -> MetricFamily {
        let gauge = Gauge::new(name, format!("{name} value.")).expect("valid gauge");
        gauge.set(value);
        gauge.collect().remove(0)
    }

    pub(crate) fn find<'a>(families: &'a [MetricFamily], name: &str) -> &'a MetricFamily {
        families
            .iter()
            .find(|f| f.get_name() == name)
            .unwrap_or_else(|| panic!("family {name} not gathered"))
    }

    /// Value of the `index`-th metric of a gauge or counter family.
    pub(crate) fn value(family: &MetricFamily, index: usize) -> f64 {
        let metric = &family.get_metric()[index];
        match family.get_field_type() {
            MetricType::COUNTER => metric.get_counter().get_value(),
            MetricType::GAUGE => metric.get_gauge().get_value(),
            other => panic!("{other:?} family has no single value"),
        }
    }

    pub(crate) fn label<'a>(family: &'a MetricFamily, index: usize, name: &str) -> Option<&'a str> {
        family.get_metric()[index]
            .get_label()
            .iter()
            .find(|l| l.get_name() == name)
            .map(|l| l.get_value())
    }
}
