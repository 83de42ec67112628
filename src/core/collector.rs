//! One collection pass: gather families from the metrics source and encode
//! them into a single exposition payload.

use std::{sync::Arc, time::Instant};

use bytes::Bytes;
use tracing::{debug, warn, Instrument, Span};

use super::{
    collectors::{CollectorResult, MetricsSource},
    exposition::{encode_into, MetricFamily},
};

/// Encoded payload of one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Text exposition 0.0.4 body, ready to send.
    pub payload: Bytes,
    /// Families written into `payload`.
    pub encoded: usize,
    /// Families dropped because they failed to encode.
    pub skipped: usize,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// Turns the current state of the host into a [`Snapshot`].
pub struct Collector {
    source: Arc<dyn MetricsSource>,
    span: Span,
}

impl Collector {
    pub fn new(source: Arc<dyn MetricsSource>) -> Self {
        Self::with_span(source, Span::current())
    }

    /// Creates a collector whose events are recorded inside `span`.
    pub fn with_span(source: Arc<dyn MetricsSource>, span: Span) -> Self {
        Self { source, span }
    }

    pub fn platform(&self) -> &'static str {
        self.source.platform()
    }

    /// Gathers and encodes every family.
    ///
    /// A family that fails to encode is logged and left out; the others
    /// still make it into the payload.
    ///
    /// # Errors
    ///
    /// Returns the source's `CollectorError` when gathering fails. No payload
    /// is produced in that case.
    pub async fn snapshot(&self) -> CollectorResult<Snapshot> {
        async {
            let start = Instant::now();
            let families = self.source.gather().await?;
            let snapshot = encode_families(&families);
            debug!(
                "Collected {} families ({} skipped, {} bytes) in {:?}",
                snapshot.encoded,
                snapshot.skipped,
                snapshot.len(),
                start.elapsed()
            );
            Ok(snapshot)
        }
        .instrument(self.span.clone())
        .await
    }
}

/// Encodes families in order, skipping those that fail.
pub fn encode_families(families: &[MetricFamily]) -> Snapshot {
    let mut buf = Vec::with_capacity(families.len() * 256);
    let mut encoded = 0;
    let mut skipped = 0;

    for family in families {
        match encode_into(family, &mut buf) {
            Ok(()) => encoded += 1,
            Err(e) => {
                warn!("Skipping metric family '{}': {}", e.family(), e);
                skipped += 1;
            }
        }
    }

    Snapshot {
        payload: Bytes::from(buf),
        encoded,
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use tracing_test::traced_test;

    use super::*;
    use crate::core::{
        collectors::CollectorError,
        exposition::{testing::gauge, MetricType},
    };

    struct StaticSource(Vec<MetricFamily>);

    #[async_trait]
    impl MetricsSource for StaticSource {
        fn platform(&self) -> &'static str {
            "test"
        }

        async fn gather(&self) -> CollectorResult<Vec<MetricFamily>> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl MetricsSource for FailingSource {
        fn platform(&self) -> &'static str {
            "test"
        }

        async fn gather(&self) -> CollectorResult<Vec<MetricFamily>> {
            Err(CollectorError::UnsupportedPlatform("plan9".to_string()))
        }
    }

    #[tokio::test]
    async fn test_up_gauge_payload() {
        let collector = Collector::new(Arc::new(StaticSource(vec![gauge("up", 1.0)])));
        let snapshot = collector.snapshot().await.unwrap();

        let text = std::str::from_utf8(&snapshot.payload).unwrap();
        assert!(text.contains("# TYPE up gauge\n"));
        assert!(text.contains("up 1\n"));
        assert_eq!(snapshot.encoded, 1);
        assert_eq!(snapshot.skipped, 0);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_one_bad_family_is_skipped() {
        // A family without metrics is rejected by the text encoder.
        let mut broken = MetricFamily::default();
        broken.set_name("broken_total".to_string());
        broken.set_field_type(MetricType::COUNTER);

        let families = vec![gauge("a_total", 1.0), broken, gauge("c_total", 3.0)];
        let total = families.len();

        let collector = Collector::new(Arc::new(StaticSource(families)));
        let snapshot = collector.snapshot().await.unwrap();

        assert_eq!(snapshot.encoded, total - 1);
        assert_eq!(snapshot.skipped, 1);

        let text = std::str::from_utf8(&snapshot.payload).unwrap();
        assert!(text.contains("a_total 1\n"));
        assert!(text.contains("c_total 3\n"));
        assert!(!text.contains("broken_total"));
        assert!(logs_contain("Skipping metric family 'broken_total'"));
    }

    #[tokio::test]
    async fn test_families_keep_source_order() {
        let snapshot = encode_families(&[gauge("b", 1.0), gauge("a", 2.0)]);
        let text = std::str::from_utf8(&snapshot.payload).unwrap();

        assert_eq!(
            text,
            "# HELP b b value.\n# TYPE b gauge\nb 1\n# HELP a a value.\n# TYPE a gauge\na 2\n"
        );
    }

    #[tokio::test]
    async fn test_gather_failure_produces_no_snapshot() {
        let collector = Collector::new(Arc::new(FailingSource));
        let err = collector.snapshot().await.unwrap_err();
        assert!(matches!(err, CollectorError::UnsupportedPlatform(ref os) if os == "plan9"));
    }

    #[test]
    fn test_empty_gather_is_empty_payload() {
        let snapshot = encode_families(&[]);
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.encoded, 0);
    }
}
