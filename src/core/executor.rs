//! Periodic collect-and-forward loop.
//!
//! The `Executor` drives one cycle per tick: take a snapshot through the
//! [`Collector`], hand the payload to the [`Forwarder`], log the outcome.
//! The first tick fires immediately; later ticks follow the configured
//! interval on a monotonic clock. A cycle that overruns delays the next tick
//! instead of causing a burst. The loop never returns.

use std::{sync::Arc, time::Duration};

use bytes::Bytes;
use relaybee_hook::{DeliveryError, DeliveryOutcome, HookClient, StatusCode};
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{error, info, info_span, Instrument, Span};

use super::{collector::Collector, collectors::CollectorError, status::SchedulerStatus};

/// Sink for encoded payloads.
#[async_trait::async_trait]
pub trait Forwarder: Send + Sync {
    /// Delivers one payload. Never retries.
    async fn send(&self, payload: Bytes) -> DeliveryOutcome;
}

#[async_trait::async_trait]
impl Forwarder for HookClient {
    async fn send(&self, payload: Bytes) -> DeliveryOutcome {
        HookClient::send(self, payload).await
    }
}

/// What happened during one cycle.
#[derive(Debug)]
pub enum TickOutcome {
    Delivered {
        status: StatusCode,
        bytes: usize,
        families: usize,
    },
    /// Gathering failed; nothing was sent.
    CollectionFailed(CollectorError),
    DeliveryFailed(DeliveryError),
}

impl TickOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, TickOutcome::Delivered { .. })
    }
}

/// Executor that owns the scheduling loop.
pub struct Executor {
    collector: Collector,
    forwarder: Arc<dyn Forwarder>,
    interval: Duration,
    status: SchedulerStatus,
    span: Span,
}

impl Executor {
    /// Creates a new Executor instance.
    ///
    /// # Arguments
    /// * `collector` - Produces one encoded snapshot per tick
    /// * `forwarder` - Receives every snapshot payload
    /// * `interval` - Period between ticks
    /// * `status` - State tracker updated around each cycle
    pub fn new(
        collector: Collector,
        forwarder: Arc<dyn Forwarder>,
        interval: Duration,
        status: SchedulerStatus,
    ) -> Self {
        Self::with_span(collector, forwarder, interval, status, Span::current())
    }

    /// Like [`Executor::new`], recording events inside `span`.
    pub fn with_span(
        collector: Collector,
        forwarder: Arc<dyn Forwarder>,
        interval: Duration,
        status: SchedulerStatus,
        span: Span,
    ) -> Self {
        Self {
            collector,
            forwarder,
            interval,
            status,
            span,
        }
    }

    pub fn status(&self) -> &SchedulerStatus {
        &self.status
    }

    /// Runs the executor loop indefinitely.
    pub async fn run(self) -> ! {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        self.span.in_scope(|| {
            info!(
                "Metrics forwarding started (interval: {}s)",
                self.interval.as_secs_f64()
            )
        });

        let mut tick: u64 = 0;
        loop {
            ticker.tick().await;
            tick += 1;
            self.run_cycle(tick).await;
        }
    }

    /// Runs a single collect-and-forward cycle.
    ///
    /// The scheduler state is `Running` for the duration of the call and
    /// `Idle` afterwards, whatever the outcome.
    pub async fn run_cycle(&self, tick: u64) -> TickOutcome {
        self.status.enter_running(tick);
        let span = info_span!(parent: &self.span, "tick", tick);
        let outcome = self.cycle().instrument(span).await;
        self.status.enter_idle();
        outcome
    }

    async fn cycle(&self) -> TickOutcome {
        let start = Instant::now();

        let snapshot = match self.collector.snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!("Collection failed, skipping tick: {}", e);
                return TickOutcome::CollectionFailed(e);
            }
        };

        match self.forwarder.send(snapshot.payload.clone()).await {
            Ok(delivery) => {
                info!(
                    "Delivered {} bytes ({} families, {} skipped), status {} in {:?}",
                    delivery.bytes,
                    snapshot.encoded,
                    snapshot.skipped,
                    delivery.status.as_u16(),
                    start.elapsed()
                );
                TickOutcome::Delivered {
                    status: delivery.status,
                    bytes: delivery.bytes,
                    families: snapshot.encoded,
                }
            }
            Err(e) => {
                error!("Delivery failed ({}): {}", e.kind(), e);
                TickOutcome::DeliveryFailed(e)
            }
        }
    }
}
