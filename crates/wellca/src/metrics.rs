//! Periodic cache statistics reporting.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use wellca_core::cache::{Cache, CacheStats, TelemetryError, TelemetrySink};

/// Emits cache statistics as structured `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

#[async_trait]
impl TelemetrySink for TracingSink {
    async fn emit(&self, cache: &str, stats: &CacheStats) -> Result<(), TelemetryError> {
        tracing::info!(
            cache,
            hits = stats.hits,
            misses = stats.misses,
            evictions = stats.evictions,
            size = stats.size,
            "Cache statistics"
        );
        Ok(())
    }
}

/// Samples every named cache on a fixed interval and forwards the counters
/// to a telemetry sink. Only reads statistics; never touches cache entries.
pub struct MetricsReporter<C, S> {
    cache: Arc<C>,
    sink: Arc<S>,
    interval: Duration,
}

impl<C, S> MetricsReporter<C, S>
where
    C: Cache + 'static,
    S: TelemetrySink + 'static,
{
    pub fn new(cache: Arc<C>, sink: Arc<S>, interval: Duration) -> Self {
        Self {
            cache,
            sink,
            interval,
        }
    }

    /// Emits statistics for every cache once. Returns how many caches were
    /// emitted; a failure on one cache is logged and the rest still run.
    pub async fn report_once(&self) -> usize {
        let mut emitted = 0;

        for name in self.cache.names().await {
            let stats = match self.cache.stats(&name).await {
                Ok(stats) => stats,
                Err(err) => {
                    tracing::warn!(cache = %name, error = %err, "Failed to read cache statistics");
                    continue;
                }
            };

            match self.sink.emit(&name, &stats).await {
                Ok(()) => emitted += 1,
                Err(err) => {
                    tracing::warn!(cache = %name, error = %err, "Failed to emit cache statistics")
                }
            }
        }

        emitted
    }

    /// Runs the reporter on a background task until `shutdown` fires, then
    /// emits one final round.
    pub fn spawn(self, mut shutdown: broadcast::Receiver<()>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            ticker.tick().await;

            tracing::debug!(
                interval_secs = self.interval.as_secs(),
                "Metrics reporter started"
            );

            loop {
                tokio::select! {
                    _ = shutdown.recv() => {
                        tracing::debug!("Metrics reporter received shutdown signal");
                        self.report_once().await;
                        break;
                    }
                    _ = ticker.tick() => {
                        self.report_once().await;
                    }
                }
            }
        })
    }
}
