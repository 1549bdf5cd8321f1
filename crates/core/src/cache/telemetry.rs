use async_trait::async_trait;
use thiserror::Error;

use super::CacheStats;

/// Errors raised by a telemetry sink.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    #[error("Failed to emit metrics for cache '{cache}': {reason}")]
    EmitFailed { cache: String, reason: String },
}

/// Destination for periodic cache statistics.
#[async_trait]
pub trait TelemetrySink: Send + Sync {
    /// Emits the statistics of one named cache.
    async fn emit(&self, cache: &str, stats: &CacheStats) -> Result<(), TelemetryError>;
}
