mod error;
mod keys;
mod policy;
mod serialization;
mod telemetry;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{
    monthly_chart_key, monthly_service_stats_key, quarterly_chart_key, record_key,
    record_range_key, service_details_key, weekly_chart_key,
};
pub use policy::{
    CachePolicy, ExpiryMode, PolicyTable, ALL_USER_PRODUCTIVITY, CHART_DATA, DERIVED_CACHES,
    OVERALL_PRODUCTIVITY, RECORD_BY_DATE, RECORD_RANGE, SERVICE_DETAILS, USER_PRODUCTIVITY,
};
pub use serialization::{deserialize_value, serialize_value, SerializationError};
pub use telemetry::{TelemetryError, TelemetrySink};
pub use traits::{Cache, CacheStats};
