mod error;
mod money;
mod operations;
mod types;

pub use error::RecordError;
pub use money::Money;
pub use operations::{validate_record, MAX_DELIVERIES_PER_CARRIER};
pub use types::{DailyRecord, ProfessionalService};
