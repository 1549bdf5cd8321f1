mod error;
mod traits;
mod types;

pub use error::{DateRangeError, RepositoryError, Result};
pub use traits::RecordRepository;
pub use types::{BucketKey, BucketTotals, DateRange, Totals};
