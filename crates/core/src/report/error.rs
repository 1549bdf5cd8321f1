use thiserror::Error;

use crate::cache::CacheError;
use crate::record::RecordError;
use crate::storage::{DateRangeError, RepositoryError};

/// Errors returned by report and write operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// End before start, or a page outside the available pages.
    #[error("Invalid range: {0}")]
    InvalidRange(String),
    /// A month or quarter that does not exist.
    #[error("Invalid bucket: {0}")]
    InvalidBucket(String),
    #[error("Invalid record: {0}")]
    InvalidRecord(#[from] RecordError),
    #[error("Store failure: {0}")]
    Store(#[from] RepositoryError),
    #[error("Cache failure: {0}")]
    Cache(#[from] CacheError),
}

impl From<DateRangeError> for ReportError {
    fn from(err: DateRangeError) -> Self {
        match err {
            DateRangeError::InvalidRange => ReportError::InvalidRange(err.to_string()),
            DateRangeError::InvalidMonth { .. } | DateRangeError::InvalidQuarter(_) => {
                ReportError::InvalidBucket(err.to_string())
            }
        }
    }
}

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;
