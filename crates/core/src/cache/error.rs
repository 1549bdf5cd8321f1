use thiserror::Error;

use super::SerializationError;

/// Errors that can occur during cache operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache operation failed: {0}")]
    OperationFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<SerializationError> for CacheError {
    fn from(err: SerializationError) -> Self {
        CacheError::Serialization(err.to_string())
    }
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_failed_display() {
        let error = CacheError::OperationFailed("lock poisoned".to_string());
        assert_eq!(error.to_string(), "Cache operation failed: lock poisoned");
    }

    #[test]
    fn test_serialization_display() {
        let error = CacheError::Serialization("invalid JSON".to_string());
        assert_eq!(error.to_string(), "Serialization error: invalid JSON");
    }

    #[test]
    fn test_from_serialization_error() {
        let error = CacheError::from(SerializationError::DeserializeFailed("eof".to_string()));
        assert_eq!(
            error,
            CacheError::Serialization("Failed to deserialize: eof".to_string())
        );
    }
}
