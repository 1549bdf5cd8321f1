use thiserror::Error;

/// Errors that can occur when validating a daily record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Number of {carrier} deliveries cannot exceed {max}")]
    TooManyDeliveries { carrier: &'static str, max: u32 },
    #[error("Active percentage must be between 0 and 100")]
    InvalidPercentage,
    #[error("Service type cannot be empty")]
    EmptyServiceType,
    #[error("Invalid currency amount: {0}")]
    InvalidAmount(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_error_display() {
        assert_eq!(
            RecordError::TooManyDeliveries {
                carrier: "FedEx",
                max: 9999
            }
            .to_string(),
            "Number of FedEx deliveries cannot exceed 9999"
        );
        assert_eq!(
            RecordError::InvalidPercentage.to_string(),
            "Active percentage must be between 0 and 100"
        );
        assert_eq!(
            RecordError::EmptyServiceType.to_string(),
            "Service type cannot be empty"
        );
        assert_eq!(
            RecordError::InvalidAmount("1.005".to_string()).to_string(),
            "Invalid currency amount: 1.005"
        );
    }
}
