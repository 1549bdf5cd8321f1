use super::error::RecordError;
use super::types::DailyRecord;

/// Upper bound for a single carrier's daily delivery count.
pub const MAX_DELIVERIES_PER_CARRIER: u32 = 9999;

/// Validates a daily record before it is saved.
pub fn validate_record(record: &DailyRecord) -> Result<(), RecordError> {
    let carriers = [
        ("Purolator", record.purolator),
        ("FedEx", record.fedex),
        ("OneCourier", record.one_courier),
        ("GoBolt", record.go_bolt),
    ];
    for (carrier, count) in carriers {
        if count > MAX_DELIVERIES_PER_CARRIER {
            return Err(RecordError::TooManyDeliveries {
                carrier,
                max: MAX_DELIVERIES_PER_CARRIER,
            });
        }
    }

    if let Some(pct) = record.active_percentage {
        if !(0.0..=100.0).contains(&pct) {
            return Err(RecordError::InvalidPercentage);
        }
    }

    if let Some(service) = &record.service {
        if service.service_type.trim().is_empty() {
            return Err(RecordError::EmptyServiceType);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ProfessionalService;
    use chrono::NaiveDate;

    fn record() -> DailyRecord {
        DailyRecord::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
    }

    #[test]
    fn test_valid_record() {
        let record = record()
            .with_deliveries(9999, 0, 3, 1)
            .with_service(ProfessionalService::new("MedsCheck"));
        assert_eq!(validate_record(&record), Ok(()));
    }

    #[test]
    fn test_too_many_deliveries() {
        let record = record().with_deliveries(0, 0, 10_000, 0);
        assert_eq!(
            validate_record(&record),
            Err(RecordError::TooManyDeliveries {
                carrier: "OneCourier",
                max: MAX_DELIVERIES_PER_CARRIER
            })
        );
    }

    #[test]
    fn test_percentage_out_of_range() {
        let mut record = record();
        record.active_percentage = Some(100.5);
        assert_eq!(validate_record(&record), Err(RecordError::InvalidPercentage));

        record.active_percentage = Some(f64::NAN);
        assert_eq!(validate_record(&record), Err(RecordError::InvalidPercentage));

        record.active_percentage = Some(42.0);
        assert_eq!(validate_record(&record), Ok(()));
    }

    #[test]
    fn test_blank_service_type() {
        let record = record().with_service(ProfessionalService::new("   "));
        assert_eq!(validate_record(&record), Err(RecordError::EmptyServiceType));
    }
}
