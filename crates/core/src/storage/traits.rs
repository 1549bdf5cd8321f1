use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::record::DailyRecord;

use super::{BucketTotals, DateRange, Result};

/// Storage for daily records.
///
/// Implementations own the record lifetimes and enforce the one-record-per-date
/// rule. Calls may fail but must not hang.
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Gets the record for a date.
    async fn find_by_date(&self, date: NaiveDate) -> Result<Option<DailyRecord>>;

    /// Gets all records within a date range, ascending by date.
    async fn find_by_date_range(&self, range: DateRange) -> Result<Vec<DailyRecord>>;

    /// Returns true if a record exists for the date.
    async fn exists_by_date(&self, date: NaiveDate) -> Result<bool>;

    /// Gets records with the given service type within a date range, newest first.
    async fn find_by_service_type(
        &self,
        service_type: &str,
        range: DateRange,
    ) -> Result<Vec<DailyRecord>>;

    /// Totals per day for days with records, ascending.
    async fn aggregate_by_date(&self, range: DateRange) -> Result<Vec<BucketTotals>>;

    /// Totals per ISO week for weeks with records, ascending.
    async fn aggregate_by_week(&self, range: DateRange) -> Result<Vec<BucketTotals>>;

    /// Totals per calendar month for months with records, ascending.
    async fn aggregate_by_month(&self, range: DateRange) -> Result<Vec<BucketTotals>>;

    /// Saves a record, replacing any existing record for the same date.
    ///
    /// Returns the stored record. An existing record for the date keeps its ID.
    async fn save(&self, record: &DailyRecord) -> Result<DailyRecord>;

    /// Deletes a record by its ID.
    async fn delete(&self, id: Uuid) -> Result<()>;
}
