//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use uuid::Uuid;

use wellca_core::record::DailyRecord;
use wellca_core::report::{aggregate_records, Granularity};
use wellca_core::storage::{BucketTotals, DateRange, RecordRepository, RepositoryError, Result};

/// In-memory storage backend.
///
/// Records are keyed by date, which enforces one record per date. Data is not
/// persisted and will be lost when the repository is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    records: Arc<RwLock<HashMap<NaiveDate, DailyRecord>>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records in the range, ascending by date.
    async fn in_range(&self, range: DateRange) -> Vec<DailyRecord> {
        let records = self.records.read().await;
        let mut found: Vec<DailyRecord> = records
            .values()
            .filter(|r| range.contains(r.date))
            .cloned()
            .collect();
        found.sort_by_key(|r| r.date);
        found
    }

    async fn aggregate(&self, range: DateRange, granularity: Granularity) -> Vec<BucketTotals> {
        let records = self.records.read().await;
        aggregate_records(
            records.values().filter(|r| range.contains(r.date)),
            granularity,
        )
    }
}

#[async_trait]
impl RecordRepository for InMemoryRepository {
    async fn find_by_date(&self, date: NaiveDate) -> Result<Option<DailyRecord>> {
        let records = self.records.read().await;
        Ok(records.get(&date).cloned())
    }

    async fn find_by_date_range(&self, range: DateRange) -> Result<Vec<DailyRecord>> {
        Ok(self.in_range(range).await)
    }

    async fn exists_by_date(&self, date: NaiveDate) -> Result<bool> {
        let records = self.records.read().await;
        Ok(records.contains_key(&date))
    }

    async fn find_by_service_type(
        &self,
        service_type: &str,
        range: DateRange,
    ) -> Result<Vec<DailyRecord>> {
        let mut found: Vec<DailyRecord> = self
            .in_range(range)
            .await
            .into_iter()
            .filter(|r| r.service_type() == Some(service_type))
            .collect();
        found.reverse();
        Ok(found)
    }

    async fn aggregate_by_date(&self, range: DateRange) -> Result<Vec<BucketTotals>> {
        Ok(self.aggregate(range, Granularity::Day).await)
    }

    async fn aggregate_by_week(&self, range: DateRange) -> Result<Vec<BucketTotals>> {
        Ok(self.aggregate(range, Granularity::Week).await)
    }

    async fn aggregate_by_month(&self, range: DateRange) -> Result<Vec<BucketTotals>> {
        Ok(self.aggregate(range, Granularity::Month).await)
    }

    async fn save(&self, record: &DailyRecord) -> Result<DailyRecord> {
        let mut records = self.records.write().await;

        let mut stored = record.clone();
        if let Some(existing) = records.get(&record.date) {
            stored.id = existing.id;
        } else if records.values().any(|r| r.id == record.id) {
            // The ID belongs to a record on another date
            return Err(RepositoryError::AlreadyExists {
                entity_type: "DailyRecord",
                id: record.id.to_string(),
            });
        }

        records.insert(stored.date, stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut records = self.records.write().await;
        let date = records
            .values()
            .find(|r| r.id == id)
            .map(|r| r.date)
            .ok_or_else(|| RepositoryError::NotFound {
                entity_type: "DailyRecord",
                id: id.to_string(),
            })?;
        records.remove(&date);
        Ok(())
    }
}
