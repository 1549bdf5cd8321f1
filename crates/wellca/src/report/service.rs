//! Cached report service.
//!
//! Wraps a `RecordRepository` with the named cache tier using cache-aside:
//! reads check the cache first and on a miss compute from the store and
//! store the result back; writes persist first, then invalidate.

use std::future::Future;
use std::sync::Arc;

use chrono::{Days, NaiveDate};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use wellca_core::cache::{
    deserialize_value, monthly_chart_key, monthly_service_stats_key, quarterly_chart_key,
    record_key, record_range_key, serialize_value, service_details_key, weekly_chart_key, Cache,
    CHART_DATA, RECORD_BY_DATE, RECORD_RANGE, SERVICE_DETAILS,
};
use wellca_core::record::{validate_record, DailyRecord};
use wellca_core::report::{
    daily_chart, daily_delivery_counts, monthly_buckets_chart, monthly_service_stats,
    service_type_stats, total_weekly_pages, weekly_chart, weekly_page_window, weekly_stats,
    ChartData, DailyDeliveryCounts, MonthlyServiceStats, Pagination, ReportError, Result,
    ServiceTypeStat, WeeklyPages, WeeklyStats, WEEKS_PER_PAGE,
};
use wellca_core::storage::{DateRange, RecordRepository};

use super::InvalidationCoordinator;

/// Report API over a record store and a named cache tier.
///
/// # Type Parameters
///
/// * `R` - The underlying record repository
/// * `C` - The cache implementation
pub struct ReportService<R, C> {
    repository: Arc<R>,
    cache: Arc<C>,
    invalidation: InvalidationCoordinator<C>,
    /// Serializes writes; reads never take it.
    write_lock: Mutex<()>,
}

impl<R, C> ReportService<R, C>
where
    R: RecordRepository,
    C: Cache,
{
    pub fn new(repository: Arc<R>, cache: Arc<C>) -> Self {
        Self {
            repository,
            invalidation: InvalidationCoordinator::new(Arc::clone(&cache)),
            cache,
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the cached value for `key`, or runs `compute`, caches and
    /// returns its result. `compute` is only polled on a miss.
    ///
    /// Cache failures degrade to computing without caching. A compute error is
    /// returned before anything is stored. The cache epoch is read before
    /// computing, so a value computed across a concurrent invalidation is
    /// dropped instead of stored.
    async fn cached<T, F>(&self, cache: &str, key: &str, compute: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: Future<Output = Result<T>>,
    {
        match self.cache.get(cache, key).await {
            Ok(Some(bytes)) => match deserialize_value(&bytes) {
                Ok(value) => {
                    tracing::trace!(cache, key, "Cache hit");
                    return Ok(value);
                }
                // Treat as a miss
                Err(err) => {
                    tracing::warn!(cache, key, error = %err, "Cached value deserialization failed")
                }
            },
            Ok(None) => tracing::trace!(cache, key, "Cache miss"),
            Err(err) => tracing::warn!(cache, key, error = %err, "Cache lookup failed"),
        }

        let epoch = match self.cache.epoch(cache).await {
            Ok(epoch) => Some(epoch),
            Err(err) => {
                tracing::warn!(cache, error = %err, "Failed to read cache epoch");
                None
            }
        };

        let value = compute.await?;

        let Some(epoch) = epoch else {
            return Ok(value);
        };
        match serialize_value(&value) {
            Ok(bytes) => match self.cache.put_if_current(cache, key, &bytes, epoch).await {
                Ok(true) => {}
                Ok(false) => {
                    tracing::debug!(cache, key, "Cache invalidated during compute, not storing")
                }
                Err(err) => tracing::warn!(cache, key, error = %err, "Failed to cache value"),
            },
            Err(err) => tracing::warn!(cache, key, error = %err, "Failed to serialize value"),
        }

        Ok(value)
    }

    /// Gets the record for a date.
    pub async fn entry_by_date(&self, date: NaiveDate) -> Result<Option<DailyRecord>> {
        self.cached(RECORD_BY_DATE, &record_key(date), async move {
            self.repository
                .find_by_date(date)
                .await
                .map_err(ReportError::from)
        })
        .await
    }

    /// Gets all records in `[start, end]`, ascending by date.
    pub async fn entries_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyRecord>> {
        let range = DateRange::new(start, end)?;
        self.cached(RECORD_RANGE, &record_range_key(start, end), async move {
            self.repository
                .find_by_date_range(range)
                .await
                .map_err(ReportError::from)
        })
        .await
    }

    /// Summary of the seven days starting at `week_start`.
    pub async fn weekly_stats(&self, week_start: NaiveDate) -> Result<WeeklyStats> {
        let week_end = week_start.checked_add_days(Days::new(6)).ok_or_else(|| {
            ReportError::InvalidRange(format!("week of {} overflows", week_start))
        })?;
        let records = self
            .repository
            .find_by_date_range(DateRange::new(week_start, week_end)?)
            .await?;

        tracing::debug!(%week_start, entries = records.len(), "Computed weekly stats");
        Ok(weekly_stats(&records))
    }

    /// Daily chart for one calendar month.
    pub async fn monthly_chart(&self, year: i32, month: u32) -> Result<ChartData> {
        let range = DateRange::month(year, month)?;
        self.cached(CHART_DATA, &monthly_chart_key(year, month), async move {
            let buckets = self.repository.aggregate_by_date(range).await?;
            tracing::debug!(year, month, buckets = buckets.len(), "Computed monthly chart");
            Ok::<_, ReportError>(daily_chart(range, &buckets))
        })
        .await
    }

    /// Monthly chart for one quarter (1-4). Always three buckets.
    pub async fn quarterly_chart(&self, year: i32, quarter: u32) -> Result<ChartData> {
        let range = DateRange::quarter(year, quarter)?;
        self.cached(CHART_DATA, &quarterly_chart_key(year, quarter), async move {
            let buckets = self.repository.aggregate_by_month(range).await?;
            tracing::debug!(year, quarter, buckets = buckets.len(), "Computed quarterly chart");
            Ok::<_, ReportError>(monthly_buckets_chart(range, &buckets))
        })
        .await
    }

    /// One page of the weekly chart over `[start, end]`. Pages are 1-based.
    pub async fn weekly_chart_page(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        page: u32,
    ) -> Result<ChartData> {
        let range = DateRange::new(start, end)?;
        let window = weekly_page_window(range, page)?;
        let total_pages = total_weekly_pages(range);

        self.cached(CHART_DATA, &weekly_chart_key(start, end, page), async move {
            let buckets = self.repository.aggregate_by_week(window).await?;
            tracing::debug!(%start, %end, page, buckets = buckets.len(), "Computed weekly chart");

            let mut chart = weekly_chart(window, &buckets);
            chart.pagination = Some(Pagination {
                current_page: page,
                total_pages,
                has_more: page < total_pages,
            });
            Ok::<_, ReportError>(chart)
        })
        .await
    }

    /// Number of weekly chart pages for `[start, end]`.
    pub fn total_weekly_pages(&self, start: NaiveDate, end: NaiveDate) -> Result<WeeklyPages> {
        let range = DateRange::new(start, end)?;
        Ok(WeeklyPages {
            total_pages: total_weekly_pages(range),
            weeks_per_page: WEEKS_PER_PAGE,
        })
    }

    /// Records with the given service type in `[start, end]`, newest first.
    pub async fn service_details(
        &self,
        service_type: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyRecord>> {
        let range = DateRange::new(start, end)?;
        let key = service_details_key(service_type, start, end);
        self.cached(SERVICE_DETAILS, &key, async move {
            self.repository
                .find_by_service_type(service_type, range)
                .await
                .map_err(ReportError::from)
        })
        .await
    }

    /// Service counts and revenue for one calendar month.
    pub async fn monthly_service_stats(
        &self,
        year: i32,
        month: u32,
    ) -> Result<MonthlyServiceStats> {
        let range = DateRange::month(year, month)?;
        let key = monthly_service_stats_key(year, month);
        self.cached(SERVICE_DETAILS, &key, async move {
            let records = self.repository.find_by_date_range(range).await?;
            Ok::<_, ReportError>(monthly_service_stats(&records))
        })
        .await
    }

    /// Count and total cost per service type in `[start, end]`.
    pub async fn service_type_stats(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ServiceTypeStat>> {
        let range = DateRange::new(start, end)?;
        let records = self.repository.find_by_date_range(range).await?;
        Ok(service_type_stats(&records))
    }

    /// Per-carrier deliveries for each recorded date of a month.
    pub async fn monthly_delivery_counts(
        &self,
        year: i32,
        month: u32,
    ) -> Result<Vec<DailyDeliveryCounts>> {
        let range = DateRange::month(year, month)?;
        let records = self.repository.find_by_date_range(range).await?;
        Ok(daily_delivery_counts(&records))
    }

    /// Saves a record, replacing any record for the same date.
    ///
    /// The record is validated before the store is touched. Replacing an
    /// existing date is logged at info level. Derived caches
    /// are invalidated before this returns; if invalidation fails the record
    /// is stored but `ReportError::Cache` is returned.
    pub async fn save(&self, record: DailyRecord) -> Result<DailyRecord> {
        validate_record(&record)?;

        let _guard = self.write_lock.lock().await;
        if self.repository.exists_by_date(record.date).await? {
            tracing::info!(date = %record.date, "Updating existing record");
        }
        let saved = self.repository.save(&record).await?;
        self.invalidation.on_write(&saved).await?;

        tracing::debug!(record_id = %saved.id, date = %saved.date, "Record saved");
        Ok(saved)
    }

    /// Deletes a record by ID. Invalidation behaves as in [`Self::save`].
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.repository.delete(id).await?;
        self.invalidation.on_delete(id).await?;

        tracing::debug!(record_id = %id, "Record deleted");
        Ok(())
    }
}
