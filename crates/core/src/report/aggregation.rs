//! Pure aggregation of daily records into report values.
//!
//! Every function here depends only on its arguments, so computing the same
//! window twice over unchanged records yields identical output.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::record::{DailyRecord, Money};
use crate::storage::{BucketKey, BucketTotals, DateRange, Totals};

use super::types::{
    ChartData, DailyDeliveryCounts, MonthlyServiceStats, ServiceTypeStat, WeeklyStats,
};

/// Bucket size for [`aggregate_records`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Day,
    Week,
    Month,
}

impl Granularity {
    fn bucket_of(self, date: NaiveDate) -> BucketKey {
        match self {
            Granularity::Day => BucketKey::Day(date),
            Granularity::Week => BucketKey::week_of(date),
            Granularity::Month => BucketKey::month_of(date),
        }
    }
}

/// Sums records into buckets, ascending by bucket. Buckets without records
/// are omitted.
pub fn aggregate_records<'a>(
    records: impl IntoIterator<Item = &'a DailyRecord>,
    granularity: Granularity,
) -> Vec<BucketTotals> {
    let mut buckets: BTreeMap<BucketKey, Totals> = BTreeMap::new();

    for record in records {
        let totals = buckets.entry(granularity.bucket_of(record.date)).or_default();
        totals.deliveries += record.total_deliveries();
        totals.rx += record.total_filled();
        totals.services += u64::from(record.has_service());
    }

    buckets
        .into_iter()
        .map(|(key, totals)| BucketTotals { key, totals })
        .collect()
}

/// Prescriptions per delivery, rounded half-to-even to two decimals.
///
/// Zero deliveries yields zero.
pub fn rx_per_delivery(rx: u64, deliveries: u64) -> f64 {
    if deliveries == 0 {
        return 0.0;
    }
    let ratio = rx as f64 / deliveries as f64;
    (ratio * 100.0).round_ties_even() / 100.0
}

fn lookup(buckets: &[BucketTotals]) -> BTreeMap<BucketKey, Totals> {
    buckets.iter().map(|b| (b.key, b.totals)).collect()
}

fn build_chart(points: impl IntoIterator<Item = (String, Totals)>) -> ChartData {
    let mut chart = ChartData::default();
    for (label, totals) in points {
        chart.labels.push(label);
        chart.datasets.rx_count.push(totals.rx);
        chart.datasets.deliveries.push(totals.deliveries);
        chart
            .datasets
            .rx_per_delivery
            .push(rx_per_delivery(totals.rx, totals.deliveries));
        chart.datasets.services.push(totals.services);
    }
    chart
}

/// One bucket per day of `range`, labelled like `Mar 01`. Days without
/// records are zero.
pub fn daily_chart(range: DateRange, buckets: &[BucketTotals]) -> ChartData {
    let totals = lookup(buckets);
    build_chart(range.days().map(|day| {
        let t = totals.get(&BucketKey::Day(day)).copied().unwrap_or_default();
        (day.format("%b %d").to_string(), t)
    }))
}

/// One bucket per calendar month starting inside `range`, labelled like
/// `January 2024`. Months without records are zero.
pub fn monthly_buckets_chart(range: DateRange, buckets: &[BucketTotals]) -> ChartData {
    let totals = lookup(buckets);
    build_chart(range.days().filter(|d| d.day() == 1).map(|first| {
        let t = totals
            .get(&BucketKey::month_of(first))
            .copied()
            .unwrap_or_default();
        (first.format("%B %Y").to_string(), t)
    }))
}

/// One bucket per ISO week touching `window`. Each label is the last date of
/// that week inside the window, like `Jan 07`. Weeks without records are zero.
pub fn weekly_chart(window: DateRange, buckets: &[BucketTotals]) -> ChartData {
    let totals = lookup(buckets);

    let mut weeks: Vec<(BucketKey, NaiveDate)> = Vec::new();
    for day in window.days() {
        let key = BucketKey::week_of(day);
        match weeks.last_mut() {
            Some((last_key, last_day)) if *last_key == key => *last_day = day,
            _ => weeks.push((key, day)),
        }
    }

    build_chart(weeks.into_iter().map(|(key, last_day)| {
        let t = totals.get(&key).copied().unwrap_or_default();
        (last_day.format("%b %d").to_string(), t)
    }))
}

/// Average profiles entered, prescriptions filled and entry count.
pub fn weekly_stats(records: &[DailyRecord]) -> WeeklyStats {
    if records.is_empty() {
        return WeeklyStats::default();
    }

    let profiles: u64 = records.iter().map(|r| u64::from(r.profiles_entered)).sum();
    WeeklyStats {
        average_profiles_entered: profiles as f64 / records.len() as f64,
        total_rx_filled: records.iter().map(DailyRecord::total_filled).sum(),
        entries_count: records.len(),
    }
}

/// Service counts and revenue by type. Only records with both a service type
/// and a cost contribute.
pub fn monthly_service_stats(records: &[DailyRecord]) -> MonthlyServiceStats {
    let mut stats = MonthlyServiceStats::default();

    for service in records.iter().filter_map(|r| r.service.as_ref()) {
        let Some(cost) = service.cost else {
            continue;
        };
        *stats
            .service_counts
            .entry(service.service_type.clone())
            .or_default() += 1;
        let revenue = stats
            .service_revenue
            .entry(service.service_type.clone())
            .or_default();
        *revenue = *revenue + cost;
        stats.total_revenue = stats.total_revenue + cost;
        stats.total_services += 1;
    }

    stats
}

/// Count and summed cost per service type, sorted by type.
pub fn service_type_stats(records: &[DailyRecord]) -> Vec<ServiceTypeStat> {
    let mut by_type: BTreeMap<&str, (u64, Money)> = BTreeMap::new();

    for service in records.iter().filter_map(|r| r.service.as_ref()) {
        let (count, total) = by_type.entry(service.service_type.as_str()).or_default();
        *count += 1;
        *total = *total + service.cost.unwrap_or_default();
    }

    by_type
        .into_iter()
        .map(|(service_type, (count, total_cost))| ServiceTypeStat {
            service_type: service_type.to_string(),
            count,
            total_cost,
        })
        .collect()
}

/// Per-carrier deliveries for each date with a record, ascending.
pub fn daily_delivery_counts(records: &[DailyRecord]) -> Vec<DailyDeliveryCounts> {
    let mut by_date: BTreeMap<NaiveDate, DailyDeliveryCounts> = BTreeMap::new();

    for record in records {
        let counts = by_date
            .entry(record.date)
            .or_insert_with(|| DailyDeliveryCounts {
                date: record.date,
                purolator: 0,
                fedex: 0,
                one_courier: 0,
                go_bolt: 0,
            });
        counts.purolator += u64::from(record.purolator);
        counts.fedex += u64::from(record.fedex);
        counts.one_courier += u64::from(record.one_courier);
        counts.go_bolt += u64::from(record.go_bolt);
    }

    by_date.into_values().collect()
}
