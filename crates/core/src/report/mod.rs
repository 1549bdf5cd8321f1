mod aggregation;
mod error;
mod pagination;
mod types;

pub use aggregation::{
    aggregate_records, daily_chart, daily_delivery_counts, monthly_buckets_chart,
    monthly_service_stats, rx_per_delivery, service_type_stats, weekly_chart, weekly_stats,
    Granularity,
};
pub use error::{ReportError, Result};
pub use pagination::{total_weekly_pages, total_weeks, weekly_page_window, WEEKS_PER_PAGE};
pub use types::{
    ChartData, ChartDatasets, DailyDeliveryCounts, MonthlyServiceStats, Pagination,
    ServiceTypeStat, WeeklyPages, WeeklyStats,
};
