use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::record::Money;

/// Per-bucket series for the dashboard charts. All vectors are parallel to
/// `ChartData::labels`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartDatasets {
    pub rx_count: Vec<u64>,
    pub deliveries: Vec<u64>,
    pub rx_per_delivery: Vec<f64>,
    pub services: Vec<u64>,
}

/// Page position of a weekly chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub has_more: bool,
}

/// Chart payload for the monthly, quarterly and weekly charts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: ChartDatasets,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

/// Summary of one week of records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyStats {
    pub average_profiles_entered: f64,
    pub total_rx_filled: u64,
    pub entries_count: usize,
}

/// Page count of the weekly chart for a date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyPages {
    pub total_pages: u32,
    pub weeks_per_page: u32,
}

/// Professional service counts and revenue for a month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyServiceStats {
    pub service_counts: BTreeMap<String, u64>,
    pub service_revenue: BTreeMap<String, Money>,
    pub total_revenue: Money,
    pub total_services: u64,
}

/// Count and cost of one service type over a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceTypeStat {
    pub service_type: String,
    pub count: u64,
    pub total_cost: Money,
}

/// Deliveries per carrier for one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyDeliveryCounts {
    pub date: NaiveDate,
    pub purolator: u64,
    pub fedex: u64,
    pub one_courier: u64,
    pub go_bolt: u64,
}
