//! Cache key derivation.
//!
//! Keys join every parameter that affects the cached value with `:`. Dates
//! and numbers cannot contain the separator; free text is length-prefixed so
//! distinct parameter tuples never produce the same key.

use chrono::NaiveDate;

/// Key for the record of a single date (`wellcaData`).
pub fn record_key(date: NaiveDate) -> String {
    format!("date:{}", date)
}

/// Key for the records within a date range (`wellcaRangeData`).
pub fn record_range_key(start: NaiveDate, end: NaiveDate) -> String {
    format!("range:{}:{}", start, end)
}

/// Key for the records of one service type within a date range (`serviceDetails`).
pub fn service_details_key(service_type: &str, start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "service:{}:{}:{}:{}",
        service_type.len(),
        service_type,
        start,
        end
    )
}

fn month_key(year: i32, month: u32) -> String {
    format!("monthly:{}-{:02}", year, month)
}

/// Key for the service revenue breakdown of a month (`serviceDetails`).
///
/// Same text as [`monthly_chart_key`]; the two live in different caches.
pub fn monthly_service_stats_key(year: i32, month: u32) -> String {
    month_key(year, month)
}

/// Key for the daily chart of a month (`chartData`).
pub fn monthly_chart_key(year: i32, month: u32) -> String {
    month_key(year, month)
}

/// Key for the monthly chart of a quarter (`chartData`).
pub fn quarterly_chart_key(year: i32, quarter: u32) -> String {
    format!("quarterly:{}-Q{}", year, quarter)
}

/// Key for one page of the weekly chart (`chartData`).
pub fn weekly_chart_key(start: NaiveDate, end: NaiveDate, page: u32) -> String {
    format!("weekly:{}:{}:page:{}", start, end, page)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_record_key() {
        assert_eq!(record_key(date(2024, 3, 1)), "date:2024-03-01");
    }

    #[test]
    fn test_record_range_key() {
        assert_eq!(
            record_range_key(date(2024, 3, 1), date(2024, 3, 31)),
            "range:2024-03-01:2024-03-31"
        );
    }

    #[test]
    fn test_service_details_key() {
        assert_eq!(
            service_details_key("MedsCheck", date(2024, 3, 1), date(2024, 3, 31)),
            "service:9:MedsCheck:2024-03-01:2024-03-31"
        );
    }

    #[test]
    fn test_service_details_key_with_separator_in_type() {
        let start = date(2024, 1, 1);
        let end = date(2024, 1, 31);

        assert_eq!(
            service_details_key("Flu:Senior", start, end),
            "service:10:Flu:Senior:2024-01-01:2024-01-31"
        );
        assert_ne!(
            service_details_key("Flu:Senior", start, end),
            service_details_key("Flu", start, end)
        );
    }

    #[test]
    fn test_chart_keys() {
        assert_eq!(monthly_chart_key(2024, 3), "monthly:2024-03");
        assert_eq!(quarterly_chart_key(2024, 1), "quarterly:2024-Q1");
        assert_eq!(
            weekly_chart_key(date(2024, 1, 1), date(2024, 2, 25), 2),
            "weekly:2024-01-01:2024-02-25:page:2"
        );
    }

    #[test]
    fn test_weekly_pages_never_share_a_key() {
        let start = date(2024, 1, 1);
        let end = date(2024, 2, 25);
        assert_ne!(
            weekly_chart_key(start, end, 1),
            weekly_chart_key(start, end, 2)
        );
        assert_ne!(
            weekly_chart_key(start, end, 1),
            weekly_chart_key(start, date(2024, 2, 26), 1)
        );
    }

    #[test]
    fn test_month_keys_are_zero_padded() {
        // 2024-1 followed by 1 must not read like 2024-11
        assert_ne!(monthly_chart_key(2024, 1), monthly_chart_key(2024, 11));
        assert_eq!(monthly_service_stats_key(2024, 1), "monthly:2024-01");
    }
}
