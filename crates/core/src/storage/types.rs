use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::DateRangeError;

/// A date range with inclusive start and end dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new date range, validating that start <= end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    /// Creates a date range for an entire month.
    pub fn month(year: i32, month: u32) -> Result<Self, DateRangeError> {
        let invalid = || DateRangeError::InvalidMonth { year, month };
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;

        // First of next month minus one day
        let end = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .and_then(|next| next.pred_opt())
        .ok_or_else(invalid)?;

        Ok(Self { start, end })
    }

    /// Creates a date range covering the three months of a quarter (1-4).
    pub fn quarter(year: i32, quarter: u32) -> Result<Self, DateRangeError> {
        if !(1..=4).contains(&quarter) {
            return Err(DateRangeError::InvalidQuarter(quarter));
        }
        let first_month = 3 * (quarter - 1) + 1;
        let start = Self::month(year, first_month)?.start;
        let end = Self::month(year, first_month + 2)?.end;
        Ok(Self { start, end })
    }

    /// Returns true if the date falls inside the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Iterates over every date in the range, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

/// Identifies an aggregation bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BucketKey {
    Day(NaiveDate),
    /// ISO year and ISO week number.
    Week { year: i32, week: u32 },
    Month { year: i32, month: u32 },
}

impl BucketKey {
    /// Returns the ISO week bucket containing the date.
    pub fn week_of(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self::Week {
            year: iso.year(),
            week: iso.week(),
        }
    }

    /// Returns the month bucket containing the date.
    pub fn month_of(date: NaiveDate) -> Self {
        Self::Month {
            year: date.year(),
            month: date.month(),
        }
    }
}

/// Summed counters for a bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub deliveries: u64,
    pub rx: u64,
    /// Records with a professional service.
    pub services: u64,
}

/// Totals for one bucket, as returned by the storage-level aggregate queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketTotals {
    pub key: BucketKey,
    pub totals: Totals,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_valid_range_construction() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();

        assert_eq!(range.start, date(2024, 1, 1));
        assert_eq!(range.end, date(2024, 1, 31));
        assert_eq!(range.days().count(), 31);
    }

    #[test]
    fn test_same_day_range_is_valid() {
        let range = DateRange::new(date(2024, 6, 15), date(2024, 6, 15)).unwrap();

        assert_eq!(range.days().collect::<Vec<_>>(), vec![date(2024, 6, 15)]);
    }

    #[test]
    fn test_end_before_start_is_invalid() {
        let result = DateRange::new(date(2024, 6, 15), date(2024, 6, 14));
        assert_eq!(result, Err(DateRangeError::InvalidRange));
    }

    #[test]
    fn test_month_factory_leap_february() {
        let range = DateRange::month(2024, 2).unwrap();

        assert_eq!(range.start, date(2024, 2, 1));
        assert_eq!(range.end, date(2024, 2, 29));
    }

    #[test]
    fn test_month_factory_december() {
        let range = DateRange::month(2024, 12).unwrap();

        assert_eq!(range.start, date(2024, 12, 1));
        assert_eq!(range.end, date(2024, 12, 31));
    }

    #[test]
    fn test_month_factory_rejects_invalid_month() {
        assert_eq!(
            DateRange::month(2024, 13),
            Err(DateRangeError::InvalidMonth {
                year: 2024,
                month: 13
            })
        );
        assert!(DateRange::month(2024, 0).is_err());
    }

    #[test]
    fn test_quarter_factory() {
        let q1 = DateRange::quarter(2024, 1).unwrap();
        assert_eq!(q1.start, date(2024, 1, 1));
        assert_eq!(q1.end, date(2024, 3, 31));

        let q4 = DateRange::quarter(2023, 4).unwrap();
        assert_eq!(q4.start, date(2023, 10, 1));
        assert_eq!(q4.end, date(2023, 12, 31));
    }

    #[test]
    fn test_quarter_factory_rejects_out_of_range() {
        assert_eq!(
            DateRange::quarter(2024, 0),
            Err(DateRangeError::InvalidQuarter(0))
        );
        assert_eq!(
            DateRange::quarter(2024, 5),
            Err(DateRangeError::InvalidQuarter(5))
        );
    }

    #[test]
    fn test_contains() {
        let range = DateRange::month(2024, 3).unwrap();
        assert!(range.contains(date(2024, 3, 1)));
        assert!(range.contains(date(2024, 3, 31)));
        assert!(!range.contains(date(2024, 4, 1)));
    }

    #[test]
    fn test_week_bucket_uses_iso_year() {
        // 2024-12-30 belongs to ISO week 1 of 2025
        assert_eq!(
            BucketKey::week_of(date(2024, 12, 30)),
            BucketKey::Week { year: 2025, week: 1 }
        );
        assert_eq!(
            BucketKey::month_of(date(2024, 12, 30)),
            BucketKey::Month {
                year: 2024,
                month: 12
            }
        );
    }
}
