//! Paging of the weekly chart.
//!
//! Pages are aligned to ISO weeks: page 1 starts with the ISO week holding
//! the range start, and each page covers four consecutive ISO weeks. Page
//! windows are clamped to the requested range.

use chrono::{Datelike, Days, NaiveDate};

use crate::storage::DateRange;

use super::{ReportError, Result};

/// ISO weeks shown on one page of the weekly chart.
pub const WEEKS_PER_PAGE: u32 = 4;

const DAYS_PER_PAGE: u64 = 7 * WEEKS_PER_PAGE as u64;

/// Monday of the ISO week holding `date`, or `date` itself when that Monday
/// is before the earliest representable date.
fn iso_week_monday(date: NaiveDate) -> NaiveDate {
    let since_monday = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(since_monday)).unwrap_or(date)
}

/// Number of distinct ISO weeks the range touches.
pub fn total_weeks(range: DateRange) -> u32 {
    let weeks = (range.end - iso_week_monday(range.start)).num_days() / 7 + 1;
    u32::try_from(weeks).unwrap_or(u32::MAX)
}

/// Number of weekly chart pages for the range. Always at least one.
pub fn total_weekly_pages(range: DateRange) -> u32 {
    total_weeks(range).div_ceil(WEEKS_PER_PAGE)
}

/// Returns the date window shown on a 1-based page.
///
/// The window holds ISO weeks `4(page-1)..4*page` counted from the week of
/// the range start, cut to the range. A page outside
/// `1..=total_weekly_pages(range)` is an `InvalidRange` error.
pub fn weekly_page_window(range: DateRange, page: u32) -> Result<DateRange> {
    let total_pages = total_weekly_pages(range);
    if page < 1 || page > total_pages {
        return Err(ReportError::InvalidRange(format!(
            "page {} outside 1..={}",
            page, total_pages
        )));
    }

    let offset = DAYS_PER_PAGE * u64::from(page - 1);
    let page_start = iso_week_monday(range.start)
        .checked_add_days(Days::new(offset))
        .ok_or_else(|| ReportError::InvalidRange(format!("page {} overflows", page)))?;
    let end = page_start
        .checked_add_days(Days::new(DAYS_PER_PAGE - 1))
        .map_or(range.end, |end| end.min(range.end));

    Ok(DateRange {
        start: page_start.max(range.start),
        end,
    })
}
