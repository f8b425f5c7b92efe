//! Date helpers for the sync window and retention cutoff.

use chrono::{Days, NaiveDate};

/// The next `n` calendar dates starting at `from` (inclusive).
///
/// A sync run fetches this window: today plus `days_ahead - 1` future days.
#[must_use]
pub fn next_n_dates(from: NaiveDate, n: u32) -> Vec<NaiveDate> {
    (0..u64::from(n))
        .filter_map(|offset| from.checked_add_days(Days::new(offset)))
        .collect()
}

/// Cutoff for the retention sweep: rows dated strictly before this are
/// removed. `retention_days` in the past, clamped at the calendar minimum.
#[must_use]
pub fn retention_cutoff(today: NaiveDate, retention_days: u32) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(retention_days)))
        .unwrap_or(NaiveDate::MIN)
}
