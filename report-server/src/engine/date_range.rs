//! Date Range Resolver
//!
//! Maps a symbolic range token plus "today" to a concrete inclusive
//! calendar-day pair. Unrecognized tokens fall back to `lastMonth` rather
//! than failing — the range selector is never a fatal input.

use chrono::{Datelike, Duration, NaiveDate};

/// Resolve a symbolic token to an inclusive `[start, end]` day pair
pub fn resolve(token: &str, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first_of_month = today.with_day(1).unwrap_or(today);

    match token {
        "today" => (today, today),
        "yesterday" => {
            let yesterday = today - Duration::days(1);
            (yesterday, yesterday)
        }
        "last7Days" => (today - Duration::days(6), today),
        "last30Days" => (today - Duration::days(29), today),
        "thisMonth" => (first_of_month, today),
        "thisQuarter" => {
            let quarter_first_month = (today.month0() / 3) * 3 + 1;
            // Move to day 1 first: every month has a day 1, so with_month
            // cannot land on a nonexistent date
            let quarter_start = first_of_month
                .with_month(quarter_first_month)
                .unwrap_or(first_of_month);
            (quarter_start, today)
        }
        "thisYear" => {
            let year_start = today.with_ordinal(1).unwrap_or(first_of_month);
            (year_start, today)
        }
        // "lastMonth" and everything unrecognized: full previous month
        _ => {
            let last_of_prev = first_of_month.pred_opt().unwrap_or(today);
            let first_of_prev = last_of_prev.with_day(1).unwrap_or(last_of_prev);
            (first_of_prev, last_of_prev)
        }
    }
}
