//! 时间工具函数 — 业务时区转换
//!
//! Date-range resolution happens once at the API boundary; everything
//! downstream works with `NaiveDate` / YYYY-MM-DD strings.

use chrono::NaiveDate;
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// Current calendar day in the business timezone
pub fn business_today(tz: Tz) -> NaiveDate {
    chrono::Utc::now().with_timezone(&tz).date_naive()
}

/// Format a date as the wire representation (YYYY-MM-DD, no time component)
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a timezone name, falling back to UTC with a warning
pub fn parse_timezone(name: &str) -> Tz {
    name.parse().unwrap_or_else(|_| {
        tracing::warn!("Unknown timezone '{}', falling back to UTC", name);
        chrono_tz::UTC
    })
}
