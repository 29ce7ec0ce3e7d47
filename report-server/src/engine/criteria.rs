//! Filter Normalizer
//!
//! Merges the resolved date range with the optional dimension filters into
//! an immutable [`FilterCriteria`]. The sentinel `"all"` (or an empty
//! value) means "no constraint" and is normalized to `None` here so it can
//! never leak into a query predicate.

use chrono::NaiveDate;

use crate::utils::time::format_date;

/// Sentinel query value meaning "do not filter this dimension"
pub const ALL: &str = "all";

/// Canonical, immutable request scope
///
/// Constructed once per request and used both as the aggregation scope and
/// (via the raw parameters, see [`cache_key`]) for cache lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Inclusive start day
    pub start_date: NaiveDate,
    /// Inclusive end day
    pub end_date: NaiveDate,
    pub region: Option<String>,
    pub route: Option<String>,
    pub salesman: Option<String>,
}

impl FilterCriteria {
    pub fn new(
        (start_date, end_date): (NaiveDate, NaiveDate),
        region: &str,
        route: &str,
        salesman: &str,
    ) -> Self {
        Self {
            start_date,
            end_date,
            region: normalize_dimension(region),
            route: normalize_dimension(route),
            salesman: normalize_dimension(salesman),
        }
    }

    pub fn start_str(&self) -> String {
        format_date(self.start_date)
    }

    pub fn end_str(&self) -> String {
        format_date(self.end_date)
    }
}

/// `"all"` or empty → no constraint
fn normalize_dimension(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == ALL {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Deterministic cache key from the RAW query-parameter set
///
/// Keying on the raw token (not the resolved dates) is the documented
/// policy: two requests with the same parameters always share an entry,
/// and a token whose resolution drifts past midnight simply expires with
/// the TTL instead of serving a stale scope under a fresh key.
pub fn cache_key(endpoint: &str, range: &str, region: &str, route: &str, salesman: &str) -> String {
    format!("{endpoint}?range={range}&region={region}&route={route}&salesman={salesman}")
}
