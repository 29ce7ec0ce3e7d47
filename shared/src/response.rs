//! API Response types
//!
//! Envelope structures shared by the report server and its clients.

use serde::{Deserialize, Serialize};

/// Success envelope for report endpoints
///
/// ```json
/// {
///     "success": true,
///     "data": { ... },
///     "metadata": { "dateRange": "thisMonth", ... },
///     "timestamp": "2025-06-01T08:00:00Z",
///     "cached": false
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEnvelope<T> {
    pub success: bool,
    pub data: T,
    pub metadata: ReportMetadata,
    /// ISO-8601 generation time of this response (not of the cached data)
    pub timestamp: String,
    /// Whether `data` was served from the response cache
    pub cached: bool,
}

/// Resolved request scope, echoed back for the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// The raw range token from the request
    #[serde(rename = "dateRange")]
    pub date_range: String,
    /// Resolved inclusive start day (YYYY-MM-DD)
    #[serde(rename = "startDate")]
    pub start_date: String,
    /// Resolved inclusive end day (YYYY-MM-DD)
    #[serde(rename = "endDate")]
    pub end_date: String,
    pub filters: FilterEcho,
}

/// Dimension filters echoed back exactly as requested
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterEcho {
    pub region: String,
    pub route: String,
    pub salesman: String,
}

/// Code/name pair for filter dropdowns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeName {
    pub code: String,
    pub name: String,
}

/// Filter-options payload for the dashboard dropdowns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub regions: Vec<CodeName>,
    pub routes: Vec<CodeName>,
    pub salesmen: Vec<CodeName>,
}
