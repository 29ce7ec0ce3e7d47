//! Returns & Wastage API Handlers
//!
//! Control flow for the report endpoint: normalize filters → cache lookup
//! → on miss run the aggregation engine under its execution budget → shape
//! the envelope → cache the result. Errors are never cached, and two
//! identical concurrent misses will both run the engine (no coalescing).

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use http::{HeaderValue, header};
use serde::{Deserialize, Serialize};

use shared::response::{FilterEcho, FilterOptions, ReportEnvelope, ReportMetadata};
use shared::util::now_iso;

use crate::core::{CachedReport, ServerState};
use crate::db::repository::transaction_line;
use crate::engine::{self, ALL, FilterCriteria, cache_key, date_range};
use crate::utils::AppResult;
use crate::utils::time::business_today;

const ENDPOINT_REPORT: &str = "returns-wastage";
const ENDPOINT_FILTERS: &str = "returns-wastage/filters";

/// Freshness advertised to intermediary caches: 3 min in the browser,
/// 5 min shared, stale-while-revalidate up to 10 min
const CACHE_CONTROL: &str = "public, max-age=180, s-maxage=300, stale-while-revalidate=600";

// ============================================================================
// Query Parameters
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    #[serde(default = "default_range")]
    pub range: String,
    #[serde(default = "default_all")]
    pub region: String,
    #[serde(default = "default_all")]
    pub route: String,
    #[serde(default = "default_all")]
    pub salesman: String,
}

#[derive(Debug, Deserialize)]
pub struct FiltersQuery {
    #[serde(default = "default_range")]
    pub range: String,
    #[serde(default = "default_all")]
    pub region: String,
    #[serde(default = "default_all")]
    pub route: String,
}

fn default_range() -> String {
    "thisMonth".to_string()
}

fn default_all() -> String {
    ALL.to_string()
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub success: bool,
    pub message: &'static str,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct FiltersEnvelope {
    pub success: bool,
    #[serde(flatten)]
    pub options: FilterOptions,
    pub timestamp: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/returns-wastage - full analytics report for the requested scope
pub async fn get_report(
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Response> {
    let key = cache_key(
        ENDPOINT_REPORT,
        &query.range,
        &query.region,
        &query.route,
        &query.salesman,
    );

    if let Some(report) = state.report_cache.get(&key) {
        tracing::debug!(key = %key, "Report served from cache");
        return Ok(report_response(&report, true));
    }

    let today = business_today(state.config.timezone);
    let criteria = FilterCriteria::new(
        date_range::resolve(&query.range, today),
        &query.region,
        &query.route,
        &query.salesman,
    );

    tracing::debug!(
        range = %query.range,
        start = %criteria.start_str(),
        end = %criteria.end_str(),
        "Computing report"
    );

    let data = engine::run(&state.pool, &state.config, &criteria).await?;

    let metadata = ReportMetadata {
        date_range: query.range.clone(),
        start_date: criteria.start_str(),
        end_date: criteria.end_str(),
        filters: FilterEcho {
            region: query.region.clone(),
            route: query.route.clone(),
            salesman: query.salesman.clone(),
        },
    };

    let report = state.report_cache.set(key, CachedReport { data, metadata });
    Ok(report_response(&report, false))
}

/// POST /api/returns-wastage - invalidate cached reports and filters
pub async fn refresh(State(state): State<ServerState>) -> Json<RefreshResponse> {
    state.invalidate_caches();
    Json(RefreshResponse {
        success: true,
        message: "Returns & wastage cache invalidated (data + filters)",
        timestamp: now_iso(),
    })
}

/// GET /api/returns-wastage/filters - dropdown options with returns in scope
pub async fn get_filters(
    State(state): State<ServerState>,
    Query(query): Query<FiltersQuery>,
) -> AppResult<Response> {
    let key = cache_key(ENDPOINT_FILTERS, &query.range, &query.region, &query.route, ALL);

    if let Some(options) = state.filters_cache.get(&key) {
        return Ok(filters_response(&options));
    }

    let today = business_today(state.config.timezone);
    let criteria = FilterCriteria::new(
        date_range::resolve(&query.range, today),
        &query.region,
        &query.route,
        ALL,
    );
    let (start, end) = (criteria.start_str(), criteria.end_str());

    let regions = transaction_line::distinct_regions(&state.pool, &start, &end).await?;
    let routes =
        transaction_line::distinct_routes(&state.pool, &start, &end, criteria.region.as_deref())
            .await?;
    let salesmen = transaction_line::distinct_salesmen(
        &state.pool,
        &start,
        &end,
        criteria.region.as_deref(),
        criteria.route.as_deref(),
    )
    .await?;

    let options = state.filters_cache.set(
        key,
        FilterOptions {
            regions,
            routes,
            salesmen,
        },
    );
    Ok(filters_response(&options))
}

// ============================================================================
// Response assembly
// ============================================================================

fn report_response(report: &CachedReport, cached: bool) -> Response {
    let envelope = ReportEnvelope {
        success: true,
        data: report.data.clone(),
        metadata: report.metadata.clone(),
        timestamp: now_iso(),
        cached,
    };
    with_cache_headers(Json(envelope).into_response())
}

fn filters_response(options: &FilterOptions) -> Response {
    let envelope = FiltersEnvelope {
        success: true,
        options: options.clone(),
        timestamp: now_iso(),
    };
    with_cache_headers(Json(envelope).into_response())
}

fn with_cache_headers(mut response: Response) -> Response {
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL));
    response
}
