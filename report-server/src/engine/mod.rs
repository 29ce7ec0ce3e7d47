//! Analytics Engine
//!
//! Request flow: resolve the date range, normalize filters, fetch the two
//! working sets under the execution budget, then compute every facet from
//! those sets in memory.
//!
//! - [`date_range`] - symbolic token → inclusive day pair
//! - [`criteria`] - filter normalization and cache keys
//! - [`aggregate`] - facet computations
//! - [`shape`] - numeric coercion helpers

pub mod aggregate;
pub mod criteria;
pub mod date_range;
pub mod shape;

pub use criteria::{ALL, FilterCriteria, cache_key};

use sqlx::SqlitePool;

use shared::report::ReportData;

use crate::core::Config;
use crate::db::repository::{RepoResult, transaction_line};
use crate::utils::{AppError, AppResult};

/// Fetch both working sets and build the full report
///
/// The repository fetches run inside one `tokio::time::timeout` scoped to
/// this request — exceeding the budget aborts the query and surfaces
/// [`AppError::QueryTimeout`] instead of hanging the worker. The pool
/// connection is returned on every exit path by RAII.
pub async fn run(
    pool: &SqlitePool,
    config: &Config,
    criteria: &FilterCriteria,
) -> AppResult<ReportData> {
    let started = std::time::Instant::now();

    let (returns, sales) = tokio::time::timeout(config.query_timeout(), async {
        let returns = transaction_line::fetch_returns(pool, criteria).await?;
        let sales = transaction_line::fetch_sales(pool, criteria).await?;
        RepoResult::Ok((returns, sales))
    })
    .await
    .map_err(|_| AppError::QueryTimeout)??;

    tracing::debug!(
        returns = returns.len(),
        sales = sales.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        start = %criteria.start_str(),
        end = %criteria.end_str(),
        "Working sets fetched"
    );

    Ok(aggregate::build_report(&returns, &sales, &config.currency_code))
}
