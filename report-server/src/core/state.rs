//! Server State
//!
//! Shared state handed to every request handler. `Clone` is shallow: the
//! pool and caches sit behind `Arc`s, so handlers share one process-wide
//! response cache — constructed at startup, torn down at shutdown, and
//! swappable in tests.

use std::sync::Arc;

use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;

use shared::report::ReportData;
use shared::response::{FilterOptions, ReportMetadata};

use crate::cache::ResponseCache;
use crate::core::Config;
use crate::db::DbService;
use crate::utils::AppResult;

/// Cached value of the report endpoint: the computed report plus the
/// resolved scope it was computed for
#[derive(Debug, Clone)]
pub struct CachedReport {
    pub data: ReportData,
    pub metadata: ReportMetadata,
}

#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    /// Transaction log connection pool
    pub pool: SqlitePool,
    /// Report endpoint cache, keyed by raw query parameters
    pub report_cache: Arc<ResponseCache<CachedReport>>,
    /// Filter-options endpoint cache
    pub filters_cache: Arc<ResponseCache<FilterOptions>>,
    /// Cancels background tasks on shutdown
    pub shutdown: CancellationToken,
}

impl ServerState {
    /// 初始化服务器状态: open the database, build the caches
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let db = DbService::new(&config.database_path).await?;
        Ok(Self::with_db(config.clone(), db))
    }

    /// Build state around an existing database (tests use the in-memory DB)
    pub fn with_db(config: Config, db: DbService) -> Self {
        let ttl = config.cache_ttl();
        Self {
            config,
            pool: db.pool,
            report_cache: Arc::new(ResponseCache::new(ttl)),
            filters_cache: Arc::new(ResponseCache::new(ttl)),
            shutdown: CancellationToken::new(),
        }
    }

    /// 启动后台任务 (cache sweeper)
    pub fn start_background_tasks(&self) {
        crate::core::tasks::spawn_cache_sweeper(self.clone());
    }

    /// Drop every cached payload (explicit refresh endpoint)
    pub fn invalidate_caches(&self) {
        self.report_cache.clear();
        self.filters_cache.clear();
        tracing::info!("Response caches invalidated");
    }
}
