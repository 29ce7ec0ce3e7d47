use std::time::Duration;

use crate::utils::time::parse_timezone;

/// 服务器配置 - 所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | DATABASE_PATH | data/transactions.db | SQLite transaction log |
/// | TIMEZONE | Asia/Dubai | business timezone for "today" |
/// | CURRENCY_CODE | AED | currency attached to monetary summaries |
/// | QUERY_TIMEOUT_MS | 120000 | aggregation execution budget |
/// | CACHE_TTL_MS | 300000 | response cache TTL |
/// | ENVIRONMENT | development | 运行环境 |
///
/// # 示例
///
/// ```ignore
/// DATABASE_PATH=/data/transactions.db HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// Path of the SQLite transaction log
    pub database_path: String,
    /// Business timezone used to resolve symbolic date ranges
    pub timezone: chrono_tz::Tz,
    /// Three-letter currency code attached to every monetary summary
    pub currency_code: String,
    /// Hard execution-time budget for the aggregation queries (毫秒)
    pub query_timeout_ms: u64,
    /// Response cache TTL (毫秒)
    pub cache_ttl_ms: u64,
    /// 运行环境: development | staging | production
    pub environment: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "data/transactions.db".into()),
            timezone: parse_timezone(
                &std::env::var("TIMEZONE").unwrap_or_else(|_| "Asia/Dubai".into()),
            ),
            currency_code: std::env::var("CURRENCY_CODE").unwrap_or_else(|_| "AED".into()),
            query_timeout_ms: std::env::var("QUERY_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(120_000),
            cache_ttl_ms: std::env::var("CACHE_TTL_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(300_000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// Execution budget for a single aggregation run
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    /// Freshness window of cached reports
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
