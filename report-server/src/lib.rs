//! Returns & Wastage Report Server
//!
//! # 架构概述
//!
//! Read-only analytics service over an append-only sales transaction log:
//! resolves a symbolic date range plus dimension filters into a query
//! scope, computes a multi-faceted returns/wastage report, and caches the
//! result per filter combination.
//!
//! # 模块结构
//!
//! ```text
//! report-server/src/
//! ├── core/      # 配置、状态、服务器、后台任务
//! ├── api/       # HTTP 路由和处理器
//! ├── engine/    # date ranges, filter criteria, aggregation, shaping
//! ├── cache/     # TTL response cache
//! ├── db/        # 数据库层 (SQLite transaction log)
//! └── utils/     # 错误、日志、时间工具
//! ```

pub mod api;
pub mod cache;
pub mod core;
pub mod db;
pub mod engine;
pub mod utils;

// Re-export 公共类型
pub use cache::ResponseCache;
pub use crate::core::{CachedReport, Config, Server, ServerState};
pub use engine::{ALL, FilterCriteria};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置环境 (dotenv + 日志)
pub fn setup_environment() {
    dotenv::dotenv().ok();
    init_logger();
}
