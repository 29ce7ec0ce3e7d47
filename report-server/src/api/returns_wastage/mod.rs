//! Returns & Wastage API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/returns-wastage | GET | full analytics report |
//! | /api/returns-wastage | POST | invalidate cached reports |
//! | /api/returns-wastage/filters | GET | filter options for the dashboard |

pub mod handler;

use axum::{
    Router,
    routing::get,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/returns-wastage", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::get_report).post(handler::refresh))
        .route("/filters", get(handler::get_filters))
}
