//! 统一错误处理
//!
//! Application error type and the JSON error body every failing endpoint
//! returns:
//!
//! ```json
//! {
//!   "success": false,
//!   "error": "query_timeout",
//!   "message": "...",
//!   "hint": "..."
//! }
//! ```
//!
//! Unresolvable date-range tokens are NOT errors — they fall back to a
//! default range in the resolver, so no variant exists for them.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// Application error enum
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Any failure reaching the transaction log (connectivity, bad scope)
    #[error("Database error: {0}")]
    Database(String),

    /// The aggregation query exceeded the execution-time budget
    #[error("Query exceeded the execution-time budget")]
    QueryTimeout,

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// JSON body for error responses
#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message, hint) = match &self {
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, "not_found", msg.clone(), None)
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "validation_error", msg.clone(), None)
            }
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                // Raw message is attached for diagnostics
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    msg.clone(),
                    None,
                )
            }
            AppError::QueryTimeout => {
                error!(target: "database", "Aggregation query exceeded the execution budget");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "query_timeout",
                    self.to_string(),
                    Some(
                        "Consider adding an index on (trx_type, trx_date) or narrowing the date range"
                            .to_string(),
                    ),
                )
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorBody {
            success: false,
            error: error_type.to_string(),
            message,
            hint,
        });

        (status, body).into_response()
    }
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Database(e.to_string())
    }
}

/// Result type for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn query_timeout_carries_a_hint() {
        let (status, body) = body_json(AppError::QueryTimeout).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "query_timeout");
        assert!(body["hint"].as_str().unwrap().contains("index"));
    }

    #[tokio::test]
    async fn database_error_attaches_raw_message() {
        let (status, body) = body_json(AppError::database("no such table: transaction_line")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "database_error");
        assert_eq!(body["message"], "no such table: transaction_line");
        assert!(body.get("hint").is_none());
    }

    #[tokio::test]
    async fn internal_error_hides_details() {
        let (_, body) = body_json(AppError::internal("secret stack trace")).await;
        assert_eq!(body["message"], "An internal error occurred");
    }
}
