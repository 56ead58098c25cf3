//! 统一错误处理
//!
//! 提供应用级错误类型和响应结构：
//! - [`AppError`] - 应用错误枚举
//! - [`AppResponse`] - API 响应结构
//!
//! # 错误码规范
//!
//! | 前缀 | 分类 | 示例 |
//! |------|------|------|
//! | E0xxx | 通用错误 | E0003 资源不存在 |
//! | E1xxx | 业务规则错误 | E1001 库存不足 |
//! | E2xxx | 权限错误 | E2001 无权限 |
//! | E3xxx | 认证令牌错误 | E3002 无效令牌 |
//! | E9xxx | 系统错误 | E9002 数据库错误 |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::db::repository::RepoError;
use crate::orders::OrderError;
use crate::promotions::PromotionError;
use crate::reservations::ReservationError;
use crate::stock::StockError;

/// API 统一响应结构
///
/// ```json
/// {
///   "code": "E0000",
///   "message": "Success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    /// 错误码 (E0000 表示成功)
    pub code: String,
    /// 消息
    pub message: String,
    /// 响应数据
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// 应用错误枚举
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== 认证错误 (401) ==========
    #[error("Authentication required")]
    Unauthorized,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    // ========== 权限错误 (403) ==========
    #[error("Permission denied: {0}")]
    Forbidden(String),

    // ========== 通用错误 (4xx) ==========
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource already exists: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    // ========== 业务规则错误 (4xx) ==========
    #[error("{0}")]
    OutOfStock(String),

    #[error("{0}")]
    ProductUnavailable(String),

    #[error("{0}")]
    PromotionNotFound(String),

    #[error("{0}")]
    PromotionExpired(String),

    #[error("{0}")]
    UsageLimitReached(String),

    #[error("{0}")]
    MinimumOrderNotMet(String),

    #[error("{0}")]
    PromotionNotApplicable(String),

    #[error("{0}")]
    TimeConflict(String),

    #[error("{0}")]
    InvalidTransition(String),

    // ========== 系统错误 (5xx) ==========
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // Authentication errors (401)
            AppError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "E3001", "Please login first".to_string())
            }
            AppError::TokenExpired => (StatusCode::UNAUTHORIZED, "E3003", "Token expired".to_string()),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "E3002", "Invalid token".to_string()),

            // Authorization errors (403)
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "E2001", msg.clone()),

            // Not found (404)
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.clone()),
            AppError::PromotionNotFound(msg) => (StatusCode::NOT_FOUND, "E1101", msg.clone()),

            // Conflict (409)
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "E0004", msg.clone()),
            AppError::TimeConflict(msg) => (StatusCode::CONFLICT, "E1201", msg.clone()),

            // Validation (400)
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.clone()),

            // Business rules (400)
            AppError::OutOfStock(msg) => (StatusCode::BAD_REQUEST, "E1001", msg.clone()),
            AppError::ProductUnavailable(msg) => (StatusCode::BAD_REQUEST, "E1002", msg.clone()),
            AppError::PromotionExpired(msg) => (StatusCode::BAD_REQUEST, "E1102", msg.clone()),
            AppError::UsageLimitReached(msg) => (StatusCode::BAD_REQUEST, "E1103", msg.clone()),
            AppError::MinimumOrderNotMet(msg) => (StatusCode::BAD_REQUEST, "E1104", msg.clone()),
            AppError::PromotionNotApplicable(msg) => (StatusCode::BAD_REQUEST, "E1105", msg.clone()),

            // Invalid state transition (422)
            AppError::InvalidTransition(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "E1301", msg.clone())
            }

            // Database errors (500)
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "E9002", "Database error".to_string())
            }

            // Internal errors (500)
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(AppResponse::<()> {
            code: code.to_string(),
            message,
            data: None,
        });

        (status, body).into_response()
    }
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn unauthorized() -> Self {
        Self::Unauthorized
    }

    pub fn token_expired() -> Self {
        Self::TokenExpired
    }

    pub fn invalid_token() -> Self {
        Self::InvalidToken
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

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

// ========== Conversions from domain error types ==========

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl From<StockError> for AppError {
    fn from(e: StockError) -> Self {
        match e {
            StockError::OutOfStock { .. } => AppError::OutOfStock(e.to_string()),
            StockError::Unavailable(_) => AppError::ProductUnavailable(e.to_string()),
            StockError::NotFound(_) => AppError::NotFound(e.to_string()),
            StockError::Repo(repo) => repo.into(),
        }
    }
}

impl From<PromotionError> for AppError {
    fn from(e: PromotionError) -> Self {
        match e {
            PromotionError::NotFound(_) => AppError::PromotionNotFound(e.to_string()),
            PromotionError::Expired(_) => AppError::PromotionExpired(e.to_string()),
            PromotionError::UsageLimitReached(_) => AppError::UsageLimitReached(e.to_string()),
            PromotionError::MinimumOrderNotMet { .. } => AppError::MinimumOrderNotMet(e.to_string()),
            PromotionError::NotApplicable(_) => AppError::PromotionNotApplicable(e.to_string()),
            PromotionError::Repo(repo) => repo.into(),
        }
    }
}

impl From<OrderError> for AppError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::NotFound(_) => AppError::NotFound(e.to_string()),
            OrderError::Forbidden(_) => AppError::Forbidden(e.to_string()),
            OrderError::InvalidTransition { .. } => AppError::InvalidTransition(e.to_string()),
            OrderError::Validation(_) => AppError::Validation(e.to_string()),
            OrderError::Contention(_) => AppError::Conflict(e.to_string()),
            OrderError::Stock(stock) => stock.into(),
            OrderError::Promotion(promo) => promo.into(),
            OrderError::Repo(repo) => repo.into(),
        }
    }
}

impl From<ReservationError> for AppError {
    fn from(e: ReservationError) -> Self {
        match e {
            ReservationError::TableNotFound(_) | ReservationError::NotFound(_) => {
                AppError::NotFound(e.to_string())
            }
            ReservationError::TimeConflict => AppError::TimeConflict(e.to_string()),
            ReservationError::UnderMaintenance(_) => AppError::Validation(e.to_string()),
            ReservationError::InvalidTransition { .. } => AppError::InvalidTransition(e.to_string()),
            ReservationError::Forbidden(_) => AppError::Forbidden(e.to_string()),
            ReservationError::Validation(_) => AppError::Validation(e.to_string()),
            ReservationError::Contention(_) => AppError::Conflict(e.to_string()),
            ReservationError::Repo(repo) => repo.into(),
        }
    }
}

// ========== Helper functions ==========

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: "Success".to_string(),
        data: Some(data),
    })
}
