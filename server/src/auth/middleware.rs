//! 认证中间件
//!
//! 为 JWT 认证和授权提供 Axum 中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::AppError;
use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;

/// 认证中间件
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT。
/// 验证成功后将 [`CurrentUser`] 注入请求扩展。
///
/// # 公开路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径 (如 /health)
/// - 桌台浏览与预约创建 (见 [`is_public_api_route`]) —
///   匿名可用，但带有效令牌时仍会注入用户
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // 允许 CORS 预检的 OPTIONS 请求 (跳过认证)
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // 非 API 路由跳过认证 (让它们正常返回 404)
    let path = req.uri().path().to_string();
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    let is_public = is_public_api_route(req.method(), &path);

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(|h| h.to_string());

    let token = match auth_header {
        Some(header) => match JwtService::extract_from_header(&header) {
            Some(token) => token.to_string(),
            None => return Err(AppError::invalid_token()),
        },
        None if is_public => return Ok(next.run(req).await),
        None => {
            tracing::warn!(target: "security", uri = %req.uri(), "missing authorization header");
            return Err(AppError::unauthorized());
        }
    };

    // 验证令牌 — 公开路径上无效令牌同样拒绝
    match state.jwt_service.validate_token(&token) {
        Ok(claims) => {
            let user = CurrentUser::from(claims);
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(
                target: "security",
                error = %e,
                uri = %req.uri(),
                "token validation failed"
            );
            match e {
                crate::auth::JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token()),
            }
        }
    }
}

/// 访客可用的 API 路径
///
/// 预约在登录前就能创建 (归属靠联系邮箱匹配)，桌台列表对外可见。
fn is_public_api_route(method: &http::Method, path: &str) -> bool {
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    match segments.as_slice() {
        ["api", "tables"] | ["api", "tables", _] => method == http::Method::GET,
        ["api", "tables", _, "reserve"] | ["api", "tables", _, "reservations"] => {
            method == http::Method::POST
        }
        _ => false,
    }
}

/// 员工中间件 - 要求 staff 或 admin 角色
///
/// # 错误
///
/// 非员工返回 403 Forbidden
pub async fn require_staff(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::unauthorized())?;

    if !user.is_staff() {
        tracing::warn!(
            target: "security",
            user_id = %user.id,
            role = user.role.as_str(),
            "staff role required"
        );
        return Err(AppError::forbidden("Staff role required"));
    }

    Ok(next.run(req).await)
}
