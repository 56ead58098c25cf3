//! Dining Table API 模块
//!
//! 桌台浏览与预约创建对访客开放；其余操作按角色分层。

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, patch, post},
};

use crate::auth::require_staff;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/tables", routes())
}

fn routes() -> Router<ServerState> {
    // 公开路由 (匿名可用，带令牌则注入用户)
    let public_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/reserve", post(handler::reserve))
        .route("/{id}/reservations", post(handler::reserve));

    // 登录用户路由
    let user_routes = Router::new().route(
        "/{id}/reservations/{reservation_id}",
        delete(handler::cancel_reservation),
    );

    // 员工路由
    let staff_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}/status", patch(handler::set_status))
        .route(
            "/{id}/reservations/{reservation_id}/status",
            patch(handler::update_reservation_status),
        )
        .layer(middleware::from_fn(require_staff));

    public_routes.merge(user_routes).merge(staff_routes)
}
