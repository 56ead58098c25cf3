//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`orders`] - 下单与订单生命周期
//! - [`promotions`] - 优惠码校验
//! - [`tables`] - 桌台与预约

pub mod health;
pub mod orders;
pub mod promotions;
pub mod tables;

use axum::Router;

use crate::core::ServerState;

/// Assemble every resource router under one application router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(orders::router())
        .merge(promotions::router())
        .merge(tables::router())
        .with_state(state)
}
