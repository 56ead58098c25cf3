//! Order API Handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Order, OrderCreate, OrderStatus, OrderStatusUpdate};
use crate::orders::OrderService;
use crate::utils::time::now_millis;
use crate::utils::{AppError, AppResult};

/// Order envelope
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub success: bool,
    pub order: Order,
}

/// Query params for listing orders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// POST /api/orders - 下单 (结账)
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<(StatusCode, Json<OrderResponse>)> {
    let service = OrderService::from_db(state.db.clone());
    let order = service.create_order(&user, payload, now_millis()).await?;
    Ok((
        StatusCode::CREATED,
        Json(OrderResponse {
            success: true,
            order,
        }),
    ))
}

/// GET /api/orders - 订单列表 (员工看全部，顾客看自己的)
pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let service = OrderService::from_db(state.db.clone());
    let orders = service
        .list_orders(&user, query.limit.clamp(1, 200), query.offset.max(0))
        .await?;
    Ok(Json(orders))
}

/// GET /api/orders/:id - 获取单个订单 (owner-or-staff)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let service = OrderService::from_db(state.db.clone());
    let order = service.get_order(&user, &id).await?;
    Ok(Json(order))
}

/// PATCH /api/orders/:id/status - 员工更新订单状态
pub async fn update_status(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<OrderResponse>> {
    let service = OrderService::from_db(state.db.clone());
    let order = service
        .update_status(&user, &id, payload.status, now_millis())
        .await?;
    Ok(Json(OrderResponse {
        success: true,
        order,
    }))
}

/// Owner update payload — the only supported mutation is cancellation
#[derive(Debug, Deserialize)]
pub struct OrderUpdateRequest {
    pub status: Option<OrderStatus>,
}

/// PUT /api/orders/:id - 顾客取消自己的订单
pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<OrderUpdateRequest>,
) -> AppResult<Json<OrderResponse>> {
    match payload.status {
        Some(OrderStatus::Cancelled) => {}
        _ => {
            return Err(AppError::validation(
                "Only { \"status\": \"CANCELLED\" } is supported on this endpoint",
            ));
        }
    }

    let service = OrderService::from_db(state.db.clone());
    let order = service.cancel_order(&user, &id, now_millis()).await?;
    Ok(Json(OrderResponse {
        success: true,
        order,
    }))
}
