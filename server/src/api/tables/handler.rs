//! Dining Table API Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{
    DiningTable, DiningTableCreate, Reservation, ReservationCreate, ReservationStatusUpdate,
    TableStatusUpdate,
};
use crate::db::repository::DiningTableRepository;
use crate::reservations::{ReservationScheduler, TableStateMachine};
use crate::utils::time::now_millis;
use crate::utils::{AppError, AppResult};

/// Table envelope
#[derive(Debug, Serialize)]
pub struct TableResponse {
    pub success: bool,
    pub table: DiningTable,
}

/// Reservation creation envelope
#[derive(Debug, Serialize)]
pub struct ReserveResponse {
    pub table: DiningTable,
    pub reservation: Reservation,
}

fn scheduler(state: &ServerState) -> ReservationScheduler {
    let settings = &state.config.reservations;
    ReservationScheduler::new(
        DiningTableRepository::new(state.db.clone()),
        settings.conflict_policy,
        settings.conflict_window_minutes,
        settings.default_duration_minutes,
    )
}

/// GET /api/tables - 获取所有桌台
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<DiningTable>>> {
    let repo = DiningTableRepository::new(state.db.clone());
    let tables = repo.find_all().await?;
    Ok(Json(tables))
}

/// GET /api/tables/:id - 获取单个桌台 (含预约)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<DiningTable>> {
    let repo = DiningTableRepository::new(state.db.clone());
    let table = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Table {} not found", id)))?;
    Ok(Json(table))
}

/// POST /api/tables - 创建桌台 (后台)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<(StatusCode, Json<TableResponse>)> {
    let repo = DiningTableRepository::new(state.db.clone());
    let table = repo.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(TableResponse {
            success: true,
            table,
        }),
    ))
}

/// PATCH /api/tables/:id/status - 员工手动覆盖桌台状态
pub async fn set_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<TableStatusUpdate>,
) -> AppResult<Json<TableResponse>> {
    let machine = TableStateMachine::from_db(state.db.clone());
    let table = machine.set_table_status(&id, payload.status).await?;
    Ok(Json(TableResponse {
        success: true,
        table,
    }))
}

/// POST /api/tables/:id/reserve - 创建预约
///
/// 访客可匿名预约；带令牌时预约归属该用户。
/// 服务端强制冲突检查，撞档返回 409。
pub async fn reserve(
    State(state): State<ServerState>,
    user: Option<Extension<CurrentUser>>,
    Path(id): Path<String>,
    Json(payload): Json<ReservationCreate>,
) -> AppResult<(StatusCode, Json<ReserveResponse>)> {
    let actor = user.as_ref().map(|ext| &ext.0);
    let (table, reservation) = scheduler(&state)
        .create_reservation(&id, payload, actor, now_millis())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ReserveResponse { table, reservation }),
    ))
}

/// PATCH /api/tables/:id/reservations/:reservation_id/status - 员工更新预约状态
pub async fn update_reservation_status(
    State(state): State<ServerState>,
    Path((id, reservation_id)): Path<(String, String)>,
    Json(payload): Json<ReservationStatusUpdate>,
) -> AppResult<Json<TableResponse>> {
    let machine = TableStateMachine::from_db(state.db.clone());
    let table = machine
        .update_reservation_status(&id, &reservation_id, payload.status)
        .await?;
    Ok(Json(TableResponse {
        success: true,
        table,
    }))
}

/// DELETE /api/tables/:id/reservations/:reservation_id - 取消预约 (owner-or-staff)
///
/// 只改状态并重推桌台状态，不做物理删除。
pub async fn cancel_reservation(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path((id, reservation_id)): Path<(String, String)>,
) -> AppResult<Json<TableResponse>> {
    let machine = TableStateMachine::from_db(state.db.clone());
    let table = machine
        .cancel_reservation(&id, &reservation_id, &user)
        .await?;
    Ok(Json(TableResponse {
        success: true,
        table,
    }))
}
