//! Promotion API Handlers

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use crate::core::ServerState;
use crate::db::models::Promotion;
use crate::db::repository::parse_record_id;
use crate::promotions::PromotionEngine;
use crate::utils::time::now_millis;
use crate::utils::{AppError, AppResult};

/// Validate promotion request
#[derive(Debug, Deserialize)]
pub struct ValidatePromotionRequest {
    pub code: String,
    /// Pre-discount subtotal in minor currency units
    pub order_amount: i64,
    /// Product IDs in the cart ("product:xxx"); empty skips applicability
    pub product_ids: Option<Vec<String>>,
}

/// Validate promotion response
#[derive(Debug, Serialize)]
pub struct ValidatePromotionResponse {
    pub success: bool,
    pub promotion: Promotion,
    pub discount: i64,
}

/// POST /api/promotions/validate - 校验优惠码并计算折扣 (只读)
pub async fn validate(
    State(state): State<ServerState>,
    Json(payload): Json<ValidatePromotionRequest>,
) -> AppResult<Json<ValidatePromotionResponse>> {
    let product_ids = payload
        .product_ids
        .unwrap_or_default()
        .iter()
        .map(|id| parse_record_id("product", id))
        .collect::<Result<Vec<RecordId>, _>>()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let engine = PromotionEngine::new(state.db.clone());
    let validated = engine
        .validate(&payload.code, payload.order_amount, &product_ids, now_millis())
        .await?;

    Ok(Json(ValidatePromotionResponse {
        success: true,
        promotion: validated.promotion,
        discount: validated.discount,
    }))
}
