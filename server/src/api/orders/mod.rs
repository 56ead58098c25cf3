//! Order API 模块

mod handler;

use axum::{Router, middleware, routing::get, routing::patch};

use crate::auth::require_staff;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    let user_routes = Router::new()
        .route("/", axum::routing::post(handler::create).get(handler::list))
        .route("/{id}", get(handler::get_by_id).put(handler::update));

    let staff_routes = Router::new()
        .route("/{id}/status", patch(handler::update_status))
        .layer(middleware::from_fn(require_staff));

    user_routes.merge(staff_routes)
}
