//! Axum router wiring.
//!
//! Room lifecycle, WebSocket join, producer notifications, and ops endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use crate::{app_state::AppState, http, ops, transport};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/rooms", post(http::rooms::create_room))
        .route("/rooms/:room_id/join", get(transport::ws::join_room))
        .route("/rooms/:room_id/notify", post(http::notify::notify_raw))
        .route("/produce-notif", post(http::notify::produce_notification))
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics))
        .with_state(state)
}
