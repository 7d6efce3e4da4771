//! `POST /rooms`

use axum::{extract::State, http::StatusCode, Json};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use twlrelay_core::error::RelayError;

use crate::app_state::AppState;
use crate::http::ApiError;

#[derive(Debug, Deserialize)]
struct CreateRoomReq {
    #[serde(default)]
    password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateRoomResp {
    pub room_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_url: Option<String>,
}

pub async fn create_room(
    State(app): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreateRoomResp>), ApiError> {
    let req: CreateRoomReq = serde_json::from_slice(&body)
        .map_err(|e| RelayError::BadRequest(format!("invalid request body: {e}")))?;

    let room = app.realtime().create_room(&req.password)?;
    let join_url = app
        .cfg()
        .rooms
        .public_ws_base
        .as_deref()
        .map(|base| build_join_url(base, room.id(), &req.password));

    Ok((
        StatusCode::CREATED,
        Json(CreateRoomResp {
            room_id: room.id().to_string(),
            join_url,
        }),
    ))
}

/// Join address with the secret filled in; the caller appends its user id.
pub fn build_join_url(base: &str, room_id: &str, password: &str) -> String {
    format!(
        "{}/rooms/{}/join?password={}&user_id=",
        base.trim_end_matches('/'),
        room_id,
        urlencoding::encode(password)
    )
}
