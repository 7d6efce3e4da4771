//! Producer endpoints: inject a message into a room without joining it.
//!
//! - `POST /produce-notif`          envelope body, room taken from `room_id`
//! - `POST /rooms/:room_id/notify`  raw UTF-8 body relayed verbatim

use axum::{
    extract::{ws::Message, Path, State},
    Json,
};
use bytes::Bytes;
use serde_json::{json, Value};

use twlrelay_core::error::RelayError;
use twlrelay_core::protocol::Envelope;

use crate::app_state::AppState;
use crate::http::ApiError;
use crate::realtime::BroadcastSource;

pub async fn produce_notification(
    State(app): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let env = Envelope::from_slice(&body)?;

    let core = app.realtime();
    let room = core.lookup(&env.room_id)?;
    let text = env.to_json()?;

    core.publish(&room, Message::Text(text), None, BroadcastSource::Producer)
        .await;
    Ok(Json(json!({ "status": "sent", "room_id": room.id() })))
}

pub async fn notify_raw(
    State(app): State<AppState>,
    Path(room_id): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    if body.is_empty() {
        return Err(RelayError::BadRequest("empty notification body".into()).into());
    }
    let text = String::from_utf8(body.to_vec())
        .map_err(|_| RelayError::BadRequest("notification body must be utf-8".into()))?;

    let core = app.realtime();
    let room = core.lookup(&room_id)?;
    core.publish(&room, Message::Text(text), None, BroadcastSource::Producer)
        .await;
    Ok(Json(json!({ "status": "sent", "room_id": room.id() })))
}
