//! WebSocket join handler and session loop.
//!
//! Responsibilities:
//! - Validate user id, room, and secret *before* the upgrade
//! - Upgrade HTTP -> WS and register the client in its room
//! - Reader loop: decode once, route by kind through the dispatcher
//! - Writer task: drain the connection queue into the socket
//! - Cleanup: membership guard removes the client on every exit path

use std::sync::Arc;

use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, Message, WebSocket, WebSocketUpgrade},
        Path, Query, State,
    },
    response::Response,
};
use futures_util::{
    stream::{SplitSink, SplitStream},
    SinkExt, StreamExt,
};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::Instrument;

use twlrelay_core::error::RelayError;

use crate::app_state::AppState;
use crate::http::ApiError;
use crate::realtime::{Connection, RealtimeCtx, Room};
use crate::transport::codec::{decode, Inbound};

#[derive(Debug, Deserialize)]
pub struct JoinQuery {
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub user_id: String,
}

/// `GET /rooms/:room_id/join?password=..&user_id=..`
pub async fn join_room(
    State(app): State<AppState>,
    Path(room_id): Path<String>,
    Query(q): Query<JoinQuery>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Result<Response, ApiError> {
    let room = match authorize(&app, &room_id, &q) {
        Ok(room) => room,
        Err((reason, e)) => {
            app.metrics().join_rejections.inc(&[("reason", reason)]);
            tracing::debug!(room = %room_id, user = %q.user_id, reason, "join rejected");
            return Err(e.into());
        }
    };

    let ws = ws.map_err(|e| {
        app.metrics().join_rejections.inc(&[("reason", "upgrade")]);
        RelayError::UpgradeFailed(e.to_string())
    })?;

    let user_id = q.user_id;
    let ws = ws.on_failed_upgrade(|e: axum::Error| tracing::warn!(error = %e, "websocket upgrade failed"));
    Ok(ws.on_upgrade(move |socket| {
        let span = tracing::info_span!("session", room = %room.id(), user = %user_id);
        run_session(app, room, user_id, socket).instrument(span)
    }))
}

fn authorize(
    app: &AppState,
    room_id: &str,
    q: &JoinQuery,
) -> Result<Arc<Room>, (&'static str, RelayError)> {
    if q.user_id.is_empty() {
        return Err((
            "missing_user",
            RelayError::BadRequest("user_id is required".into()),
        ));
    }
    let room = app
        .realtime()
        .lookup(room_id)
        .map_err(|e| ("unknown_room", e))?;
    if !room.verify_secret(&q.password) {
        return Err(("bad_secret", RelayError::InvalidSecret));
    }
    Ok(room)
}

// --------------------
// Session
// --------------------
async fn run_session(app: AppState, room: Arc<Room>, user_id: String, socket: WebSocket) {
    let (ws_tx, ws_rx) = socket.split();
    let (out_tx, out_rx) = mpsc::channel::<Message>(app.cfg().gateway.outbound_queue);
    let conn = Connection::new(out_tx);

    let membership = room.enter(user_id.clone(), conn.clone());
    let active = app.metrics().sessions_active.track(&[]);
    tracing::info!(conn = conn.id(), "user joined room");

    let writer = tokio::spawn(write_loop(ws_tx, out_rx).in_current_span());
    let ctx = RealtimeCtx::new(Arc::clone(&room), user_id, app.realtime());

    read_loop(&app, &ctx, &conn, ws_rx, writer).await;

    drop(membership);
    drop(active);
}

async fn read_loop(
    app: &AppState,
    ctx: &RealtimeCtx,
    conn: &Connection,
    mut ws_rx: SplitStream<WebSocket>,
    mut writer: tokio::task::JoinHandle<()>,
) {
    let dispatcher = app.dispatcher();

    loop {
        tokio::select! {
            _ = conn.closed() => {
                tracing::debug!("connection closed by relay");
                break;
            }

            _ = &mut writer => {
                tracing::debug!("writer finished");
                break;
            }

            incoming = ws_rx.next() => {
                let msg = match incoming {
                    Some(Ok(msg)) => msg,
                    Some(Err(e)) => {
                        tracing::info!(error = %e, "read error");
                        break;
                    }
                    None => break,
                };

                let frame = match decode(msg) {
                    Ok(Inbound::Frame(frame)) => frame,
                    Ok(Inbound::Close) => break,
                    Ok(Inbound::Ping | Inbound::Pong) => continue,
                    Err(e) => {
                        app.metrics().decode_errors.inc(&[]);
                        tracing::debug!(error = %e, "discarding malformed frame");
                        continue;
                    }
                };

                let kind = frame.kind();
                app.metrics().frames_received.inc(&[("kind", known_kind_label(kind.as_str()))]);

                match dispatcher.dispatch(ctx, &frame).await {
                    Ok(()) => {}
                    Err(RelayError::UnknownKind(k)) => {
                        tracing::warn!(kind = %k, from = %frame.env.user_id, "unknown message type");
                    }
                    Err(e) => {
                        tracing::warn!(kind = %kind.as_str(), error = %e, "frame handling failed");
                    }
                }
            }
        }
    }

    writer.abort();
}

// Keeps label cardinality bounded whatever clients put in `type`.
fn known_kind_label(kind: &str) -> &str {
    match kind {
        twlrelay_core::protocol::envelope::KIND_ALERT
        | twlrelay_core::protocol::envelope::KIND_LOCATION => kind,
        _ => "unrecognized",
    }
}

async fn write_loop(
    mut ws_tx: SplitSink<WebSocket, Message>,
    mut out_rx: mpsc::Receiver<Message>,
) {
    while let Some(msg) = out_rx.recv().await {
        if let Err(e) = ws_tx.send(msg).await {
            tracing::debug!(error = %e, "socket write failed");
            return;
        }
    }
    let _ = ws_tx.close().await;
}
