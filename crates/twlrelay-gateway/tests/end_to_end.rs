//! Full relay over real sockets: HTTP room creation, WebSocket sessions,
//! alert fan-out, disconnect cleanup, and producer injection.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio_tungstenite::{tungstenite::Message, MaybeTlsStream, WebSocketStream};

use twlrelay_gateway::app_state::AppState;
use twlrelay_gateway::config::RelayConfig;
use twlrelay_gateway::realtime::Room;
use twlrelay_gateway::router::build_router;

type WsClient = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

async fn start_server() -> (AppState, SocketAddr) {
    let state = AppState::new(RelayConfig::default()).unwrap();
    let app = build_router(state.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (state, addr)
}

async fn create_room(addr: SocketAddr, password: &str) -> String {
    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/rooms"))
        .json(&json!({ "password": password }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    body["room_id"].as_str().unwrap().to_string()
}

async fn join(addr: SocketAddr, room: &str, password: &str, user: &str) -> WsClient {
    let url = format!("ws://{addr}/rooms/{room}/join?password={password}&user_id={user}");
    let (ws, _) = tokio_tungstenite::connect_async(url).await.unwrap();
    ws
}

async fn wait_until(mut cond: impl FnMut() -> bool) {
    for _ in 0..300 {
        if cond() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not met in time");
}

async fn next_text(ws: &mut WsClient) -> String {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(3), ws.next())
            .await
            .expect("timed out waiting for frame")
            .expect("stream ended")
            .expect("ws error");
        if let Message::Text(s) = msg {
            return s;
        }
    }
}

async fn assert_silent(ws: &mut WsClient) {
    let res = tokio::time::timeout(Duration::from_millis(200), ws.next()).await;
    assert!(res.is_err(), "unexpected frame: {res:?}");
}

fn room(state: &AppState, id: &str) -> std::sync::Arc<Room> {
    state.realtime().rooms().lookup(id).unwrap()
}

#[tokio::test]
async fn alice_and_bob() {
    let (state, addr) = start_server().await;
    let id = create_room(addr, "s3cret").await;
    let r = room(&state, &id);

    let mut alice = join(addr, &id, "s3cret", "alice").await;
    let mut bob = join(addr, &id, "s3cret", "bob").await;
    wait_until(|| r.len() == 2).await;
    assert_eq!(r.members(), vec!["alice".to_string(), "bob".to_string()]);

    alice
        .send(Message::Text(r#"{"type":"alert","content":"hi"}"#.into()))
        .await
        .unwrap();
    assert!(next_text(&mut bob).await.contains("hi"));
    assert!(next_text(&mut alice).await.contains("hi"));

    bob.close(None).await.unwrap();
    wait_until(|| !r.contains("bob")).await;
    assert_eq!(r.len(), 1);

    alice
        .send(Message::Text(r#"{"type":"alert","content":"again"}"#.into()))
        .await
        .unwrap();
    assert!(next_text(&mut alice).await.contains("again"));

    // 2 deliveries for the first alert, 1 for the second.
    let metrics = state.metrics();
    wait_until(|| metrics.deliveries.get(&[("source", "alert")]) == 3).await;
    assert_eq!(metrics.broadcasts.get(&[("source", "alert")]), 2);
}

#[tokio::test]
async fn location_and_junk_frames_are_not_relayed() {
    let (state, addr) = start_server().await;
    let id = create_room(addr, "pw").await;
    let r = room(&state, &id);

    let mut alice = join(addr, &id, "pw", "alice").await;
    let mut bob = join(addr, &id, "pw", "bob").await;
    wait_until(|| r.len() == 2).await;

    for frame in [
        r#"{"type":"location","content":"1,2"}"#,
        r#"{"type":"mystery","content":"?"}"#,
        "definitely not json",
    ] {
        alice.send(Message::Text(frame.into())).await.unwrap();
    }
    assert_silent(&mut bob).await;

    // Session survives the junk.
    alice
        .send(Message::Text(r#"{"type":"alert","content":"still here"}"#.into()))
        .await
        .unwrap();
    assert!(next_text(&mut bob).await.contains("still here"));

    let metrics = state.metrics();
    assert_eq!(metrics.frames_received.get(&[("kind", "location")]), 1);
    assert_eq!(metrics.frames_received.get(&[("kind", "unrecognized")]), 1);
    assert_eq!(metrics.decode_errors.get(&[]), 1);
}

#[tokio::test]
async fn wrong_password_gets_http_error() {
    let (state, addr) = start_server().await;
    let id = create_room(addr, "pw").await;

    let url = format!("ws://{addr}/rooms/{id}/join?password=nope&user_id=mallory");
    match tokio_tungstenite::connect_async(url).await {
        Err(tokio_tungstenite::tungstenite::Error::Http(resp)) => {
            assert_eq!(resp.status().as_u16(), 403);
        }
        Err(e) => panic!("expected http error, got {e:?}"),
        Ok(_) => panic!("join with a wrong password must not upgrade"),
    }
    assert!(room(&state, &id).is_empty());
}

#[tokio::test]
async fn producer_reaches_connected_clients() {
    let (state, addr) = start_server().await;
    let id = create_room(addr, "pw").await;
    let r = room(&state, &id);

    let mut alice = join(addr, &id, "pw", "alice").await;
    wait_until(|| r.len() == 1).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/produce-notif"))
        .json(&json!({ "room_id": id, "user_id": "ops", "type": "alert", "content": "deploy" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);

    let v: Value = serde_json::from_str(&next_text(&mut alice).await).unwrap();
    assert_eq!(v["content"], "deploy");

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/produce-notif"))
        .json(&json!({ "room_id": "twl-server-00000000", "type": "alert", "content": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
    assert_silent(&mut alice).await;
}

#[tokio::test]
async fn rejoin_supersedes_and_old_session_cleanup_keeps_new_one() {
    let (state, addr) = start_server().await;
    let id = create_room(addr, "pw").await;
    let r = room(&state, &id);

    let mut first = join(addr, &id, "pw", "alice").await;
    wait_until(|| r.len() == 1).await;
    let first_conn = r.connection_id("alice").unwrap();

    let mut second = join(addr, &id, "pw", "alice").await;
    wait_until(|| r.connection_id("alice") != Some(first_conn)).await;
    assert_eq!(r.len(), 1);

    first.close(None).await.unwrap();
    // Give the old session time to run its cleanup.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(r.contains("alice"));

    second
        .send(Message::Text(r#"{"type":"alert","content":"me again"}"#.into()))
        .await
        .unwrap();
    assert!(next_text(&mut second).await.contains("me again"));
}

#[tokio::test]
async fn binary_frames_are_decoded_like_text() {
    let (state, addr) = start_server().await;
    let id = create_room(addr, "pw").await;
    let r = room(&state, &id);

    let mut alice = join(addr, &id, "pw", "alice").await;
    let mut bob = join(addr, &id, "pw", "bob").await;
    wait_until(|| r.len() == 2).await;

    // Not UTF-8: discarded, session keeps running.
    alice.send(Message::Binary(vec![0xff, 0xfe])).await.unwrap();
    alice
        .send(Message::Binary(
            br#"{"type":"alert","content":"bin"}"#.to_vec(),
        ))
        .await
        .unwrap();

    assert_eq!(next_text(&mut bob).await, r#"{"type":"alert","content":"bin"}"#);
    assert!(r.contains("alice"));

    let metrics = state.metrics();
    assert_eq!(metrics.decode_errors.get(&[]), 1);
    assert_eq!(metrics.frames_received.get(&[("kind", "alert")]), 1);
}

#[tokio::test]
async fn relay_close_ends_a_live_session() {
    let (state, addr) = start_server().await;
    let id = create_room(addr, "pw").await;
    let r = room(&state, &id);

    let mut alice = join(addr, &id, "pw", "alice").await;
    let mut bob = join(addr, &id, "pw", "bob").await;
    wait_until(|| r.len() == 2).await;

    let (_, handle) = r
        .snapshot()
        .into_iter()
        .find(|(user, _)| user == "bob")
        .unwrap();
    handle.close();

    wait_until(|| !r.contains("bob")).await;
    wait_until(|| state.metrics().sessions_active.get(&[]) == 1).await;

    // Bob's stream ends: no further text frames, only close/reset/eof.
    loop {
        let next = tokio::time::timeout(Duration::from_secs(3), bob.next())
            .await
            .expect("socket was not closed");
        match next {
            None | Some(Err(_)) | Some(Ok(Message::Close(_))) => break,
            Some(Ok(Message::Text(s))) => panic!("unexpected text after close: {s}"),
            Some(Ok(_)) => continue,
        }
    }

    alice
        .send(Message::Text(r#"{"type":"alert","content":"solo"}"#.into()))
        .await
        .unwrap();
    assert!(next_text(&mut alice).await.contains("solo"));
    assert_eq!(r.members(), vec!["alice".to_string()]);
}

#[tokio::test]
async fn dropped_peer_leaves_after_its_session_ends() {
    let (state, addr) = start_server().await;
    let id = create_room(addr, "pw").await;
    let r = room(&state, &id);

    let mut alice = join(addr, &id, "pw", "alice").await;
    let bob = join(addr, &id, "pw", "bob").await;
    wait_until(|| r.len() == 2).await;

    // Socket gone without a close handshake; the queue is still open until
    // bob's session notices.
    drop(bob);
    wait_until(|| !r.contains("bob")).await;

    alice
        .send(Message::Text(r#"{"type":"alert","content":"after"}"#.into()))
        .await
        .unwrap();
    assert!(next_text(&mut alice).await.contains("after"));
    assert_eq!(r.len(), 1);
    wait_until(|| state.metrics().sessions_active.get(&[]) == 1).await;
}
