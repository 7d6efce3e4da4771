//! Decode-once codec for the transport layer.
//!
//! - Text frames => `InboundFrame` (envelope + original text)
//! - Binary frames => same, after UTF-8 validation
//! - Ping/Pong/Close are surfaced for lifecycle management

use axum::extract::ws::Message;
use twlrelay_core::{
    error::{RelayError, Result},
    protocol::Envelope,
};

use crate::dispatch::InboundFrame;

#[derive(Debug)]
pub enum Inbound {
    Frame(InboundFrame),
    Ping,
    Pong,
    Close,
}

pub fn decode(msg: Message) -> Result<Inbound> {
    match msg {
        Message::Text(raw) => {
            let env = Envelope::from_json(&raw)?;
            Ok(Inbound::Frame(InboundFrame { env, raw }))
        }
        Message::Binary(b) => {
            let raw = String::from_utf8(b)
                .map_err(|e| RelayError::BadRequest(format!("binary frame is not utf-8: {e}")))?;
            let env = Envelope::from_json(&raw)?;
            Ok(Inbound::Frame(InboundFrame { env, raw }))
        }
        Message::Ping(_) => Ok(Inbound::Ping),
        Message::Pong(_) => Ok(Inbound::Pong),
        Message::Close(_) => Ok(Inbound::Close),
    }
}
