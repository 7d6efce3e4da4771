use async_trait::async_trait;
use axum::extract::ws::Message;

use twlrelay_core::error::Result;
use twlrelay_core::protocol::envelope::KIND_ALERT;

use crate::dispatch::{FrameService, InboundFrame};
use crate::realtime::{BroadcastSource, RealtimeCtx};

/// Relays alert frames verbatim to the whole room, sender included.
#[derive(Default)]
pub struct AlertService;

impl AlertService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FrameService for AlertService {
    fn kind(&self) -> &'static str {
        KIND_ALERT
    }

    async fn handle(&self, ctx: &RealtimeCtx, frame: &InboundFrame) -> Result<()> {
        tracing::debug!(from = %frame.env.user_id, content = %frame.env.content, "alert received");
        let delivery = ctx
            .publish_room(Message::Text(frame.raw.clone()), BroadcastSource::Alert)
            .await;
        if !delivery.evicted.is_empty() {
            tracing::info!(evicted = ?delivery.evicted, "alert broadcast dropped unreachable clients");
        }
        Ok(())
    }
}
