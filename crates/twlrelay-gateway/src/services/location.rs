use async_trait::async_trait;

use twlrelay_core::error::Result;
use twlrelay_core::protocol::envelope::KIND_LOCATION;

use crate::dispatch::{FrameService, InboundFrame};
use crate::realtime::RealtimeCtx;

/// Location updates are observed by the relay only; nothing is broadcast.
#[derive(Default)]
pub struct LocationService;

impl LocationService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FrameService for LocationService {
    fn kind(&self) -> &'static str {
        KIND_LOCATION
    }

    async fn handle(&self, ctx: &RealtimeCtx, frame: &InboundFrame) -> Result<()> {
        tracing::info!(
            room = %ctx.room().id(),
            user = %ctx.user(),
            claimed_user = %frame.env.user_id,
            content = %frame.env.content,
            "location update"
        );
        Ok(())
    }
}
