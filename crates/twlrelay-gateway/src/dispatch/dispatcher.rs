use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use twlrelay_core::error::{RelayError, Result};
use twlrelay_core::protocol::{Envelope, MessageKind};

use crate::realtime::RealtimeCtx;

/// One decoded text frame: the parsed envelope plus the text it came from.
#[derive(Debug, Clone)]
pub struct InboundFrame {
    pub env: Envelope,
    pub raw: String,
}

impl InboundFrame {
    pub fn kind(&self) -> MessageKind {
        self.env.kind()
    }
}

/// Handler for one frame kind (the envelope's `type`).
#[async_trait]
pub trait FrameService: Send + Sync {
    fn kind(&self) -> &'static str;
    async fn handle(&self, ctx: &RealtimeCtx, frame: &InboundFrame) -> Result<()>;
}

/// Registry and dispatcher for frame services, keyed by kind.
#[derive(Default)]
pub struct Dispatcher {
    services: DashMap<&'static str, Arc<dyn FrameService>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            services: DashMap::new(),
        }
    }

    pub fn register(&self, svc: Arc<dyn FrameService>) {
        self.services.insert(svc.kind(), svc);
    }

    pub fn registered_kinds(&self) -> Vec<&'static str> {
        let mut kinds: Vec<_> = self.services.iter().map(|e| *e.key()).collect();
        kinds.sort_unstable();
        kinds
    }

    pub async fn dispatch(&self, ctx: &RealtimeCtx, frame: &InboundFrame) -> Result<()> {
        let kind = frame.env.msg_type.as_str();
        let handler = self
            .services
            .get(kind)
            .map(|e| Arc::clone(e.value()))
            .ok_or_else(|| RelayError::UnknownKind(kind.to_string()))?;
        handler.handle(ctx, frame).await
    }
}
