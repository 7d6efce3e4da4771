//! Shared application state for the relay.
//!
//! Wires RealtimeCore + Dispatcher + metrics and registers the built-in frame
//! services. Startup errors are returned, not panicked on.

use std::sync::Arc;

use twlrelay_core::error::Result;

use crate::config::RelayConfig;
use crate::dispatch::Dispatcher;
use crate::obs::RelayMetrics;
use crate::realtime::RealtimeCore;
use crate::services::{AlertService, LocationService};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    realtime: Arc<RealtimeCore>,
    dispatcher: Arc<Dispatcher>,
    metrics: Arc<RelayMetrics>,
}

struct AppStateInner {
    cfg: RelayConfig,
}

impl AppState {
    pub fn new(cfg: RelayConfig) -> Result<Self> {
        cfg.validate()?;
        let ids = cfg.rooms.id_generator()?;

        let metrics = Arc::new(RelayMetrics::default());
        let realtime = Arc::new(RealtimeCore::new(ids, Arc::clone(&metrics)));

        let dispatcher = Dispatcher::new();
        dispatcher.register(Arc::new(AlertService::new()));
        dispatcher.register(Arc::new(LocationService::new()));
        tracing::debug!(kinds = ?dispatcher.registered_kinds(), "frame services registered");

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg }),
            realtime,
            dispatcher: Arc::new(dispatcher),
            metrics,
        })
    }

    pub fn cfg(&self) -> &RelayConfig {
        &self.inner.cfg
    }

    pub fn realtime(&self) -> Arc<RealtimeCore> {
        Arc::clone(&self.realtime)
    }

    pub fn dispatcher(&self) -> Arc<Dispatcher> {
        Arc::clone(&self.dispatcher)
    }

    pub fn metrics(&self) -> &RelayMetrics {
        &self.metrics
    }

    pub fn is_draining(&self) -> bool {
        self.metrics.is_draining()
    }

    pub fn set_draining(&self) {
        self.metrics.set_draining();
    }

    /// Gauges computed at scrape time.
    pub fn metrics_extra(&self) -> Vec<(&'static str, u64)> {
        let rooms = self.realtime.rooms();
        vec![
            ("twlrelay_rooms_resident", rooms.len() as u64),
            ("twlrelay_clients_connected", rooms.client_count() as u64),
        ]
    }
}
