use std::sync::Arc;
use std::time::Instant;

use axum::extract::ws::Message;

use twlrelay_core::error::{RelayError, Result};
use twlrelay_core::room_id::RoomIdGenerator;

use crate::obs::RelayMetrics;
use crate::realtime::types::BroadcastSource;

use super::registry::RoomRegistry;
use super::room::Room;

/// Outcome of one broadcast pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Members in the snapshot after exclusion.
    pub recipients: usize,
    /// Frames accepted into a recipient's outbound queue.
    pub delivered: usize,
    /// Users removed because their write failed.
    pub evicted: Vec<String>,
}

/// RealtimeCore: room registry plus the broadcast engine.
pub struct RealtimeCore {
    rooms: RoomRegistry,
    metrics: Arc<RelayMetrics>,
}

impl RealtimeCore {
    pub fn new(ids: RoomIdGenerator, metrics: Arc<RelayMetrics>) -> Self {
        Self {
            rooms: RoomRegistry::new(ids),
            metrics,
        }
    }

    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }

    pub fn metrics(&self) -> &RelayMetrics {
        &self.metrics
    }

    pub fn create_room(&self, secret: &str) -> Result<Arc<Room>> {
        let room = self.rooms.create_room(secret)?;
        self.metrics.rooms_created.inc(&[]);
        tracing::info!(room = %room.id(), "room created");
        Ok(room)
    }

    pub fn lookup(&self, room_id: &str) -> Result<Arc<Room>> {
        self.rooms.lookup(room_id).ok_or(RelayError::RoomNotFound)
    }

    /// Best-effort serial fan-out of `msg` to the room.
    ///
    /// Works on a snapshot taken under the room lock; writes happen with the
    /// lock released. A "write" is an enqueue onto the member's outbound
    /// queue: a member whose queue is gone is removed from the room and its
    /// connection closed, and the pass carries on with the rest. A dead socket
    /// behind a live queue is not seen here; that member leaves when its own
    /// session ends (reader failure or writer task exit).
    pub async fn publish(
        &self,
        room: &Room,
        msg: Message,
        exclude: Option<&str>,
        source: BroadcastSource,
    ) -> Delivery {
        let started = Instant::now();
        let targets: Vec<_> = room
            .snapshot()
            .into_iter()
            .filter(|(user, _)| Some(user.as_str()) != exclude)
            .collect();

        let mut delivery = Delivery {
            recipients: targets.len(),
            ..Delivery::default()
        };

        for (user, conn) in targets {
            match conn.send(msg.clone()).await {
                Ok(()) => delivery.delivered += 1,
                Err(e) => {
                    tracing::warn!(room = %room.id(), user = %user, error = %e, "send failed, removing client");
                    room.leave_connection(&user, conn.id());
                    conn.close();
                    self.metrics.evictions.inc(&[]);
                    delivery.evicted.push(user);
                }
            }
        }

        let labels = [("source", source.as_str())];
        self.metrics.broadcasts.inc(&labels);
        self.metrics.deliveries.add(&labels, delivery.delivered as u64);
        self.metrics.broadcast_duration.observe(&labels, started.elapsed());
        tracing::debug!(
            room = %room.id(),
            source = source.as_str(),
            recipients = delivery.recipients,
            delivered = delivery.delivered,
            evicted = delivery.evicted.len(),
            "broadcast finished"
        );
        delivery
    }
}

/// Per-session context passed to frame services.
#[derive(Clone)]
pub struct RealtimeCtx {
    room: Arc<Room>,
    user: Arc<str>,
    core: Arc<RealtimeCore>,
}

impl RealtimeCtx {
    pub fn new(room: Arc<Room>, user: impl Into<Arc<str>>, core: Arc<RealtimeCore>) -> Self {
        Self {
            room,
            user: user.into(),
            core,
        }
    }

    pub fn room(&self) -> &Room {
        &self.room
    }
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Broadcast to every member of this session's room, sender included.
    pub async fn publish_room(&self, msg: Message, source: BroadcastSource) -> Delivery {
        self.core.publish(&self.room, msg, None, source).await
    }
}
