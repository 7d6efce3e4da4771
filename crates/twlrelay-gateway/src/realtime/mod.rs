//! Realtime runtime for the relay.
//!
//! Room registry, per-room membership, connection handles, and the broadcast
//! engine shared by sessions and producers.

pub mod core;
pub mod types;

pub use core::{Delivery, Membership, RealtimeCore, RealtimeCtx, Room, RoomRegistry};
pub use types::{BroadcastSource, Connection};
