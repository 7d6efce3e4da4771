//! Realtime core components.
//!
//! Room registry, room membership, and the broadcast engine/context shared
//! across frame services and producer handlers.

mod realtime;
mod registry;
mod room;

pub use realtime::{Delivery, RealtimeCore, RealtimeCtx};
pub use registry::RoomRegistry;
pub use room::{Membership, Room};
