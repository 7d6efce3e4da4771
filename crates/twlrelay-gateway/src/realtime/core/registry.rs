use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use twlrelay_core::error::{RelayError, Result};
use twlrelay_core::room_id::RoomIdGenerator;

use super::room::Room;

/// Fresh ids per `create_room` before giving up on collisions.
const MAX_ID_ATTEMPTS: usize = 8;

/// Process-wide room table: `room_id -> Room`.
///
/// Rooms are never removed; an empty room stays resident until shutdown.
#[derive(Default)]
pub struct RoomRegistry {
    rooms: DashMap<String, Arc<Room>>,
    ids: RoomIdGenerator,
}

impl RoomRegistry {
    pub fn new(ids: RoomIdGenerator) -> Self {
        Self {
            rooms: DashMap::new(),
            ids,
        }
    }

    /// Create an empty room guarded by `secret`.
    pub fn create_room(&self, secret: &str) -> Result<Arc<Room>> {
        if secret.is_empty() {
            return Err(RelayError::BadRequest("password is required".into()));
        }

        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.generate()?;
            match self.rooms.entry(id) {
                Entry::Occupied(e) => {
                    tracing::warn!(room = %e.key(), "room id collision, regenerating");
                }
                Entry::Vacant(e) => {
                    let room = Arc::new(Room::new(e.key().clone(), secret));
                    e.insert(Arc::clone(&room));
                    return Ok(room);
                }
            }
        }
        Err(RelayError::IdGeneration(format!(
            "no free room id after {MAX_ID_ATTEMPTS} attempts"
        )))
    }

    pub fn lookup(&self, room_id: &str) -> Option<Arc<Room>> {
        self.rooms.get(room_id).map(|r| Arc::clone(r.value()))
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Connected clients across all rooms.
    pub fn client_count(&self) -> usize {
        let rooms: Vec<Arc<Room>> = self.rooms.iter().map(|r| Arc::clone(r.value())).collect();
        rooms.iter().map(|r| r.len()).sum()
    }
}
