use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::realtime::types::Connection;

/// One secret-gated broadcast domain.
///
/// The client map sits behind a single mutex; every accessor copies what it
/// needs and releases the lock before returning, so no caller ever holds it
/// across an await point or a socket write.
#[derive(Debug)]
pub struct Room {
    id: String,
    secret: String,
    clients: Mutex<HashMap<String, Connection>>,
}

impl Room {
    pub fn new(id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            secret: secret.into(),
            clients: Mutex::new(HashMap::new()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Byte-for-byte comparison with the room secret.
    pub fn verify_secret(&self, candidate: &str) -> bool {
        self.secret.as_bytes() == candidate.as_bytes()
    }

    // Critical sections never panic, so a poisoned map is still consistent.
    fn clients(&self) -> MutexGuard<'_, HashMap<String, Connection>> {
        self.clients.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `user`, returning the handle it supersedes (left open).
    pub fn join(&self, user: impl Into<String>, conn: Connection) -> Option<Connection> {
        self.clients().insert(user.into(), conn)
    }

    /// Remove `user` whatever connection it holds. No-op if absent.
    pub fn leave(&self, user: &str) -> Option<Connection> {
        self.clients().remove(user)
    }

    /// Remove `user` only if its current entry is connection `conn_id`.
    pub fn leave_connection(&self, user: &str, conn_id: u64) -> bool {
        let mut clients = self.clients();
        match clients.get(user) {
            Some(current) if current.id() == conn_id => {
                clients.remove(user);
                true
            }
            _ => false,
        }
    }

    /// Point-in-time copy of the membership.
    pub fn snapshot(&self) -> Vec<(String, Connection)> {
        self.clients()
            .iter()
            .map(|(u, c)| (u.clone(), c.clone()))
            .collect()
    }

    pub fn members(&self) -> Vec<String> {
        let mut users: Vec<String> = self.clients().keys().cloned().collect();
        users.sort();
        users
    }

    pub fn contains(&self, user: &str) -> bool {
        self.clients().contains_key(user)
    }

    /// Id of the connection currently registered for `user`.
    pub fn connection_id(&self, user: &str) -> Option<u64> {
        self.clients().get(user).map(Connection::id)
    }

    pub fn len(&self) -> usize {
        self.clients().len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients().is_empty()
    }

    /// Join and return a guard that undoes the registration when dropped.
    pub fn enter(self: &Arc<Self>, user: impl Into<String>, conn: Connection) -> Membership {
        let user = user.into();
        if let Some(old) = self.join(user.clone(), conn.clone()) {
            tracing::info!(
                room = %self.id,
                user = %user,
                superseded = old.id(),
                "user re-joined; previous connection left to expire"
            );
        }
        Membership {
            room: Arc::clone(self),
            user,
            conn,
        }
    }
}

/// Scoped room registration.
///
/// Dropping it removes the user from the room (only if this connection is still
/// the registered one) and closes the handle. Runs on every exit path of the
/// owning task, unwinding included.
#[derive(Debug)]
pub struct Membership {
    room: Arc<Room>,
    user: String,
    conn: Connection,
}

impl Membership {
    pub fn user(&self) -> &str {
        &self.user
    }
}

impl Drop for Membership {
    fn drop(&mut self) {
        let removed = self.room.leave_connection(&self.user, self.conn.id());
        self.conn.close();
        tracing::info!(room = %self.room.id(), user = %self.user, removed, "user left room");
    }
}
