use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::ws::Message;
use tokio::sync::{mpsc, Notify};

use twlrelay_core::error::{RelayError, Result};

static NEXT_CONN_ID: AtomicU64 = AtomicU64::new(1);

/// Handle to one joined client's socket.
///
/// Writes go through a bounded queue drained by the session's writer task, so
/// any number of broadcasters may write concurrently without a room lock.
/// Clones share the queue and the close signal.
#[derive(Clone)]
pub struct Connection {
    id: u64,
    tx: mpsc::Sender<Message>,
    close: Arc<Notify>,
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

impl Connection {
    pub fn new(tx: mpsc::Sender<Message>) -> Self {
        Self {
            id: NEXT_CONN_ID.fetch_add(1, Ordering::Relaxed),
            tx,
            close: Arc::new(Notify::new()),
        }
    }

    /// Process-unique id; distinguishes a superseded handle from its successor.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Queue one message for the socket. Fails once the writer is gone.
    pub async fn send(&self, msg: Message) -> Result<()> {
        self.tx
            .send(msg)
            .await
            .map_err(|_| RelayError::Transport("connection closed".into()))
    }

    /// Ask the owning session to shut down. Idempotent.
    pub fn close(&self) {
        self.close.notify_one();
    }

    /// Resolves once `close` has been called on any clone.
    pub async fn closed(&self) {
        self.close.notified().await;
    }

    /// Whether the writer side has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Origin of a broadcast (metrics/log label).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastSource {
    /// An alert frame from a connected member.
    Alert,
    /// An out-of-band producer request.
    Producer,
}

impl BroadcastSource {
    pub fn as_str(self) -> &'static str {
        match self {
            BroadcastSource::Alert => "alert",
            BroadcastSource::Producer => "producer",
        }
    }
}
