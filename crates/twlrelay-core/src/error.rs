//! Shared error type across twlrelay crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed request.
    BadRequest,
    /// Room id does not resolve.
    RoomNotFound,
    /// Room secret mismatch.
    InvalidSecret,
    /// Request could not be upgraded to a WebSocket.
    UpgradeFailed,
    /// Frame kind has no registered handler.
    UnknownKind,
    /// Connection-level read/write failure.
    Transport,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::RoomNotFound => "ROOM_NOT_FOUND",
            ClientCode::InvalidSecret => "INVALID_SECRET",
            ClientCode::UpgradeFailed => "UPGRADE_FAILED",
            ClientCode::UnknownKind => "UNKNOWN_KIND",
            ClientCode::Transport => "TRANSPORT",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, RelayError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("room not found")]
    RoomNotFound,
    #[error("invalid room password")]
    InvalidSecret,
    #[error("websocket upgrade failed: {0}")]
    UpgradeFailed(String),
    #[error("unknown message type: {0}")]
    UnknownKind(String),
    #[error("transport: {0}")]
    Transport(String),
    #[error("room id generation failed: {0}")]
    IdGeneration(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl RelayError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            RelayError::BadRequest(_) => ClientCode::BadRequest,
            RelayError::RoomNotFound => ClientCode::RoomNotFound,
            RelayError::InvalidSecret => ClientCode::InvalidSecret,
            RelayError::UpgradeFailed(_) => ClientCode::UpgradeFailed,
            RelayError::UnknownKind(_) => ClientCode::UnknownKind,
            RelayError::Transport(_) => ClientCode::Transport,
            RelayError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            RelayError::IdGeneration(_) | RelayError::Internal(_) => ClientCode::Internal,
        }
    }

    /// True for errors caused by the requester (4xx family).
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self.client_code(),
            ClientCode::Transport | ClientCode::Internal
        )
    }
}
