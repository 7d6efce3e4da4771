//! Message envelope (JSON).
//!
//! Every field is optional on the wire and defaults to an empty string; unknown
//! fields are ignored. The payload field is `content`.

use serde::{Deserialize, Serialize};

use crate::error::{RelayError, Result};

/// Wire value of an alert frame kind.
pub const KIND_ALERT: &str = "alert";
/// Wire value of a location frame kind.
pub const KIND_LOCATION: &str = "location";

/// Message envelope exchanged over the socket and the producer endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Target room id.
    #[serde(default)]
    pub room_id: String,
    /// Originating user id.
    #[serde(default)]
    pub user_id: String,
    /// Message kind (field name is `type` in JSON).
    #[serde(rename = "type", default)]
    pub msg_type: String,
    /// Opaque payload.
    #[serde(default)]
    pub content: String,
}

/// Classified message kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageKind {
    Alert,
    Location,
    Unrecognized(String),
}

impl MessageKind {
    pub fn as_str(&self) -> &str {
        match self {
            MessageKind::Alert => KIND_ALERT,
            MessageKind::Location => KIND_LOCATION,
            MessageKind::Unrecognized(s) => s,
        }
    }
}

impl Envelope {
    /// Parse an envelope from JSON text.
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s)
            .map_err(|e| RelayError::BadRequest(format!("invalid envelope json: {e}")))
    }

    /// Parse an envelope from a JSON byte slice (producer bodies, binary frames).
    pub fn from_slice(b: &[u8]) -> Result<Self> {
        serde_json::from_slice(b)
            .map_err(|e| RelayError::BadRequest(format!("invalid envelope json: {e}")))
    }

    /// Serialize back to JSON text.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| RelayError::Internal(format!("envelope encode failed: {e}")))
    }

    pub fn kind(&self) -> MessageKind {
        match self.msg_type.as_str() {
            KIND_ALERT => MessageKind::Alert,
            KIND_LOCATION => MessageKind::Location,
            other => MessageKind::Unrecognized(other.to_string()),
        }
    }
}
