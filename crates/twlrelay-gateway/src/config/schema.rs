use std::net::SocketAddr;

use serde::Deserialize;
use twlrelay_core::error::{RelayError, Result};
use twlrelay_core::room_id::{self, RoomIdGenerator};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub rooms: RoomsSection,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            version: 1,
            gateway: GatewaySection::default(),
            rooms: RoomsSection::default(),
        }
    }
}

impl RelayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(RelayError::UnsupportedVersion);
        }
        self.gateway.validate()?;
        self.rooms.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Per-connection outbound queue capacity (frames).
    #[serde(default = "default_outbound_queue")]
    pub outbound_queue: usize,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            outbound_queue: default_outbound_queue(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !(1..=65536).contains(&self.outbound_queue) {
            return Err(RelayError::BadRequest(
                "gateway.outbound_queue must be between 1 and 65536".into(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|_| {
            RelayError::BadRequest("gateway.listen must be a valid SocketAddr".into())
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoomsSection {
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,

    #[serde(default = "default_id_bytes")]
    pub id_bytes: usize,

    /// Base of the advertised join address, e.g. `ws://localhost:8080`.
    #[serde(default)]
    pub public_ws_base: Option<String>,
}

impl Default for RoomsSection {
    fn default() -> Self {
        Self {
            id_prefix: default_id_prefix(),
            id_bytes: default_id_bytes(),
            public_ws_base: None,
        }
    }
}

impl RoomsSection {
    pub fn validate(&self) -> Result<()> {
        if self
            .id_prefix
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '%'))
        {
            return Err(RelayError::BadRequest(
                "rooms.id_prefix must be a single path segment".into(),
            ));
        }
        // Checks prefix emptiness and byte range.
        self.id_generator()?;

        if let Some(base) = &self.public_ws_base {
            if !(base.starts_with("ws://") || base.starts_with("wss://")) {
                return Err(RelayError::BadRequest(
                    "rooms.public_ws_base must start with ws:// or wss://".into(),
                ));
            }
        }
        Ok(())
    }

    pub fn id_generator(&self) -> Result<RoomIdGenerator> {
        RoomIdGenerator::new(self.id_prefix.clone(), self.id_bytes)
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_outbound_queue() -> usize {
    1024
}
fn default_id_prefix() -> String {
    room_id::DEFAULT_PREFIX.into()
}
fn default_id_bytes() -> usize {
    room_id::DEFAULT_BYTES
}
