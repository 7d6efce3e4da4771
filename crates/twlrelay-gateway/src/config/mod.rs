//! Relay config loader (strict parsing).

pub mod schema;

use std::fs;
use std::path::Path;

use twlrelay_core::error::{RelayError, Result};

pub use schema::{GatewaySection, RelayConfig, RoomsSection};

/// Env var naming the config file.
pub const CONFIG_ENV: &str = "TWLRELAY_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "twlrelay.yaml";

pub fn load_from_file(path: &str) -> Result<RelayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| RelayError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<RelayConfig> {
    let cfg: RelayConfig = serde_yaml::from_str(s)
        .map_err(|e| RelayError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load from `$TWLRELAY_CONFIG` (or `twlrelay.yaml`); a missing file means defaults.
pub fn load_from_env() -> Result<RelayConfig> {
    let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    if !Path::new(&path).exists() {
        tracing::info!(%path, "config file not found, using defaults");
        return Ok(RelayConfig::default());
    }
    tracing::info!(%path, "loading config");
    load_from_file(&path)
}
