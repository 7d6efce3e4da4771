//! Room identifier generation.
//!
//! Ids are `<prefix><lowercase hex>` where the hex suffix encodes bytes drawn
//! from the operating system's CSPRNG. Entropy failures are reported, never
//! papered over with a fixed fallback id.

use rand::rngs::OsRng;
use rand::TryRngCore;

use crate::error::{RelayError, Result};

/// Default namespace tag prepended to every room id.
pub const DEFAULT_PREFIX: &str = "twl-server-";
/// Default number of random bytes in the suffix.
pub const DEFAULT_BYTES: usize = 4;

pub const MIN_BYTES: usize = 4;
pub const MAX_BYTES: usize = 32;

/// Produces fresh room ids.
#[derive(Debug, Clone)]
pub struct RoomIdGenerator {
    prefix: String,
    bytes: usize,
}

impl Default for RoomIdGenerator {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            bytes: DEFAULT_BYTES,
        }
    }
}

impl RoomIdGenerator {
    pub fn new(prefix: impl Into<String>, bytes: usize) -> Result<Self> {
        let prefix = prefix.into();
        if prefix.is_empty() {
            return Err(RelayError::BadRequest("room id prefix must not be empty".into()));
        }
        if !(MIN_BYTES..=MAX_BYTES).contains(&bytes) {
            return Err(RelayError::BadRequest(format!(
                "room id bytes must be between {MIN_BYTES} and {MAX_BYTES}"
            )));
        }
        Ok(Self { prefix, bytes })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Length of the hex suffix in characters.
    pub fn suffix_len(&self) -> usize {
        self.bytes * 2
    }

    /// Generate one id.
    pub fn generate(&self) -> Result<String> {
        let mut buf = vec![0u8; self.bytes];
        OsRng
            .try_fill_bytes(&mut buf)
            .map_err(|e| RelayError::IdGeneration(e.to_string()))?;
        Ok(format!("{}{}", self.prefix, hex::encode(buf)))
    }

    /// Whether `id` has the shape this generator produces.
    pub fn matches(&self, id: &str) -> bool {
        id.strip_prefix(self.prefix.as_str())
            .map(|suffix| {
                suffix.len() == self.suffix_len()
                    && suffix.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
            })
            .unwrap_or(false)
    }
}
