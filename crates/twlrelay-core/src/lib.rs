//! twlrelay core: transport-agnostic protocol primitives, error types, and room ids.
//!
//! This crate defines the wire-level envelope and error surface shared by the
//! gateway and by producers that talk to it. It carries no transport or
//! runtime dependencies so it can be reused outside the gateway process.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here.
//! All fallible paths surface as `RelayError`/`Result` so a malformed frame or a
//! failing entropy source never crashes the relay.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;
pub mod room_id;

/// Shared result type.
pub use error::{Result, RelayError};
