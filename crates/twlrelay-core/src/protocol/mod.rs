//! Protocol modules.
//!
//! The relay speaks a single text lane: JSON envelopes carried in WebSocket
//! text frames and in producer HTTP bodies.
//!
//! Parsers are panic-free: malformed input is reported as `RelayError`
//! instead of panicking, so a hostile client can only get its own frame
//! discarded.

pub mod envelope;

pub use envelope::{Envelope, MessageKind};
