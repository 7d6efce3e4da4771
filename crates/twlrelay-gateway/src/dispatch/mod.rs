//! Dispatcher module exports.
//!
//! Re-exports the dispatcher and the frame service trait so downstream
//! consumers can depend on this module directly.

pub mod dispatcher;

pub use dispatcher::{Dispatcher, FrameService, InboundFrame};
