//! Top-level facade crate for twlrelay.
//!
//! Re-exports core types and the gateway library so users can depend on a single crate.

pub mod core {
    pub use twlrelay_core::*;
}

pub mod gateway {
    pub use twlrelay_gateway::*;
}
