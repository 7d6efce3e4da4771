//! twlrelay gateway library entry.
//!
//! Wires configuration, the realtime core (room registry, membership,
//! broadcast), the frame dispatcher, WebSocket transport, and HTTP endpoints
//! into one relay. Consumed by the binary (`main.rs`) and by integration tests.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod app_state;
pub mod config;
pub mod dispatch;
pub mod http;
pub mod obs;
pub mod ops;
pub mod realtime;
pub mod router;
pub mod services;
pub mod transport;
