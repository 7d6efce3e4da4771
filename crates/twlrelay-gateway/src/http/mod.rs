//! Plain HTTP endpoints: room creation and producer notifications.

pub mod error;
pub mod notify;
pub mod rooms;

pub use error::ApiError;
