//! Built-in frame services.

mod alert;
mod location;

pub use alert::AlertService;
pub use location::LocationService;
