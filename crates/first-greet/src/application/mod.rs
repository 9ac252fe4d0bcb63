//! Application Layer
//!
//! Use cases orchestrating domain objects through the platform port.

mod progress;
mod provision_service;

pub use progress::*;
pub use provision_service::*;
