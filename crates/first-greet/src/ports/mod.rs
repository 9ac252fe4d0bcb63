//! Ports (Interfaces)
//!
//! Abstract interfaces for the external systems the pipeline drives.
//! The HTTP implementation lives in the CLI crate.

mod voice_platform;

pub use voice_platform::*;
