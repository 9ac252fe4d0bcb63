//! Value Objects
//!
//! Immutable types defined by their values, not identity.

mod e164;
mod start_speaker;

pub use e164::*;
pub use start_speaker::*;
