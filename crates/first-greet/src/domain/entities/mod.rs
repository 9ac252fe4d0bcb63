//! Domain Entities
//!
//! - Dialogue: the state-machine document submitted as an LLM resource
//! - Agent: voice-facing resource bound to an LLM
//! - PhoneNumber: number-to-agent binding

mod agent;
mod dialogue;
mod phone_number;

pub use agent::*;
pub use dialogue::*;
pub use phone_number::*;
