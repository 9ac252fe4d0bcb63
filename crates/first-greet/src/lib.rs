//! First Greet Domain Library
//!
//! Call-screening dialogue model and provisioning pipeline for the First Greet
//! voice assistant.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain/`): Pure entities and value types
//!   - `entities/`: Dialogue document, Agent, PhoneNumber
//!   - `value_objects/`: Immutable value types (E164Number, StartSpeaker)
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): The administrative API of the voice platform
//!
//! - **Application** (`application/`): The provisioning pipeline
//!
//! - **Screening** (`screening/`): The First Greet script itself
//!
//! # Usage
//!
//! ```rust,ignore
//! use first_greet::{screening, ProvisionPlan, ProvisionService};
//!
//! let document = screening::dialogue(&transfer_number);
//! let plan = ProvisionPlan::new(document, AgentTarget::by_name("First Greet"), "First Greet");
//! let outcome = ProvisionService::new(platform).run(&plan, &mut NoopReporter).await?;
//! ```

pub mod application;
pub mod domain;
pub mod ports;
pub mod screening;

// Re-export commonly used types
pub use application::{
    AgentResolution, AgentTarget, Compensation, CompensationResult, LlmCreated, NoopReporter,
    PhoneOutcome, ProgressReporter, ProvisionFailure, ProvisionOutcome, ProvisionPlan,
    ProvisionService, Stage,
};
pub use domain::{
    Agent, AgentProfile, AgentUpdate, DialogueError, DialogueState, DomainError, E164Number,
    LlmDocument, PhoneNumber, PhoneNumberBinding, ResponseEngine, SmsContent,
    StartSpeaker, StateEdge, Tool, TransferDestination, TransferOption,
};
pub use ports::{LlmResource, VoicePlatform};
