//! Voice Platform Port
//!
//! Administrative API of the hosted voice platform: LLM resources, agents,
//! and phone-number bindings.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{
    errors::DomainError, Agent, AgentProfile, AgentUpdate, LlmDocument, PhoneNumber,
    PhoneNumberBinding,
};

/// Created LLM resource; only the id is used downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmResource {
    pub llm_id: String,
    #[serde(default)]
    pub version: Option<u32>,
}

/// Administrative operations of the voice platform
///
/// Every failure is reported as `DomainError::ExternalService`.
#[async_trait]
pub trait VoicePlatform: Send + Sync {
    /// Create an LLM resource from a dialogue document
    async fn create_llm(&self, document: &LlmDocument) -> Result<LlmResource, DomainError>;

    async fn delete_llm(&self, llm_id: &str) -> Result<(), DomainError>;

    /// All agents of the account
    async fn list_agents(&self) -> Result<Vec<Agent>, DomainError>;

    async fn create_agent(&self, profile: &AgentProfile) -> Result<Agent, DomainError>;

    async fn update_agent(&self, agent_id: &str, update: &AgentUpdate)
        -> Result<Agent, DomainError>;

    async fn delete_agent(&self, agent_id: &str) -> Result<(), DomainError>;

    /// All phone numbers of the account
    async fn list_phone_numbers(&self) -> Result<Vec<PhoneNumber>, DomainError>;

    async fn update_phone_number(
        &self,
        phone_number: &str,
        binding: &PhoneNumberBinding,
    ) -> Result<PhoneNumber, DomainError>;
}
