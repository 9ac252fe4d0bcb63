//! Provision Application Service (Use Case)
//!
//! Brings the platform's LLM, agent and phone binding to the desired state:
//!
//! `start -> llm_created -> agent_resolved -> phone_verified -> done`
//!
//! The first error stops the pipeline. Created resources are left in place
//! unless the plan opts into rollback, which undoes completed stages in
//! reverse order.

use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

use super::ProgressReporter;
use crate::domain::{
    Agent, AgentProfile, AgentUpdate, DomainError, LlmDocument, PhoneNumber, PhoneNumberBinding,
    ResponseEngine,
};
use crate::ports::VoicePlatform;
use crate::screening;

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    CreateLlm,
    ResolveAgent,
    VerifyPhone,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::CreateLlm => write!(f, "create LLM"),
            Stage::ResolveAgent => write!(f, "resolve agent"),
            Stage::VerifyPhone => write!(f, "verify phone binding"),
        }
    }
}

/// Which agent to bind, and how to create it when missing
#[derive(Clone)]
pub struct AgentTarget {
    pub name: String,
    /// When set, the agent is selected by id and never created.
    pub pinned_id: Option<String>,
    pub profile: fn(&str, &str) -> AgentProfile,
}

impl std::fmt::Debug for AgentTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentTarget")
            .field("name", &self.name)
            .field("pinned_id", &self.pinned_id)
            .finish_non_exhaustive()
    }
}

impl AgentTarget {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pinned_id: None,
            profile: screening::agent_profile,
        }
    }

    pub fn with_pinned_id(mut self, agent_id: impl Into<String>) -> Self {
        self.pinned_id = Some(agent_id.into());
        self
    }
}

/// Everything one run needs
#[derive(Debug, Clone)]
pub struct ProvisionPlan {
    pub document: LlmDocument,
    pub agent: AgentTarget,
    /// Substring matched against phone-number nicknames
    pub phone_nickname: String,
    /// Undo completed stages on failure. Off by default.
    pub rollback: bool,
}

impl ProvisionPlan {
    pub fn new(document: LlmDocument, agent: AgentTarget, phone_nickname: impl Into<String>) -> Self {
        Self {
            document,
            agent,
            phone_nickname: phone_nickname.into(),
            rollback: false,
        }
    }

    pub fn with_rollback(mut self) -> Self {
        self.rollback = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LlmCreated {
    pub llm_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AgentResolution {
    Updated {
        agent: Agent,
        previous_engine: ResponseEngine,
    },
    Created {
        agent: Agent,
    },
}

impl AgentResolution {
    pub fn agent(&self) -> &Agent {
        match self {
            AgentResolution::Updated { agent, .. } | AgentResolution::Created { agent } => agent,
        }
    }

    pub fn agent_id(&self) -> &str {
        &self.agent().agent_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PhoneOutcome {
    Rebound { number: PhoneNumber },
    AlreadyBound { number: PhoneNumber },
    /// No number nickname matched; nothing to verify
    NotFound,
}

impl PhoneOutcome {
    pub fn number(&self) -> Option<&PhoneNumber> {
        match self {
            PhoneOutcome::Rebound { number } | PhoneOutcome::AlreadyBound { number } => {
                Some(number)
            }
            PhoneOutcome::NotFound => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvisionOutcome {
    pub llm: LlmCreated,
    pub agent: AgentResolution,
    pub phone: PhoneOutcome,
}

/// Undo action for a completed stage
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Compensation {
    DeleteLlm { llm_id: String },
    DeleteAgent { agent_id: String },
    RestoreAgentEngine {
        agent_id: String,
        engine: ResponseEngine,
    },
    /// The agent's previous engine has no `retell-llm` shape to send back,
    /// so the agent stays on the new LLM and that LLM is kept.
    KeepAgentOnLlm { agent_id: String, llm_id: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompensationResult {
    pub compensation: Compensation,
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Why a run stopped, and what was cleaned up afterwards
#[derive(Debug, thiserror::Error, Serialize)]
#[error("{stage} failed: {error}")]
pub struct ProvisionFailure {
    pub stage: Stage,
    /// Whether the platform had already been changed when the error hit
    pub mutated: bool,
    #[source]
    pub error: DomainError,
    pub compensations: Vec<CompensationResult>,
}

/// Application service for provisioning runs
pub struct ProvisionService<P: VoicePlatform> {
    platform: Arc<P>,
}

impl<P: VoicePlatform> ProvisionService<P> {
    pub fn new(platform: Arc<P>) -> Self {
        Self { platform }
    }

    /// Run every stage in order
    pub async fn run(
        &self,
        plan: &ProvisionPlan,
        reporter: &mut dyn ProgressReporter,
    ) -> Result<ProvisionOutcome, ProvisionFailure> {
        let mut undo = Vec::new();

        reporter.stage_started(Stage::CreateLlm);
        let llm = match self.create_llm(&plan.document).await {
            Ok(llm) => llm,
            Err(e) => return Err(self.fail(Stage::CreateLlm, e, undo, plan, reporter).await),
        };
        undo.push(Compensation::DeleteLlm {
            llm_id: llm.llm_id.clone(),
        });
        reporter.llm_created(&llm);

        reporter.stage_started(Stage::ResolveAgent);
        let agent = match self.resolve_agent(&plan.agent, &llm).await {
            Ok(agent) => agent,
            Err(e) => return Err(self.fail(Stage::ResolveAgent, e, undo, plan, reporter).await),
        };
        match &agent {
            AgentResolution::Created { agent } => undo.push(Compensation::DeleteAgent {
                agent_id: agent.agent_id.clone(),
            }),
            AgentResolution::Updated {
                agent,
                previous_engine,
            } => match previous_engine {
                ResponseEngine::RetellLlm { .. } => undo.push(Compensation::RestoreAgentEngine {
                    agent_id: agent.agent_id.clone(),
                    engine: previous_engine.clone(),
                }),
                ResponseEngine::Other => {
                    // Deleting the LLM would leave the agent pointing at nothing
                    undo.retain(|c| !matches!(c, Compensation::DeleteLlm { .. }));
                    undo.push(Compensation::KeepAgentOnLlm {
                        agent_id: agent.agent_id.clone(),
                        llm_id: llm.llm_id.clone(),
                    });
                }
            },
        }
        reporter.agent_resolved(&agent);

        reporter.stage_started(Stage::VerifyPhone);
        let phone = match self
            .verify_phone(&plan.phone_nickname, agent.agent_id())
            .await
        {
            Ok(phone) => phone,
            Err(e) => return Err(self.fail(Stage::VerifyPhone, e, undo, plan, reporter).await),
        };
        reporter.phone_verified(&phone);

        tracing::info!(
            llm_id = %llm.llm_id,
            agent_id = %agent.agent_id(),
            "Provisioning complete"
        );

        Ok(ProvisionOutcome { llm, agent, phone })
    }

    /// Validate and submit the dialogue document
    pub async fn create_llm(&self, document: &LlmDocument) -> Result<LlmCreated, DomainError> {
        document.validate()?;

        let resource = self.platform.create_llm(document).await?;
        tracing::info!(llm_id = %resource.llm_id, states = document.states.len(), "Created LLM");

        Ok(LlmCreated {
            llm_id: resource.llm_id,
        })
    }

    /// Point the target agent at the new LLM, creating the agent if needed
    pub async fn resolve_agent(
        &self,
        target: &AgentTarget,
        llm: &LlmCreated,
    ) -> Result<AgentResolution, DomainError> {
        let agents = self.platform.list_agents().await?;

        let existing = match &target.pinned_id {
            Some(id) => Some(
                agents
                    .iter()
                    .find(|a| &a.agent_id == id)
                    .ok_or_else(|| DomainError::not_found("Agent", id))?,
            ),
            None => find_by_name(&agents, &target.name),
        };

        match existing {
            Some(current) => {
                tracing::debug!(agent_id = %current.agent_id, "Found existing agent, updating");
                let update = AgentUpdate::rebind(ResponseEngine::retell_llm(&llm.llm_id));
                let agent = self
                    .platform
                    .update_agent(&current.agent_id, &update)
                    .await?;
                tracing::info!(agent_id = %agent.agent_id, llm_id = %llm.llm_id, "Updated agent");

                Ok(AgentResolution::Updated {
                    agent,
                    previous_engine: current.response_engine.clone(),
                })
            }
            None => {
                let profile = (target.profile)(&target.name, &llm.llm_id);
                let agent = self.platform.create_agent(&profile).await?;
                tracing::info!(agent_id = %agent.agent_id, name = %target.name, "Created agent");

                Ok(AgentResolution::Created { agent })
            }
        }
    }

    /// Make sure the nicknamed phone number routes to `agent_id`
    pub async fn verify_phone(
        &self,
        nickname: &str,
        agent_id: &str,
    ) -> Result<PhoneOutcome, DomainError> {
        let numbers = self.platform.list_phone_numbers().await?;

        let Some(number) = numbers.into_iter().find(|n| n.nickname_contains(nickname)) else {
            tracing::warn!(nickname = %nickname, "No phone number matches nickname");
            return Ok(PhoneOutcome::NotFound);
        };

        if number.is_inbound_bound_to(agent_id) {
            tracing::debug!(phone_number = %number.phone_number, "Phone number already bound");
            return Ok(PhoneOutcome::AlreadyBound { number });
        }

        let number = self
            .platform
            .update_phone_number(&number.phone_number, &PhoneNumberBinding::both(agent_id))
            .await?;
        tracing::info!(phone_number = %number.phone_number, agent_id = %agent_id, "Re-bound phone number");

        Ok(PhoneOutcome::Rebound { number })
    }

    async fn fail(
        &self,
        stage: Stage,
        error: DomainError,
        undo: Vec<Compensation>,
        plan: &ProvisionPlan,
        reporter: &mut dyn ProgressReporter,
    ) -> ProvisionFailure {
        tracing::error!(stage = %stage, error = %error, "Provisioning failed");

        let mutated = !undo.is_empty();
        let mut compensations = Vec::new();

        if plan.rollback {
            for compensation in undo.into_iter().rev() {
                let result = self.compensate(compensation).await;
                reporter.compensated(&result);
                compensations.push(result);
            }
        }

        ProvisionFailure {
            stage,
            mutated,
            error,
            compensations,
        }
    }

    async fn compensate(&self, compensation: Compensation) -> CompensationResult {
        let outcome = match &compensation {
            Compensation::DeleteLlm { llm_id } => self.platform.delete_llm(llm_id).await,
            Compensation::DeleteAgent { agent_id } => self.platform.delete_agent(agent_id).await,
            Compensation::RestoreAgentEngine { agent_id, engine } => self
                .platform
                .update_agent(agent_id, &AgentUpdate::rebind(engine.clone()))
                .await
                .map(|_| ()),
            Compensation::KeepAgentOnLlm { agent_id, llm_id } => Err(DomainError::Validation(
                format!(
                    "agent {} had a non retell-llm engine that cannot be restored; it stays on LLM {}",
                    agent_id, llm_id
                ),
            )),
        };

        match outcome {
            Ok(()) => {
                tracing::info!(?compensation, "Compensation applied");
                CompensationResult {
                    compensation,
                    succeeded: true,
                    error: None,
                }
            }
            Err(e) => {
                tracing::warn!(?compensation, error = %e, "Compensation failed");
                CompensationResult {
                    compensation,
                    succeeded: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

/// First agent with this display name. Name equality is the only key, so
/// renamed agents are missed and duplicates resolve to the first listed.
fn find_by_name<'a>(agents: &'a [Agent], name: &str) -> Option<&'a Agent> {
    let named: Vec<&Agent> = agents.iter().filter(|a| a.is_named(name)).collect();

    let distinct = named
        .iter()
        .map(|a| a.agent_id.as_str())
        .collect::<HashSet<_>>()
        .len();
    if distinct > 1 {
        tracing::warn!(
            name = %name,
            count = distinct,
            "Several agents share this name; using the first listed"
        );
    }

    named.into_iter().next()
}
