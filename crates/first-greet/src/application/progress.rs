//! Progress callbacks for the provisioning pipeline

use super::{AgentResolution, CompensationResult, LlmCreated, PhoneOutcome, Stage};

/// Observer notified as the pipeline advances. All methods default to no-ops.
pub trait ProgressReporter {
    fn stage_started(&mut self, _stage: Stage) {}

    fn llm_created(&mut self, _llm: &LlmCreated) {}

    fn agent_resolved(&mut self, _resolution: &AgentResolution) {}

    fn phone_verified(&mut self, _outcome: &PhoneOutcome) {}

    /// Called once per compensation, in the order they run
    fn compensated(&mut self, _result: &CompensationResult) {}
}

/// Reporter that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {}
