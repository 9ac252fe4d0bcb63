//! Agent - voice-facing resource bound to an LLM

use serde::{Deserialize, Serialize};

/// What answers on behalf of an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ResponseEngine {
    #[serde(rename = "retell-llm")]
    RetellLlm {
        llm_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        version: Option<u32>,
    },
    /// Engines this tool never writes (custom LLM, conversation flow)
    #[serde(other)]
    Other,
}

impl Default for ResponseEngine {
    fn default() -> Self {
        ResponseEngine::Other
    }
}

impl ResponseEngine {
    pub fn retell_llm(llm_id: impl Into<String>) -> Self {
        ResponseEngine::RetellLlm {
            llm_id: llm_id.into(),
            version: None,
        }
    }

    pub fn llm_id(&self) -> Option<&str> {
        match self {
            ResponseEngine::RetellLlm { llm_id, .. } => Some(llm_id),
            ResponseEngine::Other => None,
        }
    }
}

/// Agent as listed by the platform; unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub agent_id: String,
    #[serde(default)]
    pub agent_name: Option<String>,
    /// Absent on some listed agents
    #[serde(default)]
    pub response_engine: ResponseEngine,
    #[serde(default)]
    pub voice_id: Option<String>,
}

/// Full create-agent body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub response_engine: ResponseEngine,
    pub voice_id: String,
    pub agent_name: String,
    pub version_description: String,
    pub language: String,
    pub voice_speed: f32,
    pub responsiveness: f32,
    pub interruption_sensitivity: f32,
    pub enable_backchannel: bool,
    pub backchannel_frequency: f32,
    pub enable_voicemail_detection: bool,
    pub voicemail_message: String,
    pub end_call_after_silence_ms: u64,
    pub max_call_duration_ms: u64,
}

/// Partial update body; only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_engine: Option<ResponseEngine>,
}

impl AgentUpdate {
    pub fn rebind(engine: ResponseEngine) -> Self {
        Self {
            response_engine: Some(engine),
        }
    }
}

impl Agent {
    pub fn is_named(&self, name: &str) -> bool {
        self.agent_name.as_deref() == Some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_listed_agent() {
        let agent: Agent = serde_json::from_value(serde_json::json!({
            "agent_id": "agent_123",
            "agent_name": "First Greet",
            "voice_id": "11labs-Grace",
            "language": "en-US",
            "response_engine": { "type": "retell-llm", "llm_id": "llm_1", "version": 3 },
            "last_modification_timestamp": 1_700_000_000_000u64
        }))
        .unwrap();

        assert!(agent.is_named("First Greet"));
        assert_eq!(agent.response_engine.llm_id(), Some("llm_1"));
    }

    #[test]
    fn test_foreign_engine_is_other() {
        let agent: Agent = serde_json::from_value(serde_json::json!({
            "agent_id": "agent_9",
            "response_engine": { "type": "custom-llm", "llm_websocket_url": "wss://x" }
        }))
        .unwrap();

        assert_eq!(agent.response_engine, ResponseEngine::Other);
        assert!(!agent.is_named("First Greet"));
    }

    #[test]
    fn test_agent_without_engine_still_lists() {
        let agents: Vec<Agent> = serde_json::from_value(serde_json::json!([
            { "agent_id": "agent_draft", "agent_name": "Draft" },
            {
                "agent_id": "agent_fg",
                "agent_name": "First Greet",
                "response_engine": { "type": "retell-llm", "llm_id": "llm_1" }
            }
        ]))
        .unwrap();

        assert_eq!(agents[0].response_engine, ResponseEngine::Other);
        assert_eq!(agents[1].response_engine.llm_id(), Some("llm_1"));
    }

    #[test]
    fn test_update_body_only_sends_engine() {
        let body = serde_json::to_value(AgentUpdate::rebind(ResponseEngine::retell_llm("llm_2")))
            .unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "response_engine": { "type": "retell-llm", "llm_id": "llm_2" } })
        );
    }
}
