//! Dialogue - call-screening state machine
//!
//! The document is built once in memory and submitted wholesale; the
//! platform's model evaluates edge descriptions at call time.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::errors::DialogueError;
use crate::domain::value_objects::StartSpeaker;

/// LLM configuration resource body (`POST /create-retell-llm`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmDocument {
    pub model: String,
    pub model_temperature: f32,
    pub start_speaker: StartSpeaker,
    pub begin_message: String,
    pub general_prompt: String,
    pub general_tools: Vec<Tool>,
    pub starting_state: String,
    pub states: Vec<DialogueState>,
}

/// A named phase of the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueState {
    pub name: String,
    pub state_prompt: String,
    #[serde(default)]
    pub edges: Vec<StateEdge>,
    #[serde(default)]
    pub tools: Vec<Tool>,
}

/// Allowed transition; `description` is the natural-language condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateEdge {
    pub destination_state_name: String,
    pub description: String,
}

/// Capability exposed to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Tool {
    TransferCall {
        name: String,
        description: String,
        transfer_destination: TransferDestination,
        transfer_option: TransferOption,
    },
    SendSms {
        name: String,
        description: String,
        sms_content: SmsContent,
    },
    EndCall {
        name: String,
        description: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransferDestination {
    Predefined { number: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransferOption {
    /// The assistant talks to the transfer target privately before bridging.
    WarmTransfer { show_transferee_as_caller: bool },
    ColdTransfer { show_transferee_as_caller: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SmsContent {
    /// Message text written by the model from this prompt
    Inferred { prompt: String },
    Predefined { content: String },
}

impl Tool {
    pub fn name(&self) -> &str {
        match self {
            Tool::TransferCall { name, .. } | Tool::SendSms { name, .. } | Tool::EndCall { name, .. } => {
                name
            }
        }
    }

    pub fn end_call(name: impl Into<String>, description: impl Into<String>) -> Self {
        Tool::EndCall {
            name: name.into(),
            description: description.into(),
        }
    }

    pub fn inferred_sms(
        name: impl Into<String>,
        description: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Tool::SendSms {
            name: name.into(),
            description: description.into(),
            sms_content: SmsContent::Inferred {
                prompt: prompt.into(),
            },
        }
    }

    pub fn warm_transfer(
        name: impl Into<String>,
        description: impl Into<String>,
        number: impl Into<String>,
    ) -> Self {
        Tool::TransferCall {
            name: name.into(),
            description: description.into(),
            transfer_destination: TransferDestination::Predefined {
                number: number.into(),
            },
            transfer_option: TransferOption::WarmTransfer {
                show_transferee_as_caller: false,
            },
        }
    }
}

impl StateEdge {
    pub fn new(destination: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            destination_state_name: destination.into(),
            description: description.into(),
        }
    }
}

impl DialogueState {
    pub fn new(name: impl Into<String>, state_prompt: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state_prompt: state_prompt.into(),
            edges: Vec::new(),
            tools: Vec::new(),
        }
    }

    pub fn with_edge(mut self, edge: StateEdge) -> Self {
        self.edges.push(edge);
        self
    }

    pub fn with_tool(mut self, tool: Tool) -> Self {
        self.tools.push(tool);
        self
    }
}

impl LlmDocument {
    /// Look up a state by name
    pub fn state(&self, name: &str) -> Option<&DialogueState> {
        self.states.iter().find(|s| s.name == name)
    }

    pub fn state_names(&self) -> impl Iterator<Item = &str> {
        self.states.iter().map(|s| s.name.as_str())
    }

    /// Check the structural rules the platform enforces on submission.
    pub fn validate(&self) -> Result<(), DialogueError> {
        if self.states.is_empty() {
            return Err(DialogueError::Empty);
        }
        if !(0.0..=1.0).contains(&self.model_temperature) {
            return Err(DialogueError::TemperatureOutOfRange(self.model_temperature));
        }

        let mut names = HashSet::new();
        for state in &self.states {
            if !names.insert(state.name.as_str()) {
                return Err(DialogueError::DuplicateState(state.name.clone()));
            }
        }

        if !names.contains(self.starting_state.as_str()) {
            return Err(DialogueError::UnknownStartingState(
                self.starting_state.clone(),
            ));
        }

        for state in &self.states {
            if let Some(edge) = state
                .edges
                .iter()
                .find(|e| !names.contains(e.destination_state_name.as_str()))
            {
                return Err(DialogueError::DanglingEdge {
                    from: state.name.clone(),
                    to: edge.destination_state_name.clone(),
                });
            }

            // General tools are visible in every state
            let mut tools = HashSet::new();
            for tool in self.general_tools.iter().chain(&state.tools) {
                if !tools.insert(tool.name()) {
                    return Err(DialogueError::DuplicateTool {
                        state: state.name.clone(),
                        tool: tool.name().to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}
