//! PhoneNumber - a number owned by the account and the agents it routes to

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoneNumber {
    pub phone_number: String,
    #[serde(default)]
    pub phone_number_pretty: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub inbound_agent_id: Option<String>,
    #[serde(default)]
    pub outbound_agent_id: Option<String>,
}

/// Update body binding a number to agents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoneNumberBinding {
    pub inbound_agent_id: String,
    pub outbound_agent_id: String,
}

impl PhoneNumberBinding {
    /// Route both directions through one agent
    pub fn both(agent_id: impl Into<String>) -> Self {
        let agent_id = agent_id.into();
        Self {
            inbound_agent_id: agent_id.clone(),
            outbound_agent_id: agent_id,
        }
    }
}

impl PhoneNumber {
    pub fn nickname_contains(&self, needle: &str) -> bool {
        self.nickname
            .as_deref()
            .is_some_and(|nick| nick.contains(needle))
    }

    pub fn is_inbound_bound_to(&self, agent_id: &str) -> bool {
        self.inbound_agent_id.as_deref() == Some(agent_id)
    }

    /// Pretty form if the platform supplied one
    pub fn display(&self) -> &str {
        self.phone_number_pretty
            .as_deref()
            .unwrap_or(&self.phone_number)
    }
}
