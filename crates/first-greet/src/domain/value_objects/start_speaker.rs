//! StartSpeaker - who talks first when a call connects

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StartSpeaker {
    Agent,
    User,
}
