//! First Greet screening script
//!
//! Four states:
//! - `screening`: find out who is calling and why, then route
//! - `calling_mike`: warm transfer, Mike decides while the caller holds
//! - `voicemail`: unwanted call, Mike never rings, gather details and text him
//! - `take_message`: Mike passed or did not answer, take a message and text him

pub mod prompts;

use crate::domain::{
    AgentProfile, DialogueState, E164Number, LlmDocument, ResponseEngine, StartSpeaker, StateEdge,
    Tool,
};

pub const MODEL: &str = "gpt-4.1-mini";
pub const MODEL_TEMPERATURE: f32 = 0.3;
pub const STARTING_STATE: &str = "screening";
pub const DEFAULT_AGENT_NAME: &str = "First Greet";

pub const SCREENING: &str = "screening";
pub const CALLING_MIKE: &str = "calling_mike";
pub const VOICEMAIL: &str = "voicemail";
pub const TAKE_MESSAGE: &str = "take_message";

/// Build the dialogue document; warm transfers dial `transfer_number`.
pub fn dialogue(transfer_number: &E164Number) -> LlmDocument {
    LlmDocument {
        model: MODEL.to_string(),
        model_temperature: MODEL_TEMPERATURE,
        start_speaker: StartSpeaker::Agent,
        begin_message: prompts::BEGIN_MESSAGE.to_string(),
        general_prompt: prompts::GENERAL_PROMPT.to_string(),
        general_tools: vec![Tool::end_call(
            "emergency_end",
            "Only use if the caller hangs up, becomes abusive, or an unexpected error occurs.",
        )],
        starting_state: STARTING_STATE.to_string(),
        states: vec![
            screening_state(),
            calling_mike_state(transfer_number),
            voicemail_state(),
            take_message_state(),
        ],
    }
}

fn screening_state() -> DialogueState {
    // Routing only, no tools
    DialogueState::new(SCREENING, prompts::SCREENING)
        .with_edge(StateEdge::new(
            CALLING_MIKE,
            "Transition when the call seems legitimate and Mike should be consulted. Use this for business, personal, or important calls.",
        ))
        .with_edge(StateEdge::new(
            VOICEMAIL,
            "Transition when the call is likely spam, telemarketing, or unwanted. Mike should NOT be bothered.",
        ))
}

fn calling_mike_state(transfer_number: &E164Number) -> DialogueState {
    DialogueState::new(CALLING_MIKE, prompts::CALLING_MIKE)
        .with_tool(Tool::warm_transfer(
            "transfer_to_mike",
            "Initiate warm transfer to Mike. You will speak to Mike first while caller is on hold.",
            transfer_number.as_str(),
        ))
        .with_edge(StateEdge::new(
            TAKE_MESSAGE,
            "Mike declined, said pass, pressed 2, did not answer, or went to voicemail. Return to caller and take a message.",
        ))
}

fn voicemail_state() -> DialogueState {
    DialogueState::new(VOICEMAIL, prompts::VOICEMAIL)
        .with_tool(Tool::inferred_sms(
            "text_mike_summary",
            "Send SMS to Mike with call summary after gathering info from caller.",
            prompts::SUMMARY_SMS,
        ))
        .with_tool(Tool::end_call(
            "end_call",
            "End the call after gathering info and sending SMS to Mike.",
        ))
}

fn take_message_state() -> DialogueState {
    DialogueState::new(TAKE_MESSAGE, prompts::TAKE_MESSAGE)
        .with_tool(Tool::inferred_sms(
            "text_mike_message",
            "Send SMS to Mike with the caller message after taking their info.",
            prompts::MESSAGE_SMS,
        ))
        .with_tool(Tool::end_call(
            "end_call",
            "End the call after taking message and sending SMS to Mike.",
        ))
}

/// Create-agent body used when no existing agent matches
pub fn agent_profile(agent_name: &str, llm_id: &str) -> AgentProfile {
    AgentProfile {
        response_engine: ResponseEngine::retell_llm(llm_id),
        voice_id: "11labs-Grace".to_string(),
        agent_name: agent_name.to_string(),
        version_description: "Enhanced call screening with Mike approval and voicemail mode"
            .to_string(),
        language: "en-US".to_string(),
        voice_speed: 1.0,
        responsiveness: 0.9,
        interruption_sensitivity: 0.7,
        enable_backchannel: true,
        backchannel_frequency: 0.6,
        enable_voicemail_detection: true,
        voicemail_message: prompts::VOICEMAIL_MESSAGE.to_string(),
        end_call_after_silence_ms: 30_000,
        max_call_duration_ms: 3_600_000,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SmsContent, TransferDestination, TransferOption};

    fn document() -> LlmDocument {
        dialogue(&E164Number::parse("+18475550100").unwrap())
    }

    fn destinations<'a>(doc: &'a LlmDocument, state: &str) -> Vec<&'a str> {
        doc.state(state)
            .unwrap()
            .edges
            .iter()
            .map(|e| e.destination_state_name.as_str())
            .collect()
    }

    #[test]
    fn test_document_is_valid() {
        assert_eq!(document().validate(), Ok(()));
    }

    #[test]
    fn test_every_edge_resolves() {
        let doc = document();
        let names: Vec<&str> = doc.state_names().collect();

        for state in &doc.states {
            for edge in &state.edges {
                assert!(
                    names.contains(&edge.destination_state_name.as_str()),
                    "{} -> {}",
                    state.name,
                    edge.destination_state_name
                );
            }
        }
        assert_eq!(destinations(&doc, SCREENING), vec![CALLING_MIKE, VOICEMAIL]);
        assert_eq!(destinations(&doc, CALLING_MIKE), vec![TAKE_MESSAGE]);
        assert!(destinations(&doc, VOICEMAIL).is_empty());
        assert!(destinations(&doc, TAKE_MESSAGE).is_empty());
    }

    #[test]
    fn test_single_starting_state() {
        let doc = document();
        assert_eq!(doc.starting_state, "screening");
        assert_eq!(doc.state_names().filter(|n| *n == "screening").count(), 1);
        assert_eq!(
            doc.state_names().collect::<Vec<_>>(),
            vec!["screening", "calling_mike", "voicemail", "take_message"]
        );
    }

    #[test]
    fn test_transfer_targets_configured_number() {
        let doc = dialogue(&E164Number::parse("+442071838750").unwrap());
        let tools = &doc.state(CALLING_MIKE).unwrap().tools;

        assert_eq!(tools.len(), 1);
        match &tools[0] {
            Tool::TransferCall {
                name,
                transfer_destination: TransferDestination::Predefined { number },
                transfer_option,
                ..
            } => {
                assert_eq!(name, "transfer_to_mike");
                assert_eq!(number, "+442071838750");
                assert_eq!(
                    *transfer_option,
                    TransferOption::WarmTransfer {
                        show_transferee_as_caller: false
                    }
                );
            }
            other => panic!("Expected transfer tool, got {:?}", other),
        }
    }

    #[test]
    fn test_message_states_text_then_hang_up() {
        let doc = document();
        for (state, sms_tool) in [(VOICEMAIL, "text_mike_summary"), (TAKE_MESSAGE, "text_mike_message")] {
            let tools = &doc.state(state).unwrap().tools;
            let names: Vec<&str> = tools.iter().map(Tool::name).collect();
            assert_eq!(names, vec![sms_tool, "end_call"]);
            assert!(matches!(
                &tools[0],
                Tool::SendSms {
                    sms_content: SmsContent::Inferred { .. },
                    ..
                }
            ));
        }
        assert!(doc.state(SCREENING).unwrap().tools.is_empty());
    }

    #[test]
    fn test_model_parameters() {
        let doc = document();
        assert_eq!(doc.model, "gpt-4.1-mini");
        assert_eq!(doc.model_temperature, 0.3);
        assert_eq!(doc.start_speaker, StartSpeaker::Agent);
        assert_eq!(doc.general_tools.len(), 1);
        assert_eq!(doc.general_tools[0].name(), "emergency_end");
        assert!(doc.begin_message.starts_with("Hello, thank you for calling."));
    }

    #[test]
    fn test_agent_profile() {
        let profile = agent_profile("First Greet", "llm_42");
        assert_eq!(profile.response_engine.llm_id(), Some("llm_42"));
        assert_eq!(profile.agent_name, "First Greet");
        assert_eq!(profile.voice_id, "11labs-Grace");
        assert_eq!(profile.end_call_after_silence_ms, 30_000);
        assert_eq!(profile.max_call_duration_ms, 3_600_000);
        assert!(profile.enable_voicemail_detection);
    }
}
