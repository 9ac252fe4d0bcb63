//! Console output for provisioning runs
//!
//! Progress and summary go to stdout, failures to stderr.

use colored::Colorize;
use first_greet::{
    AgentResolution, Compensation, CompensationResult, LlmCreated, PhoneOutcome,
    ProgressReporter, ProvisionFailure, ProvisionOutcome, Stage,
};

const RULE: &str = "═══════════════════════════════════════════════════════════";

/// Prints step banners as the pipeline advances
pub struct ConsoleReporter {
    agent_name: String,
    phone_nickname: String,
}

impl ConsoleReporter {
    pub fn new(agent_name: impl Into<String>, phone_nickname: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            phone_nickname: phone_nickname.into(),
        }
    }
}

impl ProgressReporter for ConsoleReporter {
    fn stage_started(&mut self, stage: Stage) {
        match stage {
            Stage::CreateLlm => println!("📚 Step 1: Creating LLM with state-based screening..."),
            Stage::ResolveAgent => {
                println!("🎤 Step 2: Updating {} agent...", self.agent_name.cyan())
            }
            Stage::VerifyPhone => println!("📞 Step 3: Verifying phone number binding..."),
        }
    }

    fn llm_created(&mut self, llm: &LlmCreated) {
        println!("   {} LLM created: {}\n", "✓".green(), llm.llm_id);
    }

    fn agent_resolved(&mut self, resolution: &AgentResolution) {
        match resolution {
            AgentResolution::Updated { agent, .. } => {
                println!("   {} Agent updated: {}\n", "✓".green(), agent.agent_id)
            }
            AgentResolution::Created { agent } => {
                println!("   {} Agent created: {}\n", "✓".green(), agent.agent_id)
            }
        }
    }

    fn phone_verified(&mut self, outcome: &PhoneOutcome) {
        match outcome {
            PhoneOutcome::Rebound { number } => println!(
                "   {} Phone number {} re-bound to agent\n",
                "✓".green(),
                number.display()
            ),
            PhoneOutcome::AlreadyBound { number } => println!(
                "   {} Phone number already bound: {}\n",
                "✓".green(),
                number.display()
            ),
            PhoneOutcome::NotFound => println!(
                "   {} No phone number nickname contains '{}'\n",
                "!".yellow(),
                self.phone_nickname
            ),
        }
    }

    fn compensated(&mut self, result: &CompensationResult) {
        let action = describe(&result.compensation);
        match &result.error {
            None => eprintln!("   {} Rolled back: {}", "↩".yellow(), action),
            Some(e) => eprintln!("   {} Rollback failed: {} ({})", "✗".red(), action, e),
        }
    }
}

fn describe(compensation: &Compensation) -> String {
    match compensation {
        Compensation::DeleteLlm { llm_id } => format!("deleted LLM {}", llm_id),
        Compensation::DeleteAgent { agent_id } => format!("deleted agent {}", agent_id),
        Compensation::RestoreAgentEngine { agent_id, engine } => match engine.llm_id() {
            Some(llm_id) => format!("pointed agent {} back at LLM {}", agent_id, llm_id),
            None => format!("restored the previous engine of agent {}", agent_id),
        },
        Compensation::KeepAgentOnLlm { agent_id, llm_id } => {
            format!("kept LLM {} because agent {} still uses it", llm_id, agent_id)
        }
    }
}

pub fn print_summary(outcome: &ProvisionOutcome) {
    let agent_action = match outcome.agent {
        AgentResolution::Updated { .. } => "updated",
        AgentResolution::Created { .. } => "created",
    };
    let phone = outcome
        .phone
        .number()
        .map(|n| n.display().to_string())
        .unwrap_or_else(|| "Check dashboard".to_string());

    println!("{}", RULE);
    println!("{}", "🎉 FIRST GREET SETUP COMPLETE!".green().bold());
    println!("{}", RULE);
    println!();
    println!("{}", "📋 Summary:".bold());
    println!("   • LLM ID:        {}", outcome.llm.llm_id);
    println!(
        "   • Agent ID:      {} ({})",
        outcome.agent.agent_id(),
        agent_action.dimmed()
    );
    println!("   • Phone Number:  {}", phone);
    println!();
    println!("{}", "🔄 Call Flow:".bold());
    println!("   1. Caller reaches First Greet");
    println!("   2. AI screens → Legitimate? → Calls Mike for approval");
    println!("   3. Mike says \"take it\" → Connects | \"pass\" → Takes message");
    println!("   4. Spam detected → Voicemail mode (Mike never rings)");
    println!();
    println!(
        "{}",
        "⚠️  Note: SMS notifications require additional webhook setup.".yellow()
    );
    println!("{}", RULE);
}

/// Human-readable line plus the serialized failure report
pub fn print_failure(failure: &ProvisionFailure) {
    eprintln!("{} Setup failed: {}", "✗".red(), failure);
    if failure.mutated {
        eprintln!(
            "   {}",
            "The platform was modified before the failure.".yellow()
        );
    } else {
        eprintln!("   {}", "No platform resources were changed.".dimmed());
    }

    match serde_json::to_string_pretty(failure) {
        Ok(json) => eprintln!("   Full error: {}", json),
        Err(e) => eprintln!("   Full error unavailable: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use first_greet::ResponseEngine;

    #[test]
    fn test_describe_compensations() {
        assert_eq!(
            describe(&Compensation::DeleteLlm {
                llm_id: "llm_1".to_string()
            }),
            "deleted LLM llm_1"
        );
        assert_eq!(
            describe(&Compensation::RestoreAgentEngine {
                agent_id: "agent_1".to_string(),
                engine: ResponseEngine::RetellLlm {
                    llm_id: "llm_0".to_string(),
                    version: Some(4),
                },
            }),
            "pointed agent agent_1 back at LLM llm_0"
        );
        assert_eq!(
            describe(&Compensation::KeepAgentOnLlm {
                agent_id: "agent_1".to_string(),
                llm_id: "llm_new".to_string(),
            }),
            "kept LLM llm_new because agent agent_1 still uses it"
        );
    }
}
