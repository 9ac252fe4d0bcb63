//! First Greet CLI - one-shot provisioning
//!
//! Creates the screening LLM on Retell, binds it to the First Greet agent and
//! makes sure the First Greet phone number routes to that agent.

mod api;
mod config;
mod report;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use first_greet::{screening, AgentTarget, ProvisionFailure, ProvisionPlan, ProvisionService};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use api::RetellClient;
use config::{mask_key, Config};
use report::ConsoleReporter;

#[derive(Parser)]
#[command(name = "first-greet")]
#[command(about = "Provision the First Greet call-screening assistant", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.config/first-greet/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Defaults to `setup`
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the LLM, bind the agent and verify the phone number
    Setup(SetupArgs),

    /// Print the dialogue document without calling the API
    Render {
        /// Number the warm transfer dials (E.164)
        #[arg(long)]
        transfer_number: Option<String>,
    },

    /// Show current configuration
    Config,
}

#[derive(Args, Default)]
struct SetupArgs {
    /// Update this agent id instead of matching by name
    #[arg(long)]
    agent_id: Option<String>,

    /// Number the warm transfer dials (E.164)
    #[arg(long)]
    transfer_number: Option<String>,

    /// Undo completed steps when a later step fails
    #[arg(long)]
    rollback: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli.config.as_deref();
    let result = match cli.command.unwrap_or(Commands::Setup(SetupArgs::default())) {
        Commands::Setup(args) => cmd_setup(config_path, args).await,
        Commands::Render { transfer_number } => cmd_render(config_path, transfer_number),
        Commands::Config => cmd_config(config_path),
    };

    ExitCode::from(exit_status(&result))
}

/// Report an error, if any, and pick the process exit status
fn exit_status(result: &Result<()>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            match e.downcast_ref::<ProvisionFailure>() {
                Some(failure) => report::print_failure(failure),
                None => eprintln!("{} {:#}", "Error:".red(), e),
            }
            1
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// File, then environment
fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    let mut config = Config::load(path)?;
    config
        .apply_env()
        .context("Invalid environment configuration")?;
    Ok(config)
}

// ============================================
// Command Implementations
// ============================================

async fn cmd_setup(config_path: Option<&std::path::Path>, args: SetupArgs) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(id) = args.agent_id {
        config.agent_id = Some(id);
    }
    if let Some(number) = args.transfer_number {
        config.transfer_number = Some(number);
    }
    let settings = config.resolve()?;

    println!("{}\n", "🚀 Starting First Greet setup...".bold());
    tracing::debug!(base_url = %settings.base_url, agent_name = %settings.agent_name, "Resolved settings");

    let mut target = AgentTarget::by_name(&settings.agent_name);
    if let Some(id) = &settings.agent_id {
        target = target.with_pinned_id(id);
    }
    let mut plan = ProvisionPlan::new(
        screening::dialogue(&settings.transfer_number),
        target,
        &settings.phone_nickname,
    );
    if args.rollback {
        plan = plan.with_rollback();
    }

    let client = RetellClient::from_settings(&settings)?;
    let service = ProvisionService::new(Arc::new(client));
    let mut reporter = ConsoleReporter::new(&settings.agent_name, &settings.phone_nickname);

    let outcome = service.run(&plan, &mut reporter).await?;
    report::print_summary(&outcome);

    Ok(())
}

fn cmd_render(config_path: Option<&std::path::Path>, transfer_number: Option<String>) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(number) = transfer_number {
        config.transfer_number = Some(number);
    }

    let document = screening::dialogue(&config.transfer_number()?);
    document.validate()?;

    let json = serde_json::to_string_pretty(&document).context("Failed to serialize dialogue")?;
    println!("{}", json);

    Ok(())
}

fn cmd_config(config_path: Option<&std::path::Path>) -> Result<()> {
    let config = load_config(config_path)?;

    println!("{}", "Configuration:".bold());
    match config_path {
        Some(path) => println!("  Path: {:?}", path),
        None => println!("  Path: {:?}", Config::config_path()?),
    }
    println!("  Base URL: {}", config.base_url);
    println!(
        "  API Key: {}",
        match config.api_key.as_deref() {
            Some(key) => mask_key(key).green(),
            None => "Not set".red(),
        }
    );
    println!(
        "  Transfer Number: {}",
        config.transfer_number.as_deref().unwrap_or("Not set").cyan()
    );
    println!("  Agent Name: {}", config.agent_name.cyan());
    println!(
        "  Agent ID: {}",
        config.agent_id.as_deref().unwrap_or("None (match by name)")
    );
    println!("  Phone Nickname: {}", config.phone_nickname);
    println!("  Timeout: {}s", config.timeout_secs);

    Ok(())
}
