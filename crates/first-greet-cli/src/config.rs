//! Configuration management for the First Greet CLI
//!
//! Settings come from ~/.config/first-greet/config.toml (or `--config`),
//! then environment variables (a `.env` file is honoured), then CLI flags.

use anyhow::{bail, Context, Result};
use first_greet::{screening, E164Number};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_DIR: &str = "first-greet";
const CONFIG_FILE: &str = "config.toml";

pub const ENV_API_KEY: &str = "RETELL_API_KEY";
pub const ENV_BASE_URL: &str = "RETELL_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "RETELL_TIMEOUT_SECS";
pub const ENV_TRANSFER_NUMBER: &str = "FIRST_GREET_TRANSFER_NUMBER";
pub const ENV_AGENT_NAME: &str = "FIRST_GREET_AGENT_NAME";
pub const ENV_AGENT_ID: &str = "FIRST_GREET_AGENT_ID";
pub const ENV_PHONE_NICKNAME: &str = "FIRST_GREET_PHONE_NICKNAME";

/// Raw configuration, as read from file and environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Number the warm transfer dials
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_number: Option<String>,
    #[serde(default = "default_agent_name")]
    pub agent_name: String,
    /// Pin the agent by id instead of matching its name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(default = "default_agent_name")]
    pub phone_nickname: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.retellai.com".to_string()
}

fn default_agent_name() -> String {
    screening::DEFAULT_AGENT_NAME.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            transfer_number: None,
            agent_name: default_agent_name(),
            agent_id: None,
            phone_nickname: default_agent_name(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Validated settings for one run
#[derive(Clone)]
pub struct Settings {
    pub api_key: String,
    pub base_url: String,
    pub transfer_number: E164Number,
    pub agent_name: String,
    pub agent_id: Option<String>,
    pub phone_nickname: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &mask_key(&self.api_key))
            .field("base_url", &self.base_url)
            .field("transfer_number", &self.transfer_number)
            .field("agent_name", &self.agent_name)
            .field("agent_id", &self.agent_id)
            .field("phone_nickname", &self.phone_nickname)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join(CONFIG_DIR);
        Ok(config_dir)
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load config from an explicit file, or the default file if it exists
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = Self::config_path()?;
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        Self::from_toml(&content).with_context(|| format!("Failed to parse config file {:?}", path))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup; empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(ENV_API_KEY) {
            self.api_key = Some(v);
        }
        if let Some(v) = get(ENV_BASE_URL) {
            self.base_url = v;
        }
        if let Some(v) = get(ENV_TRANSFER_NUMBER) {
            self.transfer_number = Some(v);
        }
        if let Some(v) = get(ENV_AGENT_NAME) {
            self.agent_name = v;
        }
        if let Some(v) = get(ENV_AGENT_ID) {
            self.agent_id = Some(v);
        }
        if let Some(v) = get(ENV_PHONE_NICKNAME) {
            self.phone_nickname = v;
        }
        if let Some(v) = get(ENV_TIMEOUT_SECS) {
            self.timeout_secs = v
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number of seconds", ENV_TIMEOUT_SECS))?;
        }

        Ok(())
    }

    /// Transfer number only; enough to render the dialogue offline
    pub fn transfer_number(&self) -> Result<E164Number> {
        let raw = self.transfer_number.as_deref().with_context(|| {
            format!(
                "No transfer number configured. Set {} or transfer_number in the config file.",
                ENV_TRANSFER_NUMBER
            )
        })?;
        Ok(E164Number::parse(raw)?)
    }

    /// Validate everything a provisioning run needs
    pub fn resolve(&self) -> Result<Settings> {
        let api_key = match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => bail!(
                "No API key configured. Set {} or api_key in the config file.",
                ENV_API_KEY
            ),
        };

        let base_url = self.base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            bail!("base_url must be an http(s) URL, got '{}'", self.base_url);
        }

        let transfer_number = self.transfer_number()?;

        if self.agent_name.trim().is_empty() {
            bail!("agent_name must not be empty");
        }
        if self.phone_nickname.trim().is_empty() {
            bail!("phone_nickname must not be empty");
        }
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be positive");
        }

        Ok(Settings {
            api_key,
            base_url,
            transfer_number,
            agent_name: self.agent_name.clone(),
            agent_id: self
                .agent_id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
            phone_nickname: self.phone_nickname.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }
}

/// Show only the tail of a secret
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}
