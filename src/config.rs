//! Agent configuration

use crate::llm::{find_model, DEFAULT_MODEL};
use crate::system_prompt::{FINALIZE_INSTRUCTION, SYSTEM_PROMPT};
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_TEMPERATURE: f32 = 0.0;
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Errors in environment configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown model '{0}'")]
    UnknownModel(String),
    #[error("no credentials for model '{model}'; set {env_var} or LLM_GATEWAY")]
    MissingCredentials { model: String, env_var: String },
    #[error("invalid value for {name}: '{value}'")]
    InvalidNumber { name: String, value: String },
}

/// Immutable settings shared by every reasoning call in a run
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    pub model_id: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub system_prompt: String,
    /// Sent after the log on the finalize call, never stored in it
    pub finalize_instruction: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            system_prompt: SYSTEM_PROMPT.to_string(),
            finalize_instruction: FINALIZE_INSTRUCTION.to_string(),
        }
    }
}

impl AgentConfig {
    /// Read `ABACUS_MODEL`, `ABACUS_TEMPERATURE` and `ABACUS_MAX_TOKENS`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(model) = var("ABACUS_MODEL") {
            if find_model(&model).is_none() {
                return Err(ConfigError::UnknownModel(model));
            }
            config.model_id = model;
        }
        if let Some(raw) = var("ABACUS_TEMPERATURE") {
            config.temperature = parse_number("ABACUS_TEMPERATURE", &raw)?;
        }
        if let Some(raw) = var("ABACUS_MAX_TOKENS") {
            config.max_tokens = parse_number("ABACUS_MAX_TOKENS", &raw)?;
        }
        Ok(config)
    }
}

fn parse_number<T: FromStr>(name: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        name: name.to_string(),
        value: raw.to_string(),
    })
}
