//! Centralized model definitions for all LLM providers

use super::{AnthropicService, LlmService, OpenAIService};
use std::sync::Arc;

/// LLM provider enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Anthropic,
    OpenAI,
}

impl Provider {
    /// Get the environment variable name for this provider's API key
    pub fn api_key_env_var(self) -> &'static str {
        match self {
            Provider::Anthropic => "ANTHROPIC_API_KEY",
            Provider::OpenAI => "OPENAI_API_KEY",
        }
    }
}

/// Model definition with metadata
#[derive(Debug, Clone)]
pub struct ModelDef {
    /// User-facing model ID (e.g., "gpt-4o-mini")
    pub id: &'static str,
    /// Provider for this model
    pub provider: Provider,
    /// API name used by the provider
    pub api_name: &'static str,
    /// Reasoning models ignore sampling temperature
    pub reasoning: bool,
}

impl ModelDef {
    /// Create the provider service for this model
    pub fn build(&'static self, api_key: &str, gateway: Option<&str>) -> Arc<dyn LlmService> {
        match self.provider {
            Provider::Anthropic => {
                Arc::new(AnthropicService::new(api_key.to_string(), self, gateway))
            }
            Provider::OpenAI => Arc::new(OpenAIService::new(api_key.to_string(), self, gateway)),
        }
    }
}

static MODELS: &[ModelDef] = &[
    ModelDef {
        id: "gpt-4o-mini",
        provider: Provider::OpenAI,
        api_name: "gpt-4o-mini",
        reasoning: false,
    },
    ModelDef {
        id: "gpt-4o",
        provider: Provider::OpenAI,
        api_name: "gpt-4o",
        reasoning: false,
    },
    ModelDef {
        id: "gpt-4.1-mini",
        provider: Provider::OpenAI,
        api_name: "gpt-4.1-mini",
        reasoning: false,
    },
    ModelDef {
        id: "o4-mini",
        provider: Provider::OpenAI,
        api_name: "o4-mini",
        reasoning: true,
    },
    ModelDef {
        id: "claude-4.5-haiku",
        provider: Provider::Anthropic,
        api_name: "claude-haiku-4-5-20251001",
        reasoning: false,
    },
    ModelDef {
        id: "claude-4.5-sonnet",
        provider: Provider::Anthropic,
        api_name: "claude-sonnet-4-5-20250929",
        reasoning: false,
    },
];

/// Get all available model definitions
pub fn all_models() -> &'static [ModelDef] {
    MODELS
}

/// Look up a model definition by its user-facing ID
pub fn find_model(id: &str) -> Option<&'static ModelDef> {
    MODELS.iter().find(|m| m.id == id)
}
