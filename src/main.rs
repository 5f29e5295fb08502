//! abacus - answer one arithmetic question with an LLM and a calculator tool

use abacus::config::{AgentConfig, ConfigError};
use abacus::llm::{find_model, LlmConfig, ModelRegistry};
use abacus::report;
use abacus::runtime::{LlmReasoner, ProductionRuntime};
use abacus::tools::ToolRegistry;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_QUESTION: &str = "Compute 12 * (3 + 5) / 2 and subtract 7.";

/// Answer an arithmetic question with an LLM and a sandboxed calculator.
#[derive(Parser, Debug)]
#[command(name = "abacus", version)]
struct Args {
    /// Question to answer; words are joined with spaces
    #[arg(trailing_var_arg = true, allow_negative_numbers = true)]
    question: Vec<String>,
}

impl Args {
    fn question(&self) -> String {
        if self.question.is_empty() {
            DEFAULT_QUESTION.to_string()
        } else {
            self.question.join(" ")
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize logging; stdout is reserved for the report
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "abacus=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let question = args.question();

    // Configuration
    let agent_config = AgentConfig::from_env()?;
    let llm_registry = ModelRegistry::new(&LlmConfig::from_env());

    if llm_registry.has_models() {
        tracing::info!(
            models = ?llm_registry.available_models(),
            model = %agent_config.model_id,
            "LLM registry initialized"
        );
    } else {
        tracing::warn!("No LLM API keys configured. Set OPENAI_API_KEY, ANTHROPIC_API_KEY or LLM_GATEWAY.");
    }

    let llm = llm_registry.get(&agent_config.model_id).ok_or_else(|| {
        ConfigError::MissingCredentials {
            model: agent_config.model_id.clone(),
            env_var: find_model(&agent_config.model_id)
                .map_or("an API key", |m| m.provider.api_key_env_var())
                .to_string(),
        }
    })?;

    let runtime = ProductionRuntime::new(
        LlmReasoner::new(llm, agent_config.clone()),
        ToolRegistry::new(),
        agent_config,
    );

    match runtime.run(&question).await {
        Ok(outcome) => {
            print!("{}", report::render(&outcome.conversation));
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Run failed");
            Err(e.into())
        }
    }
}
