//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the executor with mock implementations.

use crate::config::AgentConfig;
use crate::llm::{
    ContentBlock, LlmError, LlmMessage, LlmRequest, LlmResponse, LlmService, SystemContent,
    ToolDefinition,
};
use crate::state_machine::{AssistantReply, ToolRequest, Turn};
use crate::tools::{ToolOutput, ToolRegistry};
use async_trait::async_trait;
use std::sync::Arc;

/// Source of assistant turns
#[async_trait]
pub trait ReasoningClient: Send + Sync {
    /// Produce the next assistant reply for the given turns.
    ///
    /// An empty `tools` slice means no tool may be requested.
    async fn respond(
        &self,
        turns: &[Turn],
        tools: &[ToolDefinition],
    ) -> Result<AssistantReply, LlmError>;
}

/// Executor for tools
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Execute a tool request; `None` when the tool is not registered
    async fn execute(&self, request: &ToolRequest) -> Option<ToolOutput>;

    /// Get tool definitions for LLM
    fn definitions(&self) -> Vec<ToolDefinition>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: ReasoningClient + ?Sized> ReasoningClient for Arc<T> {
    async fn respond(
        &self,
        turns: &[Turn],
        tools: &[ToolDefinition],
    ) -> Result<AssistantReply, LlmError> {
        (**self).respond(turns, tools).await
    }
}

#[async_trait]
impl<T: ToolExecutor + ?Sized> ToolExecutor for Arc<T> {
    async fn execute(&self, request: &ToolRequest) -> Option<ToolOutput> {
        (**self).execute(request).await
    }

    fn definitions(&self) -> Vec<ToolDefinition> {
        (**self).definitions()
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

/// Reasoner backed by an [`LlmService`]
pub struct LlmReasoner {
    llm: Arc<dyn LlmService>,
    config: AgentConfig,
}

impl LlmReasoner {
    pub fn new(llm: Arc<dyn LlmService>, config: AgentConfig) -> Self {
        Self { llm, config }
    }

    fn build_request(&self, turns: &[Turn], tools: &[ToolDefinition]) -> LlmRequest {
        LlmRequest {
            system: vec![SystemContent::new(self.config.system_prompt.clone())],
            messages: turns.iter().map(turn_to_message).collect(),
            tools: tools.to_vec(),
            max_tokens: Some(self.config.max_tokens),
            temperature: Some(self.config.temperature),
        }
    }
}

#[async_trait]
impl ReasoningClient for LlmReasoner {
    async fn respond(
        &self,
        turns: &[Turn],
        tools: &[ToolDefinition],
    ) -> Result<AssistantReply, LlmError> {
        let request = self.build_request(turns, tools);
        let response = self.llm.complete(&request).await?;
        Ok(reply_from_response(&response))
    }
}

/// Stands in for an assistant turn that said nothing and requested nothing;
/// providers reject empty text blocks.
const EMPTY_REPLY_TEXT: &str = "(no response)";

/// Translate a conversation turn to a provider-neutral message
fn turn_to_message(turn: &Turn) -> LlmMessage {
    match turn {
        Turn::User { text } => LlmMessage::user(vec![ContentBlock::text(text.clone())]),
        Turn::Assistant { text, tool_request } => {
            let mut content = Vec::new();
            if !text.trim().is_empty() {
                content.push(ContentBlock::text(text.clone()));
            }
            if let Some(request) = tool_request {
                content.push(ContentBlock::tool_use(
                    request.id.clone(),
                    request.tool_name.clone(),
                    request.arguments_json(),
                ));
            }
            if content.is_empty() {
                content.push(ContentBlock::text(EMPTY_REPLY_TEXT));
            }
            LlmMessage::assistant(content)
        }
        Turn::ToolResult {
            content,
            tool_use_id,
            is_error,
        } => LlmMessage::user(vec![ContentBlock::tool_result(
            tool_use_id.clone(),
            content.clone(),
            *is_error,
        )]),
    }
}

/// Keep the text and at most one tool request
fn reply_from_response(response: &LlmResponse) -> AssistantReply {
    let tool_uses = response.tool_uses();
    if tool_uses.len() > 1 {
        tracing::warn!(
            count = tool_uses.len(),
            "Model requested several tools; only the first is kept"
        );
    }

    AssistantReply {
        text: response.text(),
        tool_request: tool_uses
            .first()
            .map(|(id, name, input)| ToolRequest::from_json(*id, *name, input)),
        usage: response.usage,
    }
}

#[async_trait]
impl ToolExecutor for ToolRegistry {
    async fn execute(&self, request: &ToolRequest) -> Option<ToolOutput> {
        ToolRegistry::execute(self, request).await
    }

    fn definitions(&self) -> Vec<ToolDefinition> {
        ToolRegistry::definitions(self)
    }
}
