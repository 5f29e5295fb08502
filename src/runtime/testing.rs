//! Mock implementations for testing
//!
//! These mocks enable integration testing without real I/O.

use super::traits::*;
use crate::llm::{LlmError, ToolDefinition};
use crate::state_machine::{AssistantReply, ToolRequest, Turn};
use crate::tools::{ToolOutput, ToolRegistry};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

// ============================================================================
// Mock Reasoner
// ============================================================================

/// One recorded reasoning call
#[derive(Debug, Clone)]
pub struct ReasoningCall {
    pub turns: Vec<Turn>,
    pub tools: Vec<ToolDefinition>,
}

/// Mock reasoner that returns queued replies
pub struct MockReasoner {
    replies: Mutex<VecDeque<Result<AssistantReply, LlmError>>>,
    /// Record of all calls made
    pub calls: Mutex<Vec<ReasoningCall>>,
}

impl MockReasoner {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful reply
    pub fn queue_reply(&self, reply: AssistantReply) {
        self.replies.lock().unwrap().push_back(Ok(reply));
    }

    /// Queue an error reply
    pub fn queue_error(&self, error: LlmError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded calls
    pub fn recorded_calls(&self) -> Vec<ReasoningCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockReasoner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReasoningClient for MockReasoner {
    async fn respond(
        &self,
        turns: &[Turn],
        tools: &[ToolDefinition],
    ) -> Result<AssistantReply, LlmError> {
        self.calls.lock().unwrap().push(ReasoningCall {
            turns: turns.to_vec(),
            tools: tools.to_vec(),
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::network("No mock reply queued")))
    }
}

// ============================================================================
// Recording Tool Executor
// ============================================================================

/// Real tool registry that records every execution
pub struct RecordingToolExecutor {
    registry: ToolRegistry,
    /// Record of tool executions
    pub executions: Mutex<Vec<ToolRequest>>,
}

impl RecordingToolExecutor {
    pub fn new() -> Self {
        Self {
            registry: ToolRegistry::new(),
            executions: Mutex::new(Vec::new()),
        }
    }

    /// Get recorded executions
    pub fn recorded_executions(&self) -> Vec<ToolRequest> {
        self.executions.lock().unwrap().clone()
    }
}

impl Default for RecordingToolExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolExecutor for RecordingToolExecutor {
    async fn execute(&self, request: &ToolRequest) -> Option<ToolOutput> {
        self.executions.lock().unwrap().push(request.clone());
        self.registry.execute(request).await
    }

    fn definitions(&self) -> Vec<ToolDefinition> {
        self.registry.definitions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AgentConfig;
    use crate::llm::{LlmErrorKind, Usage};
    use crate::runtime::{AgentRuntime, RunError};
    use serde_json::json;
    use std::sync::Arc;

    fn calc(id: &str, expr: &str) -> ToolRequest {
        ToolRequest::from_json(id, "calculator", &json!({ "expression": expr }))
    }

    fn runtime(
        reasoner: &Arc<MockReasoner>,
        tools: &Arc<RecordingToolExecutor>,
    ) -> AgentRuntime<Arc<MockReasoner>, Arc<RecordingToolExecutor>> {
        AgentRuntime::new(reasoner.clone(), tools.clone(), AgentConfig::default())
    }

    fn setup() -> (Arc<MockReasoner>, Arc<RecordingToolExecutor>) {
        (
            Arc::new(MockReasoner::new()),
            Arc::new(RecordingToolExecutor::new()),
        )
    }

    fn assistant_count(turns: &[Turn]) -> usize {
        turns.iter().filter(|t| t.is_assistant()).count()
    }

    #[tokio::test]
    async fn test_direct_answer_skips_tool() {
        let (reasoner, tools) = setup();
        reasoner.queue_reply(AssistantReply::text("Paris is the capital of France."));
        reasoner.queue_reply(AssistantReply::text("Paris."));

        let outcome = runtime(&reasoner, &tools)
            .run("What is the capital of France?")
            .await
            .unwrap();

        assert!(tools.recorded_executions().is_empty());
        assert_eq!(outcome.final_answer(), Some("Paris."));
        let turns = outcome.conversation.turns();
        assert_eq!(turns.len(), 3);
        assert_eq!(assistant_count(turns), 2);
        assert!(!turns.iter().any(|t| matches!(t, Turn::ToolResult { .. })));
    }

    #[tokio::test]
    async fn test_tool_request_runs_calculator_then_finalizes() {
        let (reasoner, tools) = setup();
        reasoner.queue_reply(AssistantReply::text("").with_tool_request(calc("call_1", "12 * (3 + 5) / 2")));
        reasoner.queue_reply(AssistantReply::text("The result is 48."));

        let outcome = runtime(&reasoner, &tools)
            .run("What is 12 * (3 + 5) / 2?")
            .await
            .unwrap();

        assert_eq!(tools.recorded_executions(), vec![calc("call_1", "12 * (3 + 5) / 2")]);
        assert_eq!(
            outcome.conversation.turns()[2],
            Turn::tool_result("48.0", "call_1")
        );
        assert_eq!(outcome.final_answer(), Some("The result is 48."));

        // Exactly two reasoning calls: plan is never revisited
        let calls = reasoner.recorded_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].tools.len(), 1);
        assert!(calls[1].tools.is_empty());
    }

    #[tokio::test]
    async fn test_end_to_end_default_question() {
        let (reasoner, tools) = setup();
        reasoner.queue_reply(
            AssistantReply::text("I'll compute that.")
                .with_tool_request(calc("call_1", "12 * (3 + 5) / 2 - 7")),
        );
        reasoner.queue_reply(AssistantReply::text("12 * 8 / 2 = 48, minus 7 gives 41."));

        let outcome = runtime(&reasoner, &tools)
            .run("Compute 12 * (3 + 5) / 2 and subtract 7.")
            .await
            .unwrap();

        assert!(outcome
            .conversation
            .turns()
            .contains(&Turn::tool_result("41.0", "call_1")));
        assert!(outcome.final_answer().unwrap().contains("41"));
    }

    #[tokio::test]
    async fn test_finalize_instruction_sent_but_not_stored() {
        let (reasoner, tools) = setup();
        reasoner.queue_reply(AssistantReply::text("8"));
        reasoner.queue_reply(AssistantReply::text("8"));

        let outcome = runtime(&reasoner, &tools).run("4 + 4?").await.unwrap();

        let calls = reasoner.recorded_calls();
        let instruction = AgentConfig::default().finalize_instruction;
        assert_eq!(calls[1].turns.last(), Some(&Turn::user(instruction.clone())));
        assert!(!outcome.conversation.turns().contains(&Turn::user(instruction)));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_skipped() {
        let (reasoner, tools) = setup();
        let request = ToolRequest::from_json("call_1", "weather", &json!({ "city": "Oslo" }));
        reasoner.queue_reply(AssistantReply::text("").with_tool_request(request));
        reasoner.queue_reply(AssistantReply::text("I cannot check the weather."));

        let outcome = runtime(&reasoner, &tools).run("Weather?").await.unwrap();

        assert_eq!(tools.recorded_executions().len(), 1);
        let turns = outcome.conversation.turns();
        assert!(!turns.iter().any(|t| matches!(t, Turn::ToolResult { .. })));
        assert_eq!(outcome.final_answer(), Some("I cannot check the weather."));
    }

    #[tokio::test]
    async fn test_rejected_expression_becomes_tool_content() {
        let (reasoner, tools) = setup();
        reasoner.queue_reply(AssistantReply::text("").with_tool_request(calc("call_1", "__import__('os')")));
        reasoner.queue_reply(AssistantReply::text("I can only do arithmetic."));

        let outcome = runtime(&reasoner, &tools).run("hack").await.unwrap();

        assert_eq!(
            outcome.conversation.turns()[2],
            Turn::tool_error("ERROR: only numeric expressions are allowed.", "call_1")
        );
        assert!(outcome.final_answer().is_some());
    }

    #[tokio::test]
    async fn test_finalize_tool_request_is_dropped() {
        let (reasoner, tools) = setup();
        reasoner.queue_reply(AssistantReply::text("9"));
        reasoner.queue_reply(AssistantReply::text("9").with_tool_request(calc("call_2", "3 * 3")));

        let outcome = runtime(&reasoner, &tools).run("3 * 3?").await.unwrap();

        assert!(tools.recorded_executions().is_empty());
        let last = outcome.conversation.turns().last().unwrap();
        assert_eq!(last, &Turn::assistant("9", None));
    }

    #[tokio::test]
    async fn test_plan_error_is_reasoning_failure() {
        let (reasoner, tools) = setup();
        reasoner.queue_error(LlmError::auth("bad key"));

        let err = runtime(&reasoner, &tools).run("1 + 1").await.unwrap_err();

        assert!(matches!(err, RunError::Reasoning(ref e) if e.kind == LlmErrorKind::Auth));
        // No retry
        assert_eq!(reasoner.recorded_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_finalize_error_is_reasoning_failure() {
        let (reasoner, tools) = setup();
        reasoner.queue_reply(AssistantReply::text("").with_tool_request(calc("call_1", "1 + 1")));
        reasoner.queue_error(LlmError::server_error("overloaded"));

        let err = runtime(&reasoner, &tools).run("1 + 1").await.unwrap_err();

        assert!(matches!(err, RunError::Reasoning(_)));
        assert_eq!(tools.recorded_executions().len(), 1);
    }

    #[tokio::test]
    async fn test_usage_accumulates_across_calls() {
        let (reasoner, tools) = setup();
        let usage = Usage {
            input_tokens: 10,
            output_tokens: 3,
        };
        reasoner.queue_reply(AssistantReply::text("2").with_usage(usage));
        reasoner.queue_reply(AssistantReply::text("2").with_usage(usage));

        let outcome = runtime(&reasoner, &tools).run("1 + 1").await.unwrap();

        assert_eq!(outcome.usage.input_tokens, 20);
        assert_eq!(outcome.usage.output_tokens, 6);
        assert!(!outcome.run_id.is_empty());
    }
}
