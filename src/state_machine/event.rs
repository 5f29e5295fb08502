//! Events that drive the control loop

use super::state::ToolRequest;
use crate::llm::Usage;

/// Assistant output returned by the reasoner
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantReply {
    pub text: String,
    pub tool_request: Option<ToolRequest>,
    pub usage: Usage,
}

impl AssistantReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tool_request: None,
            usage: Usage::default(),
        }
    }

    pub fn with_tool_request(mut self, request: ToolRequest) -> Self {
        self.tool_request = Some(request);
        self
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = usage;
        self
    }
}

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    /// The reasoner answered a plan or finalize request
    ReasoningComplete { reply: AssistantReply },

    /// The requested tool produced content
    ToolComplete {
        tool_use_id: String,
        content: String,
        is_error: bool,
    },

    /// No tool was run (unknown tool or nothing requested)
    ToolSkipped { reason: String },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::ReasoningComplete { .. } => "reasoning_complete",
            Event::ToolComplete { .. } => "tool_complete",
            Event::ToolSkipped { .. } => "tool_skipped",
        }
    }
}
