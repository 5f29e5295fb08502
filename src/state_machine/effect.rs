//! Effects produced by state transitions

use super::state::{ToolRequest, Turn};

/// Which reasoning call is being made
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasoningPhase {
    /// Tools offered; the reply may request one
    Plan,
    /// No tools offered; the reply is the answer
    Finalize,
}

/// Effects to be executed after a state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Append a turn to the conversation log
    AppendTurn(Turn),

    /// Call the reasoner with the current log
    RequestReasoning { phase: ReasoningPhase },

    /// Run a tool
    ExecuteTool { request: ToolRequest },

    /// Fill the final answer slot
    SetFinalAnswer(String),
}

impl Effect {
    pub fn request_plan() -> Self {
        Effect::RequestReasoning {
            phase: ReasoningPhase::Plan,
        }
    }

    pub fn request_finalize() -> Self {
        Effect::RequestReasoning {
            phase: ReasoningPhase::Finalize,
        }
    }

    pub fn execute_tool(request: ToolRequest) -> Self {
        Effect::ExecuteTool { request }
    }
}
