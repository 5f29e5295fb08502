//! Runtime for executing agent runs

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::AgentRuntime;
pub use traits::*;

use crate::llm::{LlmError, Usage};
use crate::state_machine::{ConversationError, ConversationState, TransitionError};
use crate::tools::ToolRegistry;
use thiserror::Error;

/// Type alias for production runtime with concrete implementations
pub type ProductionRuntime = AgentRuntime<LlmReasoner, ToolRegistry>;

/// Errors that end a run without a final answer
#[derive(Debug, Error)]
pub enum RunError {
    #[error("reasoning failed: {0}")]
    Reasoning(#[source] LlmError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Conversation(#[from] ConversationError),
}

/// Everything a caller gets back from a finished run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub run_id: String,
    pub conversation: ConversationState,
    pub usage: Usage,
}

impl RunOutcome {
    pub fn final_answer(&self) -> Option<&str> {
        self.conversation.final_answer()
    }
}
