//! Turn-taking control loop
//!
//! Implements the Elm Architecture pattern with pure state transitions.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::{Effect, ReasoningPhase};
pub use event::{AssistantReply, Event};
pub use state::{ConversationError, ConversationState, LoopContext, LoopState, ToolRequest, Turn};
pub use transition::{route, transition, Route, TransitionError, TransitionResult};
