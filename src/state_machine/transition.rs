//! Pure state transition function

use super::effect::Effect;
use super::event::Event;
use super::state::{ConversationState, LoopContext, LoopState, ToolRequest, Turn};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: LoopState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: LoopState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Where the loop goes after a planning reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Tool(ToolRequest),
    Answer,
}

/// Decision rule: inspect only the most recent assistant turn
pub fn route(latest: Option<&Turn>) -> Route {
    match latest.and_then(Turn::tool_request) {
        Some(request) => Route::Tool(request.clone()),
        None => Route::Answer,
    }
}

/// Pure transition function.
///
/// Given the same inputs it always produces the same outputs, with no I/O.
/// The conversation is the log as it stood before this event's effects.
pub fn transition(
    state: &LoopState,
    conversation: &ConversationState,
    context: &LoopContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        (LoopState::Plan, Event::ReasoningComplete { reply }) => {
            let turn = Turn::assistant(reply.text, reply.tool_request);
            let next = match route(Some(&turn)) {
                Route::Tool(request) => TransitionResult::new(LoopState::ToolExec {
                    request: request.clone(),
                })
                .with_effect(Effect::AppendTurn(turn))
                .with_effect(Effect::execute_tool(request)),
                Route::Answer => TransitionResult::new(LoopState::Finalize)
                    .with_effect(Effect::AppendTurn(turn))
                    .with_effect(Effect::request_finalize()),
            };
            Ok(next)
        }

        (
            LoopState::ToolExec { request },
            Event::ToolComplete {
                tool_use_id,
                content,
                is_error,
            },
        ) => {
            if tool_use_id != request.id {
                return Err(TransitionError::InvalidTransition(format!(
                    "run {}: tool result {tool_use_id} does not match outstanding request {}",
                    context.run_id, request.id
                )));
            }
            if conversation.outstanding_request() != Some(request) {
                return Err(TransitionError::InvalidTransition(format!(
                    "run {}: request {} is not the latest turn",
                    context.run_id, request.id
                )));
            }
            let turn = Turn::ToolResult {
                content,
                tool_use_id,
                is_error,
            };
            Ok(TransitionResult::new(LoopState::Finalize)
                .with_effect(Effect::AppendTurn(turn))
                .with_effect(Effect::request_finalize()))
        }

        (LoopState::ToolExec { .. }, Event::ToolSkipped { .. }) => {
            Ok(TransitionResult::new(LoopState::Finalize).with_effect(Effect::request_finalize()))
        }

        // Tool requests in a finalize reply are dropped
        (LoopState::Finalize, Event::ReasoningComplete { reply }) => {
            Ok(TransitionResult::new(LoopState::Done)
                .with_effect(Effect::AppendTurn(Turn::assistant(reply.text.clone(), None)))
                .with_effect(Effect::SetFinalAnswer(reply.text)))
        }

        (LoopState::Done, event) => Err(TransitionError::InvalidTransition(format!(
            "run {} already finished, got {}",
            context.run_id,
            event.name()
        ))),

        (state, event) => Err(TransitionError::InvalidTransition(format!(
            "run {}: {} cannot handle {}",
            context.run_id,
            state,
            event.name()
        ))),
    }
}
