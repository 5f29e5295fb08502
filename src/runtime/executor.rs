//! Run executor: feeds events through the pure transition and performs effects

use super::traits::{ReasoningClient, ToolExecutor};
use super::{RunError, RunOutcome};
use crate::config::AgentConfig;
use crate::llm::Usage;
use crate::state_machine::{
    transition, ConversationState, Effect, Event, LoopContext, LoopState, ReasoningPhase, Turn,
};

/// Generic agent runtime that can work with any reasoner and tool implementations
pub struct AgentRuntime<R, T>
where
    R: ReasoningClient,
    T: ToolExecutor,
{
    reasoner: R,
    tools: T,
    config: AgentConfig,
}

/// Mutable state owned by a single run
struct Run {
    context: LoopContext,
    state: LoopState,
    conversation: ConversationState,
    usage: Usage,
}

impl<R, T> AgentRuntime<R, T>
where
    R: ReasoningClient,
    T: ToolExecutor,
{
    pub fn new(reasoner: R, tools: T, config: AgentConfig) -> Self {
        Self {
            reasoner,
            tools,
            config,
        }
    }

    /// Answer one question: plan, optionally run a tool, finalize.
    pub async fn run(&self, question: &str) -> Result<RunOutcome, RunError> {
        let run_id = uuid::Uuid::new_v4().to_string();
        tracing::info!(run_id = %run_id, model = %self.config.model_id, "Starting run");

        let mut run = Run {
            context: LoopContext::new(run_id),
            state: LoopState::default(),
            conversation: ConversationState::new(question),
            usage: Usage::default(),
        };

        let mut next_event = self.execute_effect(&mut run, Effect::request_plan()).await?;

        // Process events in a loop - each transition yields at most one follow-up event
        while let Some(event) = next_event.take() {
            let result = transition(&run.state, &run.conversation, &run.context, event)?;

            tracing::debug!(
                run_id = %run.context.run_id,
                from = %run.state,
                to = %result.new_state,
                effects = result.effects.len(),
                "State transition"
            );
            run.state = result.new_state;

            for effect in result.effects {
                if let Some(event) = self.execute_effect(&mut run, effect).await? {
                    next_event = Some(event);
                }
            }
        }

        if !run.state.is_terminal() {
            return Err(crate::state_machine::TransitionError::InvalidTransition(format!(
                "run stopped in {} without an event",
                run.state
            ))
            .into());
        }

        tracing::info!(
            run_id = %run.context.run_id,
            turns = run.conversation.turns().len(),
            input_tokens = run.usage.input_tokens,
            output_tokens = run.usage.output_tokens,
            "Run finished"
        );

        Ok(RunOutcome {
            run_id: run.context.run_id,
            conversation: run.conversation,
            usage: run.usage,
        })
    }

    async fn execute_effect(&self, run: &mut Run, effect: Effect) -> Result<Option<Event>, RunError> {
        match effect {
            Effect::AppendTurn(turn) => {
                run.conversation.append(turn)?;
                Ok(None)
            }

            Effect::RequestReasoning { phase } => {
                let reply = match phase {
                    ReasoningPhase::Plan => {
                        let tools = self.tools.definitions();
                        self.reasoner.respond(run.conversation.turns(), &tools).await
                    }
                    ReasoningPhase::Finalize => {
                        // The instruction is sent but never stored
                        let mut turns = run.conversation.turns().to_vec();
                        turns.push(Turn::user(self.config.finalize_instruction.clone()));
                        self.reasoner.respond(&turns, &[]).await
                    }
                };

                let reply = reply.map_err(|e| {
                    tracing::error!(
                        run_id = %run.context.run_id,
                        phase = ?phase,
                        error = %e,
                        "Reasoning failed"
                    );
                    RunError::Reasoning(e)
                })?;

                run.usage.add(reply.usage);
                if phase == ReasoningPhase::Finalize {
                    if let Some(request) = &reply.tool_request {
                        tracing::warn!(
                            run_id = %run.context.run_id,
                            tool = %request.tool_name,
                            "Dropping tool request from finalize reply"
                        );
                    }
                }

                Ok(Some(Event::ReasoningComplete { reply }))
            }

            Effect::ExecuteTool { request } => {
                tracing::info!(
                    run_id = %run.context.run_id,
                    tool = %request.tool_name,
                    tool_use_id = %request.id,
                    "Executing tool"
                );

                match self.tools.execute(&request).await {
                    Some(output) => {
                        tracing::info!(
                            run_id = %run.context.run_id,
                            success = output.success,
                            output = %output.output,
                            "Tool completed"
                        );
                        Ok(Some(Event::ToolComplete {
                            tool_use_id: request.id,
                            content: output.output,
                            is_error: !output.success,
                        }))
                    }
                    None => {
                        tracing::warn!(
                            run_id = %run.context.run_id,
                            tool = %request.tool_name,
                            "Unknown tool requested, skipping"
                        );
                        Ok(Some(Event::ToolSkipped {
                            reason: format!("unknown tool '{}'", request.tool_name),
                        }))
                    }
                }
            }

            Effect::SetFinalAnswer(answer) => {
                run.conversation.set_final_answer(answer)?;
                Ok(None)
            }
        }
    }
}
