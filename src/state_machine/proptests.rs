//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across arbitrary event sequences.

use super::*;
use crate::llm::Usage;
use proptest::prelude::*;
use std::collections::BTreeMap;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context() -> LoopContext {
    LoopContext::new("test-run")
}

/// Apply effects the way the executor does, minus the I/O
fn apply_effects(conv: &mut ConversationState, effects: &[Effect]) -> Result<(), ConversationError> {
    for effect in effects {
        match effect {
            Effect::AppendTurn(turn) => conv.append(turn.clone())?,
            Effect::SetFinalAnswer(text) => conv.set_final_answer(text.clone())?,
            Effect::RequestReasoning { .. } | Effect::ExecuteTool { .. } => {}
        }
    }
    Ok(())
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_id() -> impl Strategy<Value = String> {
    prop_oneof![Just("call_a".to_string()), Just("call_b".to_string())]
}

fn arb_tool_request() -> impl Strategy<Value = ToolRequest> {
    (
        arb_id(),
        prop_oneof![Just("calculator"), Just("weather")],
        "[0-9+*/ ()-]{0,12}",
    )
        .prop_map(|(id, name, expr)| {
            let mut arguments = BTreeMap::new();
            arguments.insert("expression".to_string(), expr);
            ToolRequest::new(id, name, arguments)
        })
}

fn arb_reply() -> impl Strategy<Value = AssistantReply> {
    ("[a-zA-Z0-9 .]{0,20}", proptest::option::of(arb_tool_request())).prop_map(
        |(text, tool_request)| AssistantReply {
            text,
            tool_request,
            usage: Usage::default(),
        },
    )
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_reply().prop_map(|reply| Event::ReasoningComplete { reply }),
        (arb_id(), "[0-9.]{1,6}", any::<bool>()).prop_map(|(tool_use_id, content, is_error)| {
            Event::ToolComplete {
                tool_use_id,
                content,
                is_error,
            }
        }),
        "[a-z ]{1,10}".prop_map(|reason| Event::ToolSkipped { reason }),
    ]
}

fn arb_state() -> impl Strategy<Value = LoopState> {
    prop_oneof![
        Just(LoopState::Plan),
        arb_tool_request().prop_map(|request| LoopState::ToolExec { request }),
        Just(LoopState::Finalize),
        Just(LoopState::Done),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_transition_is_deterministic(state in arb_state(), event in arb_event()) {
        let conv = ConversationState::new("q");
        let ctx = test_context();
        let first = transition(&state, &conv, &ctx, event.clone());
        let second = transition(&state, &conv, &ctx, event);
        match (first, second) {
            (Ok(a), Ok(b)) => {
                prop_assert_eq!(a.new_state, b.new_state);
                prop_assert_eq!(a.effects, b.effects);
            }
            (Err(_), Err(_)) => {}
            _ => prop_assert!(false, "transition outcome differed between calls"),
        }
    }

    #[test]
    fn prop_done_is_terminal(event in arb_event()) {
        let conv = ConversationState::new("q");
        prop_assert!(transition(&LoopState::Done, &conv, &test_context(), event).is_err());
    }

    #[test]
    fn prop_event_sequences_keep_loop_invariants(events in proptest::collection::vec(arb_event(), 1..12)) {
        let ctx = test_context();
        let mut state = LoopState::Plan;
        let mut conv = ConversationState::new("q");
        let mut left_plan = false;
        let mut tool_executions = 0;

        for event in events {
            let Ok(result) = transition(&state, &conv, &ctx, event) else {
                // Rejected events leave everything untouched
                continue;
            };

            tool_executions += result
                .effects
                .iter()
                .filter(|e| matches!(e, Effect::ExecuteTool { .. }))
                .count();

            // Accepted transitions never break the log's correlation rules
            prop_assert!(apply_effects(&mut conv, &result.effects).is_ok());

            state = result.new_state;
            if state != LoopState::Plan {
                left_plan = true;
            }
            prop_assert!(!(left_plan && state == LoopState::Plan), "plan revisited");
        }

        prop_assert!(tool_executions <= 1);
        prop_assert_eq!(conv.final_answer().is_some(), state.is_terminal());

        let assistant_turns = conv.turns().iter().filter(|t| t.is_assistant()).count();
        prop_assert!(assistant_turns <= 2);
        if state.is_terminal() {
            prop_assert_eq!(assistant_turns, 2);
            // The final assistant turn never carries a tool request
            prop_assert!(conv.latest_assistant().and_then(Turn::tool_request).is_none());
        }
    }

    #[test]
    fn prop_tool_results_always_answer_their_request(reply in arb_reply(), content in "[0-9]{1,4}") {
        let ctx = test_context();
        let mut conv = ConversationState::new("q");
        let planned = transition(&LoopState::Plan, &conv, &ctx, Event::ReasoningComplete { reply }).unwrap();
        apply_effects(&mut conv, &planned.effects).unwrap();

        if let LoopState::ToolExec { request } = &planned.new_state {
            let done = transition(
                &planned.new_state,
                &conv,
                &ctx,
                Event::ToolComplete { tool_use_id: request.id.clone(), content, is_error: false },
            )
            .unwrap();
            apply_effects(&mut conv, &done.effects).unwrap();

            match conv.turns().last() {
                Some(Turn::ToolResult { tool_use_id, .. }) => prop_assert_eq!(tool_use_id, &request.id),
                other => prop_assert!(false, "expected tool result, got {:?}", other),
            }
        } else {
            prop_assert_eq!(planned.new_state, LoopState::Finalize);
        }
    }
}
