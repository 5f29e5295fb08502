//! Plain-text rendering of a finished run

use crate::state_machine::{ConversationState, Turn};

/// Render one turn as a trace line
pub fn trace_line(turn: &Turn) -> String {
    match turn {
        Turn::User { text } => format!("[human] {text}"),
        Turn::Assistant { text, tool_request } => match tool_request {
            Some(request) if text.trim().is_empty() => format!("[ai] -> {request}"),
            Some(request) => format!("[ai] {text} -> {request}"),
            None => format!("[ai] {text}"),
        },
        Turn::ToolResult { content, .. } => format!("[tool] {content}"),
    }
}

/// Final answer, a blank line, then the trace of every turn
pub fn render(conversation: &ConversationState) -> String {
    let mut out = format!(
        "Final answer: {}\n\n--- Trace messages ---\n",
        conversation.final_answer().unwrap_or_default()
    );
    for turn in conversation.turns() {
        out.push_str(&trace_line(turn));
        out.push('\n');
    }
    out
}
