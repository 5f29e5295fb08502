//! Loop state and conversation log types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

// ============================================================================
// Tool Requests
// ============================================================================

/// A single tool invocation requested by the reasoner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolRequest {
    /// Correlation id linking the request to its tool result
    pub id: String,
    pub tool_name: String,
    pub arguments: BTreeMap<String, String>,
}

impl ToolRequest {
    pub fn new(
        id: impl Into<String>,
        tool_name: impl Into<String>,
        arguments: BTreeMap<String, String>,
    ) -> Self {
        Self {
            id: id.into(),
            tool_name: tool_name.into(),
            arguments,
        }
    }

    /// Build a request from provider JSON input.
    ///
    /// String values are kept verbatim; everything else is stored as compact
    /// JSON text. Non-object input yields no arguments.
    pub fn from_json(id: impl Into<String>, tool_name: impl Into<String>, input: &Value) -> Self {
        let arguments = match input {
            Value::Object(map) => map
                .iter()
                .map(|(k, v)| {
                    let text = match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    (k.clone(), text)
                })
                .collect(),
            _ => BTreeMap::new(),
        };
        Self::new(id, tool_name, arguments)
    }

    pub fn argument(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).map(String::as_str)
    }

    /// Arguments as a JSON object, for replaying the request to a provider
    pub fn arguments_json(&self) -> Value {
        Value::Object(
            self.arguments
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
        )
    }
}

impl fmt::Display for ToolRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.tool_name)?;
        for (i, (key, value)) in self.arguments.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key}={value}")?;
        }
        write!(f, ")")
    }
}

// ============================================================================
// Turns
// ============================================================================

/// One entry in the conversation log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Turn {
    User {
        text: String,
    },
    Assistant {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tool_request: Option<ToolRequest>,
    },
    ToolResult {
        content: String,
        tool_use_id: String,
        /// The tool ran but rejected its input
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        is_error: bool,
    },
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Turn::User { text: text.into() }
    }

    pub fn assistant(text: impl Into<String>, tool_request: Option<ToolRequest>) -> Self {
        Turn::Assistant {
            text: text.into(),
            tool_request,
        }
    }

    pub fn tool_result(content: impl Into<String>, tool_use_id: impl Into<String>) -> Self {
        Turn::ToolResult {
            content: content.into(),
            tool_use_id: tool_use_id.into(),
            is_error: false,
        }
    }

    pub fn tool_error(content: impl Into<String>, tool_use_id: impl Into<String>) -> Self {
        Turn::ToolResult {
            content: content.into(),
            tool_use_id: tool_use_id.into(),
            is_error: true,
        }
    }

    pub fn is_assistant(&self) -> bool {
        matches!(self, Turn::Assistant { .. })
    }

    pub fn tool_request(&self) -> Option<&ToolRequest> {
        match self {
            Turn::Assistant { tool_request, .. } => tool_request.as_ref(),
            _ => None,
        }
    }
}

// ============================================================================
// Conversation State
// ============================================================================

/// Errors raised when an append would break the log's invariants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversationError {
    #[error("tool result {tool_use_id} does not answer the preceding request ({expected:?})")]
    UncorrelatedToolResult {
        tool_use_id: String,
        expected: Option<String>,
    },
    #[error("final answer already set")]
    FinalAnswerAlreadySet,
}

/// Append-only turn log plus the final answer slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationState {
    turns: Vec<Turn>,
    final_answer: Option<String>,
}

impl ConversationState {
    /// Start a conversation from the initiating user request
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::user(question)],
            final_answer: None,
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn final_answer(&self) -> Option<&str> {
        self.final_answer.as_deref()
    }

    /// The most recent assistant turn, if any
    pub fn latest_assistant(&self) -> Option<&Turn> {
        self.turns.iter().rev().find(|t| t.is_assistant())
    }

    /// The request a tool result would currently have to answer
    pub fn outstanding_request(&self) -> Option<&ToolRequest> {
        self.turns.last().and_then(Turn::tool_request)
    }

    /// Append a turn, enforcing tool-result correlation
    pub fn append(&mut self, turn: Turn) -> Result<(), ConversationError> {
        if let Turn::ToolResult { tool_use_id, .. } = &turn {
            let expected = self.outstanding_request().map(|r| r.id.clone());
            if expected.as_deref() != Some(tool_use_id.as_str()) {
                return Err(ConversationError::UncorrelatedToolResult {
                    tool_use_id: tool_use_id.clone(),
                    expected,
                });
            }
        }
        self.turns.push(turn);
        Ok(())
    }

    pub fn push_assistant(&mut self, text: impl Into<String>, tool_request: Option<ToolRequest>) {
        self.turns.push(Turn::assistant(text, tool_request));
    }

    pub fn push_tool_result(
        &mut self,
        content: impl Into<String>,
        tool_use_id: impl Into<String>,
    ) -> Result<(), ConversationError> {
        self.append(Turn::tool_result(content, tool_use_id))
    }

    pub fn set_final_answer(&mut self, answer: impl Into<String>) -> Result<(), ConversationError> {
        if self.final_answer.is_some() {
            return Err(ConversationError::FinalAnswerAlreadySet);
        }
        self.final_answer = Some(answer.into());
        Ok(())
    }
}

// ============================================================================
// Loop State
// ============================================================================

/// Control loop states
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LoopState {
    /// Waiting for the planning reply
    #[default]
    Plan,
    /// Running the requested tool
    ToolExec { request: ToolRequest },
    /// Waiting for the finalizing reply
    Finalize,
    /// Terminal
    Done,
}

impl LoopState {
    pub fn name(&self) -> &'static str {
        match self {
            LoopState::Plan => "plan",
            LoopState::ToolExec { .. } => "tool_exec",
            LoopState::Finalize => "finalize",
            LoopState::Done => "done",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LoopState::Done)
    }
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Static context for one run
#[derive(Debug, Clone)]
pub struct LoopContext {
    pub run_id: String,
}

impl LoopContext {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
        }
    }
}
