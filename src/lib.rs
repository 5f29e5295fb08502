//! abacus - a single-tool arithmetic agent
//!
//! A reasoning step decides whether a question needs the calculator tool,
//! the tool runs in a sandboxed evaluator, and a finalize step produces the
//! answer. The loop is a pure state machine driven by an async executor.

pub mod config;
pub mod evaluator;
pub mod llm;
pub mod report;
pub mod runtime;
pub mod state_machine;
pub mod system_prompt;
pub mod tools;
