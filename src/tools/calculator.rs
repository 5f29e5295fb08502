//! Calculator tool - evaluates numeric expressions in the sandboxed evaluator

use super::{Tool, ToolOutput};
use crate::evaluator::evaluate;
use crate::state_machine::ToolRequest;
use async_trait::async_trait;
use serde_json::{json, Value};

pub const CALCULATOR_TOOL_NAME: &str = "calculator";

/// Calculator tool backed by [`evaluate`]
pub struct CalculatorTool;

#[async_trait]
impl Tool for CalculatorTool {
    fn name(&self) -> &'static str {
        CALCULATOR_TOOL_NAME
    }

    fn description(&self) -> String {
        "Evaluate a numeric expression; supports + - * / ** and parentheses. Example: \"12 * (3 + 5) / 2\"".to_string()
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["expression"],
            "properties": {
                "expression": {
                    "type": "string",
                    "description": "Arithmetic expression using numbers, + - * / ** and parentheses"
                }
            }
        })
    }

    async fn run(&self, request: &ToolRequest) -> ToolOutput {
        // A missing expression evaluates as empty input
        let expression = request.argument("expression").unwrap_or_default();
        let outcome = evaluate(expression);
        tracing::debug!(expression, outcome = %outcome, "Evaluated expression");
        if outcome.is_ok() {
            ToolOutput::success(outcome.to_tool_text())
        } else {
            ToolOutput::error(outcome.to_tool_text())
        }
    }
}
