//! Arithmetic-only expression evaluator
//!
//! Expressions are parsed into a surface tree, checked for names, lowered
//! into an [`Arith`] tree and only then evaluated. `Arith` has no variant
//! that can hold a name, call or attribute, so nothing but numeric operators
//! ever reaches evaluation.

mod lexer;
mod number;
mod parser;

#[cfg(test)]
mod proptests;

pub use number::{EvalError, Number};
pub use parser::ParseError;

use parser::{parse, BinaryOp, Expr, UnaryOp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reason attached to every rejected expression
pub const REJECTION_REASON: &str = "only numeric expressions are allowed.";

/// Longest expression accepted, in characters
pub const MAX_EXPRESSION_LEN: usize = 4096;

/// Result of evaluating an expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "value", rename_all = "snake_case")]
pub enum EvaluationOutcome {
    /// Decimal rendering of the computed value
    Ok(String),
    /// The expression referenced a name, call or attribute
    Rejected(String),
    /// Syntax or arithmetic error
    Failed(String),
}

impl EvaluationOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, EvaluationOutcome::Ok(_))
    }

    /// Text handed back to the reasoner as tool output
    pub fn to_tool_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for EvaluationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluationOutcome::Ok(value) => write!(f, "{value}"),
            EvaluationOutcome::Rejected(reason) | EvaluationOutcome::Failed(reason) => {
                write!(f, "ERROR: {reason}")
            }
        }
    }
}

/// Evaluate a numeric expression.
///
/// Names are rejected before anything is computed, so a rejected expression
/// never has any part of it evaluated. Input that fails to parse but mentions
/// a name is rejected as well.
pub fn evaluate(expression: &str) -> EvaluationOutcome {
    if expression.chars().count() > MAX_EXPRESSION_LEN {
        return EvaluationOutcome::Failed(format!(
            "expression too long (limit {MAX_EXPRESSION_LEN} characters)"
        ));
    }

    let surface = match parse(expression) {
        Ok(expr) => expr,
        Err(_) if lexer::mentions_name(expression) => {
            return EvaluationOutcome::Rejected(REJECTION_REASON.to_string());
        }
        Err(e) => return EvaluationOutcome::Failed(e.to_string()),
    };

    let Some(arith) = lower(&surface) else {
        return EvaluationOutcome::Rejected(REJECTION_REASON.to_string());
    };

    match arith.eval() {
        Ok(value) => EvaluationOutcome::Ok(value.to_string()),
        Err(e) => EvaluationOutcome::Failed(e.to_string()),
    }
}

/// Arithmetic tree: the only shape that can be evaluated
#[derive(Debug, Clone, PartialEq)]
enum Arith {
    Literal(Number),
    Neg(Box<Arith>),
    Binary {
        op: BinaryOp,
        lhs: Box<Arith>,
        rhs: Box<Arith>,
    },
}

/// Lower a surface tree, returning `None` if it references any name.
fn lower(expr: &Expr) -> Option<Arith> {
    match expr {
        Expr::Literal(n) => Some(Arith::Literal(*n)),
        Expr::Unary {
            op: UnaryOp::Plus,
            operand,
        } => lower(operand),
        Expr::Unary {
            op: UnaryOp::Minus,
            operand,
        } => Some(Arith::Neg(Box::new(lower(operand)?))),
        Expr::Binary { op, lhs, rhs } => {
            let lhs = lower(lhs);
            let rhs = lower(rhs);
            Some(Arith::Binary {
                op: *op,
                lhs: Box::new(lhs?),
                rhs: Box::new(rhs?),
            })
        }
        Expr::Name(_) | Expr::Call { .. } | Expr::Attribute { .. } => None,
    }
}

impl Arith {
    fn eval(&self) -> Result<Number, EvalError> {
        match self {
            Arith::Literal(n) => Ok(*n),
            Arith::Neg(operand) => operand.eval()?.neg(),
            Arith::Binary { op, lhs, rhs } => {
                let lhs = lhs.eval()?;
                let rhs = rhs.eval()?;
                match op {
                    BinaryOp::Add => lhs.add(rhs),
                    BinaryOp::Sub => lhs.sub(rhs),
                    BinaryOp::Mul => lhs.mul(rhs),
                    BinaryOp::Div => lhs.div(rhs),
                    BinaryOp::Pow => lhs.pow(rhs),
                }
            }
        }
    }
}
