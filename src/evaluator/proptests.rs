//! Property-based tests for the expression evaluator

use super::*;
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn arb_small_int() -> impl Strategy<Value = i64> {
    0i64..1000
}

/// Integer-only expression paired with its expected value (no division, no power).
///
/// Single-digit leaves and shallow trees keep the reference free of overflow.
fn arb_int_expr() -> impl Strategy<Value = (String, i64)> {
    let leaf = (0i64..10).prop_map(|n| (n.to_string(), n));
    leaf.prop_recursive(3, 8, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone())
                .prop_map(|((a, x), (b, y))| (format!("({a} + {b})"), x + y)),
            (inner.clone(), inner.clone())
                .prop_map(|((a, x), (b, y))| (format!("({a} - {b})"), x - y)),
            (inner.clone(), inner.clone())
                .prop_map(|((a, x), (b, y))| (format!("{a} * {b}"), x * y)),
            inner.prop_map(|(a, x)| (format!("-({a})"), -x)),
        ]
    })
}

/// Any arithmetic expression in the accepted grammar
fn arb_numeric_expr() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        arb_small_int().prop_map(|n| n.to_string()),
        (0u32..100, 0u32..100).prop_map(|(a, b)| format!("{a}.{b}")),
    ];
    leaf.prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            (inner.clone(), prop_oneof![Just("+"), Just("-"), Just("*"), Just("/"), Just("**")], inner.clone())
                .prop_map(|(a, op, b)| format!("{a} {op} {b}")),
            inner.clone().prop_map(|a| format!("({a})")),
            inner.prop_map(|a| format!("-{a}")),
        ]
    })
}

fn arb_identifier() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_]{0,8}"
}

/// Ways a name can appear inside an otherwise numeric expression
fn arb_name_use() -> impl Strategy<Value = String> {
    prop_oneof![
        arb_identifier(),
        arb_identifier().prop_map(|name| format!("{name}(1)")),
        arb_identifier().prop_map(|name| format!("{name}()")),
        arb_identifier().prop_map(|attr| format!("(2).{attr}")),
        (arb_identifier(), arb_identifier()).prop_map(|(a, b)| format!("{a}.{b}")),
    ]
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Integer arithmetic matches i64 arithmetic with standard precedence
    #[test]
    fn prop_integer_expressions_match_reference((expr, expected) in arb_int_expr()) {
        prop_assert_eq!(evaluate(&expr), EvaluationOutcome::Ok(expected.to_string()));
    }

    // Numeric-only input is never rejected
    #[test]
    fn prop_numeric_expressions_never_rejected(expr in arb_numeric_expr()) {
        let outcome = evaluate(&expr);
        prop_assert!(
            !matches!(outcome, EvaluationOutcome::Rejected(_)),
            "{} was rejected", expr
        );
    }

    // Any name anywhere in the expression is rejected
    #[test]
    fn prop_names_always_rejected(
        prefix in arb_numeric_expr(),
        name_use in arb_name_use(),
        suffix in arb_numeric_expr(),
    ) {
        let expr = format!("{prefix} + {name_use} * ({suffix})");
        prop_assert_eq!(
            evaluate(&expr),
            EvaluationOutcome::Rejected(REJECTION_REASON.to_string())
        );
    }

    // Evaluation has no hidden state
    #[test]
    fn prop_evaluate_is_idempotent(expr in arb_numeric_expr()) {
        prop_assert_eq!(evaluate(&expr), evaluate(&expr));
    }

    // Arbitrary input never panics
    #[test]
    fn prop_arbitrary_input_is_total(input in ".{0,64}") {
        let _ = evaluate(&input);
    }

    // Division by a literal zero never produces a value
    #[test]
    fn prop_division_by_zero_fails(expr in arb_numeric_expr()) {
        let outcome = evaluate(&format!("({expr}) / 0"));
        match outcome {
            EvaluationOutcome::Failed(reason) => {
                // The left side may fail first (e.g. its own division by zero or overflow)
                prop_assert!(!reason.is_empty());
            }
            other => prop_assert!(false, "expected failure, got {:?}", other),
        }
    }
}
