//! Property-based tests for the Lexy front end
//!
//! These tests use proptest to verify invariants across many randomly
//! generated inputs, catching edge cases that hand-written tests might miss.

use lexy::frontend::ast::{NodeIds, NodeKind};
use lexy::frontend::parser::expressions::ExpressionFactory;
use lexy::frontend::source::SourceFile;
use lexy::{LexyParser, ParserOptions};
use lexy_core::lang::operators::{self, OperatorId};
use lexy_syntax::line::Line;
use proptest::prelude::*;

const BINARY_OPERATORS: &[OperatorId] = &[
    OperatorId::Or,
    OperatorId::And,
    OperatorId::Equals,
    OperatorId::NotEqual,
    OperatorId::GreaterThan,
    OperatorId::GreaterThanOrEqual,
    OperatorId::LessThan,
    OperatorId::LessThanOrEqual,
    OperatorId::Addition,
    OperatorId::Subtraction,
    OperatorId::Multiplication,
    OperatorId::Division,
    OperatorId::Modulus,
];

fn render_line(text: &str) -> String {
    let line = Line::tokenize(0, text, &SourceFile::new("prop.lexy")).expect("Tokenize failed");
    ExpressionFactory::standard()
        .parse_line(&line, &NodeIds::new())
        .expect("Parse failed")
        .to_string()
}

// =============================================================================
// Strategies
// =============================================================================

fn operand_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(vec!["A", "B", "Income", "Rate", "Tax.Rate"]).prop_map(str::to_string),
        (0u32..1000).prop_map(|n| n.to_string()),
    ]
}

fn operator_strategy() -> impl Strategy<Value = OperatorId> {
    prop::sample::select(BINARY_OPERATORS.to_vec())
}

/// A fully parenthesized binary expression tree.
fn tree_strategy() -> impl Strategy<Value = String> {
    operand_strategy().prop_recursive(4, 32, 2, |inner| {
        (inner.clone(), operator_strategy(), inner)
            .prop_map(|(left, operator, right)| format!("({left} {} {right})", operators::as_str(operator)))
    })
}

/// Reference precedence climbing over a flat `operand (operator operand)*` chain: split at the last operator of
/// the lowest precedence, recursively.
fn parenthesize(operands: &[String], chain: &[OperatorId]) -> String {
    if chain.is_empty() {
        return operands[0].clone();
    }
    let lowest = chain
        .iter()
        .map(|&o| operators::info_for(o).precedence)
        .min()
        .unwrap();
    let split = chain
        .iter()
        .rposition(|&o| operators::info_for(o).precedence == lowest)
        .unwrap();
    format!(
        "({} {} {})",
        parenthesize(&operands[..=split], &chain[..split]),
        operators::as_str(chain[split]),
        parenthesize(&operands[split + 1..], &chain[split + 1..])
    )
}

// =============================================================================
// Expression Properties
// =============================================================================

proptest! {
    /// Property: rendering a parsed expression and parsing it again gives the same rendering
    #[test]
    fn fully_parenthesized_expressions_round_trip(expression in tree_strategy()) {
        let rendered = render_line(&expression);
        prop_assert_eq!(&rendered, &expression);
        prop_assert_eq!(render_line(&rendered), rendered);
    }

    /// Property: an unparenthesized chain splits at the last operator of the lowest precedence tier
    #[test]
    fn flat_chains_follow_precedence(
        first in operand_strategy(),
        rest in prop::collection::vec((operator_strategy(), operand_strategy()), 1..6)
    ) {
        let mut text = first.clone();
        let mut operands = vec![first];
        let mut chain = Vec::new();
        for (operator, operand) in rest {
            text.push_str(&format!(" {} {operand}", operators::as_str(operator)));
            chain.push(operator);
            operands.push(operand);
        }
        prop_assert_eq!(render_line(&text), parenthesize(&operands, &chain));
    }
}

// =============================================================================
// Document Properties
// =============================================================================

fn shape(source: &[String]) -> Vec<(NodeKind, Option<String>, usize)> {
    let parser = LexyParser::new(ParserOptions::new().with_suppress_exceptions(true));
    let result = parser.parse(source, "prop.lexy").expect("Parse failed");
    let mut shape = Vec::new();
    for node in &result.nodes {
        lexy::frontend::ast::walk(node.as_node(), &mut |n| {
            shape.push((n.kind(), n.name().map(str::to_string), n.children().len()));
        });
    }
    shape
}

fn function_strategy() -> impl Strategy<Value = Vec<String>> {
    (
        prop::sample::select(vec!["Calculate", "Validate", "Compute"]),
        prop::collection::vec(tree_strategy(), 1..4),
    )
        .prop_map(|(name, expressions)| {
            let mut lines = vec![format!("function {name}"), "  code".to_string()];
            for (index, expression) in expressions.iter().enumerate() {
                lines.push(format!("    var V{index} = {expression}"));
            }
            lines
        })
}

proptest! {
    /// Property: parsing the same document twice yields the same tree
    #[test]
    fn parsing_is_idempotent(source in function_strategy()) {
        prop_assert_eq!(shape(&source), shape(&source));
    }
}
