//! Binary expressions and precedence tiers.
//!
//! Precedence is resolved by splitting, not by climbing: among the binary operators at bracket depth 0, pick the
//! tier that binds widest, then split at its **last** occurrence. Both sides are parsed recursively. Splitting at
//! the last occurrence makes every tier left-associative (`A - B - C` is `(A - B) - C`).

use lexy_core::lang::operators::{self, OperatorId};

use super::{ExpressionFactory, ExpressionSource, GrammarRule};
use crate::ast::{BinaryExpression, Expression, ExpressionKind};
use crate::diagnostics::{CompileError, errors};
use crate::lexer::Token;
use crate::token_helpers::TokenSlice;

/// Binary operators grouped by precedence, widest-binding tier first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorTiers {
    tiers: Vec<Vec<OperatorId>>,
}

impl OperatorTiers {
    pub fn new(tiers: Vec<Vec<OperatorId>>) -> Self {
        Self { tiers }
    }

    /// `||`, `&&`, `== !=`, `< <= > >=`, `+ -`, `* / %`.
    pub fn standard() -> Self {
        Self::new(operators::binary_tiers())
    }

    pub fn iter(&self) -> impl Iterator<Item = &[OperatorId]> {
        self.tiers.iter().map(Vec::as_slice)
    }

    /// Position to split at: last operator of the widest tier present.
    pub fn split_point(&self, candidates: &[(usize, OperatorId)]) -> Option<(usize, OperatorId)> {
        self.iter()
            .find_map(|tier| candidates.iter().rev().find(|(_, op)| tier.contains(op)).copied())
    }
}

pub(super) const BINARY: GrammarRule = GrammarRule {
    name: "binary",
    matches: has_binary_operator,
    parse: parse_binary,
};

fn has_binary_operator(tokens: &[Token]) -> bool {
    tokens
        .depth_zero_binary_operators()
        .is_some_and(|found| !found.is_empty())
}

fn parse_binary(
    factory: &ExpressionFactory,
    source: &ExpressionSource<'_>,
    tokens: &[Token],
) -> Result<Expression, CompileError> {
    let candidates = tokens.depth_zero_binary_operators().unwrap_or_default();
    let Some((position, operator)) = factory.tiers().split_point(&candidates) else {
        return Err(errors::invalid_expression(&tokens.describe(), source.reference(&tokens[0])));
    };

    let spelling = operators::as_str(operator);
    let (left, right) = (&tokens[..position], &tokens[position + 1..]);
    if left.is_empty() {
        return Err(source.grammar_error(
            &tokens[position],
            format!("Invalid expression: left operand expected for '{spelling}'."),
        ));
    }
    if right.is_empty() {
        return Err(source.grammar_error(
            &tokens[position],
            format!("Invalid expression: right operand expected for '{spelling}'."),
        ));
    }

    let left = factory.parse(left, source)?;
    let right = factory.parse(right, source)?;
    Ok(source.expression(
        &tokens[0],
        ExpressionKind::Binary(BinaryExpression {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_point_prefers_widest_tier_last_occurrence() {
        let tiers = OperatorTiers::standard();
        let candidates = [
            (1, OperatorId::Addition),
            (3, OperatorId::Multiplication),
            (5, OperatorId::Subtraction),
        ];
        assert_eq!(tiers.split_point(&candidates), Some((5, OperatorId::Subtraction)));

        let logical = [(1, OperatorId::And), (3, OperatorId::Or), (5, OperatorId::Equals)];
        assert_eq!(tiers.split_point(&logical), Some((3, OperatorId::Or)));
    }
}
