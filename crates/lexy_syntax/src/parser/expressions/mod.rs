//! Expression factory: turns the tokens of one line (or a slice of them) into an [`Expression`].
//!
//! The factory is an ordered list of [`GrammarRule`]s, each a `(matches, parse)` pair. The first rule whose
//! predicate accepts the tokens is used; if its parse fails the failure is returned as-is and no other rule is
//! tried. Statement forms come first so `if A == B` is never mistaken for a binary expression.
//!
//! ## Module Structure
//!
//! - `statements` - `if`/`elseif`/`else`, `switch`/`case`/`default`, declarations, assignments
//! - `binary` - precedence tiers and the binary split
//! - `calls` - system, table and user function calls
//! - `values` - parenthesized, bracketed, member access, literals, identifiers, spread

mod binary;
mod calls;
mod statements;
mod values;

pub use binary::OperatorTiers;

use crate::ast::{Expression, ExpressionKind, NodeIds};
use crate::diagnostics::{CompileError, errors};
use crate::lexer::Token;
use crate::line::Line;
use crate::source::SourceReference;
use crate::token_helpers::TokenSlice;

/// Where the tokens being parsed come from, and the id source for new expressions.
pub struct ExpressionSource<'a> {
    pub line: &'a Line,
    pub ids: &'a NodeIds,
}

impl<'a> ExpressionSource<'a> {
    pub fn new(line: &'a Line, ids: &'a NodeIds) -> Self {
        Self { line, ids }
    }

    pub fn reference(&self, token: &Token) -> SourceReference {
        self.line.token_reference(token)
    }

    /// New expression anchored at `at`.
    pub fn expression(&self, at: &Token, kind: ExpressionKind) -> Expression {
        Expression::new(self.ids.next(), self.reference(at), kind)
    }

    pub fn grammar_error(&self, at: &Token, message: impl Into<String>) -> CompileError {
        CompileError::grammar(message, self.reference(at))
    }
}

pub type RulePredicate = fn(&[Token]) -> bool;
pub type RuleParser = fn(&ExpressionFactory, &ExpressionSource<'_>, &[Token]) -> Result<Expression, CompileError>;

/// One grammar production.
#[derive(Clone, Copy)]
pub struct GrammarRule {
    pub name: &'static str,
    pub matches: RulePredicate,
    pub parse: RuleParser,
}

impl std::fmt::Debug for GrammarRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrammarRule").field("name", &self.name).finish()
    }
}

/// Ordered rule table plus the binary precedence tiers.
#[derive(Debug, Clone)]
pub struct ExpressionFactory {
    rules: Vec<GrammarRule>,
    tiers: OperatorTiers,
}

impl ExpressionFactory {
    pub fn new(rules: Vec<GrammarRule>, tiers: OperatorTiers) -> Self {
        Self { rules, tiers }
    }

    /// The Lexy grammar.
    pub fn standard() -> Self {
        Self::new(standard_rules(), OperatorTiers::standard())
    }

    pub fn rules(&self) -> &[GrammarRule] {
        &self.rules
    }

    pub fn tiers(&self) -> &OperatorTiers {
        &self.tiers
    }

    /// Parse `tokens` with the first matching rule.
    ///
    /// ## Errors
    /// - No tokens, or no rule matches: `Invalid expression`.
    /// - The matched rule's own failure, unchanged.
    pub fn parse(&self, tokens: &[Token], source: &ExpressionSource<'_>) -> Result<Expression, CompileError> {
        let Some(first) = tokens.first() else {
            return Err(CompileError::grammar("Invalid expression: no tokens.", source.line.start_reference()));
        };
        match self.rules.iter().find(|rule| (rule.matches)(tokens)) {
            Some(rule) => (rule.parse)(self, source, tokens),
            None => Err(errors::invalid_expression(&tokens.describe(), source.reference(first))),
        }
    }

    /// Parse a whole line.
    pub fn parse_line(&self, line: &Line, ids: &NodeIds) -> Result<Expression, CompileError> {
        self.parse(&line.tokens, &ExpressionSource::new(line, ids))
    }
}

/// Rule order matters: statements, then binary, then single values.
fn standard_rules() -> Vec<GrammarRule> {
    vec![
        statements::IF,
        statements::ELSE_IF,
        statements::ELSE,
        statements::SWITCH,
        statements::CASE,
        statements::DEFAULT,
        statements::SPREAD_ASSIGNMENT,
        statements::VARIABLE_DECLARATION,
        statements::ASSIGNMENT,
        binary::BINARY,
        values::PARENTHESIZED,
        values::BRACKETED,
        calls::FUNCTION_CALL,
        values::SPREAD,
        values::MEMBER_ACCESS,
        values::LITERAL,
        values::IDENTIFIER,
    ]
}

#[cfg(test)]
mod tests;
