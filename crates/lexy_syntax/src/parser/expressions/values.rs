//! Single-value expressions: parenthesized, bracketed, spread, member access, literal, identifier.

use lexy_core::lang::operators::OperatorId;

use super::{ExpressionFactory, ExpressionSource, GrammarRule};
use crate::ast::{BracketedExpression, Expression, ExpressionKind, LiteralValue, VariablePath};
use crate::diagnostics::CompileError;
use crate::lexer::{Token, TokenKind};
use crate::token_helpers::TokenSlice;

pub(super) const PARENTHESIZED: GrammarRule = GrammarRule {
    name: "parenthesized",
    matches: is_parenthesized,
    parse: parse_parenthesized,
};

pub(super) const BRACKETED: GrammarRule = GrammarRule {
    name: "bracketed",
    matches: is_bracketed,
    parse: parse_bracketed,
};

pub(super) const SPREAD: GrammarRule = GrammarRule {
    name: "spread",
    matches: is_spread,
    parse: parse_spread,
};

pub(super) const MEMBER_ACCESS: GrammarRule = GrammarRule {
    name: "member access",
    matches: is_member_access,
    parse: parse_member_access,
};

pub(super) const LITERAL: GrammarRule = GrammarRule {
    name: "literal",
    matches: is_literal,
    parse: parse_literal,
};

pub(super) const IDENTIFIER: GrammarRule = GrammarRule {
    name: "identifier",
    matches: is_identifier,
    parse: parse_identifier,
};

fn is_parenthesized(tokens: &[Token]) -> bool {
    tokens.is_operator_at(0, OperatorId::OpenParenthesis) && tokens.matching_close(0) == Some(tokens.len() - 1)
}

fn parse_parenthesized(
    factory: &ExpressionFactory,
    source: &ExpressionSource<'_>,
    tokens: &[Token],
) -> Result<Expression, CompileError> {
    let inner = &tokens[1..tokens.len() - 1];
    if inner.is_empty() {
        return Err(source.grammar_error(&tokens[0], "Invalid parenthesized expression: expression expected."));
    }
    let inner = factory.parse(inner, source)?;
    Ok(source.expression(&tokens[0], ExpressionKind::Parenthesized(Box::new(inner))))
}

fn is_bracketed(tokens: &[Token]) -> bool {
    tokens.len() >= 3
        && tokens[0].name().is_some()
        && tokens.is_operator_at(1, OperatorId::OpenBracket)
        && tokens.matching_close(1) == Some(tokens.len() - 1)
}

fn parse_bracketed(
    factory: &ExpressionFactory,
    source: &ExpressionSource<'_>,
    tokens: &[Token],
) -> Result<Expression, CompileError> {
    let index = &tokens[2..tokens.len() - 1];
    if index.is_empty() {
        return Err(source.grammar_error(&tokens[1], "Invalid bracketed expression: index expected."));
    }
    let index = factory.parse(index, source)?;
    let target = tokens[0].name().unwrap_or_default().to_string();
    Ok(source.expression(
        &tokens[0],
        ExpressionKind::Bracketed(BracketedExpression {
            target,
            index: Box::new(index),
        }),
    ))
}

fn is_spread(tokens: &[Token]) -> bool {
    tokens.len() == 1 && tokens[0].is_operator(OperatorId::Spread)
}

fn parse_spread(
    _factory: &ExpressionFactory,
    source: &ExpressionSource<'_>,
    tokens: &[Token],
) -> Result<Expression, CompileError> {
    Ok(source.expression(&tokens[0], ExpressionKind::Spread))
}

fn is_member_access(tokens: &[Token]) -> bool {
    tokens.len() == 1 && matches!(tokens[0].kind, TokenKind::MemberAccess(_))
}

fn parse_member_access(
    _factory: &ExpressionFactory,
    source: &ExpressionSource<'_>,
    tokens: &[Token],
) -> Result<Expression, CompileError> {
    let parts = tokens[0].kind.member_access().unwrap_or_default().to_vec();
    Ok(source.expression(&tokens[0], ExpressionKind::MemberAccess(VariablePath::new(parts))))
}

fn is_literal(tokens: &[Token]) -> bool {
    tokens.len() == 1 && tokens[0].kind.is_literal()
}

fn parse_literal(
    _factory: &ExpressionFactory,
    source: &ExpressionSource<'_>,
    tokens: &[Token],
) -> Result<Expression, CompileError> {
    let value = LiteralValue::from_token(&tokens[0])
        .ok_or_else(|| source.grammar_error(&tokens[0], format!("Invalid literal '{}'.", tokens[0])))?;
    Ok(source.expression(&tokens[0], ExpressionKind::Literal(value)))
}

fn is_identifier(tokens: &[Token]) -> bool {
    tokens.len() == 1 && tokens[0].name().is_some()
}

fn parse_identifier(
    _factory: &ExpressionFactory,
    source: &ExpressionSource<'_>,
    tokens: &[Token],
) -> Result<Expression, CompileError> {
    let name = tokens[0].name().unwrap_or_default().to_string();
    Ok(source.expression(&tokens[0], ExpressionKind::Identifier(name)))
}
