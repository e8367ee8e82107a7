//! Statement-shaped expressions.

use lexy_core::lang::keywords::{self, KeywordId};
use lexy_core::lang::operators::OperatorId;

use super::{ExpressionFactory, ExpressionSource, GrammarRule};
use crate::ast::{
    AssignmentExpression, CaseExpression, ElseExpression, ElseIfExpression, Expression, ExpressionKind, ExpressionList,
    FunctionCall, IfExpression, SpreadAssignment, SwitchExpression, TypeAnnotation, VariableDeclaration, VariablePath,
};
use crate::diagnostics::CompileError;
use crate::lexer::{Token, TokenKind};
use crate::token_helpers::TokenSlice;

pub(super) const IF: GrammarRule = GrammarRule {
    name: "if",
    matches: starts_with_if,
    parse: parse_if,
};

pub(super) const ELSE_IF: GrammarRule = GrammarRule {
    name: "elseif",
    matches: starts_with_else_if,
    parse: parse_else_if,
};

pub(super) const ELSE: GrammarRule = GrammarRule {
    name: "else",
    matches: starts_with_else,
    parse: parse_else,
};

pub(super) const SWITCH: GrammarRule = GrammarRule {
    name: "switch",
    matches: starts_with_switch,
    parse: parse_switch,
};

pub(super) const CASE: GrammarRule = GrammarRule {
    name: "case",
    matches: starts_with_case,
    parse: parse_case,
};

pub(super) const DEFAULT: GrammarRule = GrammarRule {
    name: "default",
    matches: starts_with_default,
    parse: parse_default,
};

pub(super) const SPREAD_ASSIGNMENT: GrammarRule = GrammarRule {
    name: "spread assignment",
    matches: is_spread_assignment,
    parse: parse_spread_assignment,
};

pub(super) const VARIABLE_DECLARATION: GrammarRule = GrammarRule {
    name: "variable declaration",
    matches: is_variable_declaration,
    parse: parse_variable_declaration,
};

pub(super) const ASSIGNMENT: GrammarRule = GrammarRule {
    name: "assignment",
    matches: is_assignment,
    parse: parse_assignment,
};

fn starts_with_if(tokens: &[Token]) -> bool {
    tokens.is_keyword_at(0, KeywordId::If)
}

fn starts_with_else_if(tokens: &[Token]) -> bool {
    tokens.is_keyword_at(0, KeywordId::ElseIf)
}

fn starts_with_else(tokens: &[Token]) -> bool {
    tokens.is_keyword_at(0, KeywordId::Else)
}

fn starts_with_switch(tokens: &[Token]) -> bool {
    tokens.is_keyword_at(0, KeywordId::Switch)
}

fn starts_with_case(tokens: &[Token]) -> bool {
    tokens.is_keyword_at(0, KeywordId::Case)
}

fn starts_with_default(tokens: &[Token]) -> bool {
    tokens.is_keyword_at(0, KeywordId::Default)
}

fn is_spread_assignment(tokens: &[Token]) -> bool {
    tokens.is_operator_at(0, OperatorId::Spread) && tokens.is_operator_at(1, OperatorId::Assignment)
}

fn is_assignment(tokens: &[Token]) -> bool {
    tokens.len() >= 2
        && (tokens[0].name().is_some() || matches!(tokens[0].kind, TokenKind::MemberAccess(_)))
        && tokens.is_operator_at(1, OperatorId::Assignment)
}

/// Condition after a leading keyword; the keyword alone is an error.
fn parse_condition(
    factory: &ExpressionFactory,
    source: &ExpressionSource<'_>,
    tokens: &[Token],
    keyword: KeywordId,
) -> Result<Expression, CompileError> {
    if tokens.len() < 2 {
        return Err(source.grammar_error(
            &tokens[0],
            format!("Invalid '{}' expression: condition expected.", keywords::as_str(keyword)),
        ));
    }
    factory.parse(&tokens[1..], source)
}

fn no_tokens_after(source: &ExpressionSource<'_>, tokens: &[Token], keyword: KeywordId) -> Result<(), CompileError> {
    match tokens.get(1) {
        Some(extra) => Err(source.grammar_error(
            extra,
            format!(
                "Invalid '{}' expression: no tokens expected after '{}'.",
                keywords::as_str(keyword),
                keywords::as_str(keyword)
            ),
        )),
        None => Ok(()),
    }
}

fn parse_if(
    factory: &ExpressionFactory,
    source: &ExpressionSource<'_>,
    tokens: &[Token],
) -> Result<Expression, CompileError> {
    let condition = parse_condition(factory, source, tokens, KeywordId::If)?;
    Ok(source.expression(
        &tokens[0],
        ExpressionKind::If(IfExpression {
            condition: Box::new(condition),
            body: ExpressionList::new(source.reference(&tokens[0])),
            alternatives: Vec::new(),
        }),
    ))
}

fn parse_else_if(
    factory: &ExpressionFactory,
    source: &ExpressionSource<'_>,
    tokens: &[Token],
) -> Result<Expression, CompileError> {
    let condition = parse_condition(factory, source, tokens, KeywordId::ElseIf)?;
    Ok(source.expression(
        &tokens[0],
        ExpressionKind::ElseIf(ElseIfExpression {
            condition: Box::new(condition),
            body: ExpressionList::new(source.reference(&tokens[0])),
        }),
    ))
}

fn parse_else(
    _factory: &ExpressionFactory,
    source: &ExpressionSource<'_>,
    tokens: &[Token],
) -> Result<Expression, CompileError> {
    no_tokens_after(source, tokens, KeywordId::Else)?;
    Ok(source.expression(
        &tokens[0],
        ExpressionKind::Else(ElseExpression {
            body: ExpressionList::new(source.reference(&tokens[0])),
        }),
    ))
}

fn parse_switch(
    factory: &ExpressionFactory,
    source: &ExpressionSource<'_>,
    tokens: &[Token],
) -> Result<Expression, CompileError> {
    let condition = parse_condition(factory, source, tokens, KeywordId::Switch)?;
    Ok(source.expression(
        &tokens[0],
        ExpressionKind::Switch(SwitchExpression {
            condition: Box::new(condition),
            cases: Vec::new(),
        }),
    ))
}

fn parse_case(
    factory: &ExpressionFactory,
    source: &ExpressionSource<'_>,
    tokens: &[Token],
) -> Result<Expression, CompileError> {
    if tokens.len() < 2 {
        return Err(source.grammar_error(&tokens[0], "Invalid 'case' expression: value expected."));
    }
    let value = factory.parse(&tokens[1..], source)?;
    Ok(source.expression(
        &tokens[0],
        ExpressionKind::Case(CaseExpression {
            value: Some(Box::new(value)),
            body: ExpressionList::new(source.reference(&tokens[0])),
        }),
    ))
}

fn parse_default(
    _factory: &ExpressionFactory,
    source: &ExpressionSource<'_>,
    tokens: &[Token],
) -> Result<Expression, CompileError> {
    no_tokens_after(source, tokens, KeywordId::Default)?;
    Ok(source.expression(
        &tokens[0],
        ExpressionKind::Case(CaseExpression {
            value: None,
            body: ExpressionList::new(source.reference(&tokens[0])),
        }),
    ))
}

fn parse_spread_assignment(
    factory: &ExpressionFactory,
    source: &ExpressionSource<'_>,
    tokens: &[Token],
) -> Result<Expression, CompileError> {
    if tokens.len() < 3 {
        return Err(source.grammar_error(&tokens[1], "Invalid spread assignment: function call expected."));
    }
    let call = factory.parse(&tokens[2..], source)?;
    if !matches!(call.kind, ExpressionKind::FunctionCall(FunctionCall::User(_))) {
        return Err(source.grammar_error(&tokens[2], "Invalid spread assignment: function call expected."));
    }
    Ok(source.expression(
        &tokens[0],
        ExpressionKind::SpreadAssignment(SpreadAssignment { call: Box::new(call) }),
    ))
}

fn is_variable_declaration(tokens: &[Token]) -> bool {
    tokens.len() >= 2
        && TypeAnnotation::from_token(&tokens[0]).is_some()
        && tokens[1].name().is_some()
        && (tokens.len() == 2 || tokens.is_operator_at(2, OperatorId::Assignment))
}

fn parse_variable_declaration(
    factory: &ExpressionFactory,
    source: &ExpressionSource<'_>,
    tokens: &[Token],
) -> Result<Expression, CompileError> {
    let type_annotation = TypeAnnotation::from_token(&tokens[0])
        .ok_or_else(|| source.grammar_error(&tokens[0], format!("Invalid type '{}'.", tokens[0])))?;
    let name = tokens[1]
        .name()
        .ok_or_else(|| source.grammar_error(&tokens[1], format!("Invalid variable name '{}'.", tokens[1])))?;

    let default = match tokens.get(3..) {
        None => None,
        Some([]) => {
            return Err(source.grammar_error(
                &tokens[2],
                "Invalid variable declaration: value expected after '='.",
            ));
        }
        Some(value) => Some(Box::new(factory.parse(value, source)?)),
    };

    Ok(source.expression(
        &tokens[0],
        ExpressionKind::VariableDeclaration(VariableDeclaration {
            type_annotation,
            name: name.to_string(),
            default,
        }),
    ))
}

fn parse_assignment(
    factory: &ExpressionFactory,
    source: &ExpressionSource<'_>,
    tokens: &[Token],
) -> Result<Expression, CompileError> {
    let target_kind = match &tokens[0].kind {
        TokenKind::MemberAccess(parts) => ExpressionKind::MemberAccess(VariablePath::new(parts.clone())),
        _ => match tokens[0].name() {
            Some(name) => ExpressionKind::Identifier(name.to_string()),
            None => return Err(source.grammar_error(&tokens[0], format!("Invalid assignment target '{}'.", tokens[0]))),
        },
    };
    if tokens.len() < 3 {
        return Err(source.grammar_error(&tokens[1], "Invalid assignment: value expected after '='."));
    }
    let target = source.expression(&tokens[0], target_kind);
    let value = factory.parse(&tokens[2..], source)?;
    Ok(source.expression(
        &tokens[0],
        ExpressionKind::Assignment(AssignmentExpression {
            target: Box::new(target),
            value: Box::new(value),
        }),
    ))
}
