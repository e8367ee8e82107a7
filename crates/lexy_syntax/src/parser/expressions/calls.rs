//! Function calls: `Name(arguments)`.
//!
//! The callee name decides the shape. System functions (`new`, `fill`, `extract`) and table functions
//! (`lookUp`, ...) have fixed argument forms checked here; every other name is a user call whose target is
//! resolved during validation (a user function first, then a library function).

use lexy_core::lang::functions::{self, SystemFunctionId, TableFunctionId};
use lexy_core::lang::operators::OperatorId;

use super::{ExpressionFactory, ExpressionSource, GrammarRule};
use crate::ast::{
    ColumnReference, Expression, ExpressionKind, FunctionCall, TableCall, TypeArgument, UserCall, VariablePath,
};
use crate::diagnostics::{CompileError, errors};
use crate::lexer::{Token, TokenKind};
use crate::token_helpers::TokenSlice;

pub(super) const FUNCTION_CALL: GrammarRule = GrammarRule {
    name: "function call",
    matches: is_function_call,
    parse: parse_function_call,
};

fn is_function_call(tokens: &[Token]) -> bool {
    tokens.len() >= 3
        && tokens[0].name().is_some()
        && tokens.is_operator_at(1, OperatorId::OpenParenthesis)
        && tokens.matching_close(1) == Some(tokens.len() - 1)
}

fn parse_function_call(
    factory: &ExpressionFactory,
    source: &ExpressionSource<'_>,
    tokens: &[Token],
) -> Result<Expression, CompileError> {
    let name = tokens[0].name().unwrap_or_default();
    let arguments = tokens[2..tokens.len() - 1].split_arguments();

    let call = if let Some(id) = functions::system_function_from_str(name) {
        parse_system_call(factory, source, tokens, id, &arguments)?
    } else if let Some(id) = functions::table_function_from_str(name) {
        FunctionCall::Table(parse_table_call(factory, source, tokens, id, &arguments)?)
    } else {
        let arguments = arguments
            .iter()
            .map(|argument| parse_argument(factory, source, tokens, argument))
            .collect::<Result<Vec<_>, _>>()?;
        FunctionCall::User(UserCall {
            name: name.to_string(),
            arguments,
        })
    };
    Ok(source.expression(&tokens[0], ExpressionKind::FunctionCall(call)))
}

fn parse_argument(
    factory: &ExpressionFactory,
    source: &ExpressionSource<'_>,
    call: &[Token],
    argument: &[Token],
) -> Result<Expression, CompileError> {
    if argument.is_empty() {
        return Err(source.grammar_error(&call[0], format!("Invalid function call '{}': empty argument.", call.describe())));
    }
    factory.parse(argument, source)
}

fn parse_system_call(
    factory: &ExpressionFactory,
    source: &ExpressionSource<'_>,
    tokens: &[Token],
    id: SystemFunctionId,
    arguments: &[&[Token]],
) -> Result<FunctionCall, CompileError> {
    let info = functions::system_function_info(id);
    let invalid = || {
        errors::invalid_token_count(
            &format!("'{}' function arguments", info.canonical),
            info.usage,
            source.reference(&tokens[0]),
        )
    };
    let [argument] = arguments else {
        return Err(invalid());
    };

    match id {
        SystemFunctionId::New | SystemFunctionId::Fill => {
            let path = match argument {
                [token] => type_path(token).ok_or_else(invalid)?,
                _ => return Err(invalid()),
            };
            let argument = TypeArgument {
                path,
                reference: source.reference(&argument[0]),
            };
            Ok(match id {
                SystemFunctionId::New => FunctionCall::New(argument),
                _ => FunctionCall::Fill(argument),
            })
        }
        SystemFunctionId::Extract => {
            let value = parse_argument(factory, source, tokens, argument)?;
            Ok(FunctionCall::Extract(Box::new(value)))
        }
    }
}

fn type_path(token: &Token) -> Option<VariablePath> {
    match &token.kind {
        TokenKind::MemberAccess(parts) => Some(VariablePath::new(parts.clone())),
        _ => token.name().map(VariablePath::from_name),
    }
}

fn parse_table_call(
    factory: &ExpressionFactory,
    source: &ExpressionSource<'_>,
    tokens: &[Token],
    id: TableFunctionId,
    arguments: &[&[Token]],
) -> Result<TableCall, CompileError> {
    let info = functions::table_function_info(id);
    let invalid = || {
        errors::invalid_token_count(
            &format!("'{}' function arguments", info.canonical),
            info.usage,
            source.reference(&tokens[0]),
        )
    };
    if arguments.len() != info.arity {
        return Err(invalid());
    }

    let (table, table_reference) = match arguments[0] {
        [token] => match token.name() {
            Some(name) => (name.to_string(), source.reference(token)),
            None => return Err(invalid()),
        },
        _ => return Err(invalid()),
    };

    let mut rest = arguments[1..].iter();
    let mut next = || rest.next().copied().ok_or_else(invalid);

    let discriminator = if info.has_discriminator {
        Some(Box::new(parse_argument(factory, source, tokens, next()?)?))
    } else {
        None
    };
    let value = Box::new(parse_argument(factory, source, tokens, next()?)?);
    let discriminator_column = if info.has_discriminator {
        Some(column_reference(source, next()?, info.usage)?)
    } else {
        None
    };
    let search_column = column_reference(source, next()?, info.usage)?;
    let result_column = if info.returns_row {
        None
    } else {
        Some(column_reference(source, next()?, info.usage)?)
    };

    Ok(TableCall {
        function: id,
        table,
        table_reference,
        discriminator,
        value,
        discriminator_column,
        search_column,
        result_column,
    })
}

fn column_reference(
    source: &ExpressionSource<'_>,
    argument: &[Token],
    usage: &str,
) -> Result<ColumnReference, CompileError> {
    match argument {
        [token] => match token.kind.member_access() {
            Some([table, column]) => Ok(ColumnReference {
                table: table.clone(),
                column: column.clone(),
                reference: source.reference(token),
            }),
            _ => Err(source.grammar_error(
                token,
                format!("Invalid column argument '{token}': expected 'Table.Column' in '{usage}'."),
            )),
        },
        [] => Err(CompileError::grammar(
            format!("Invalid column argument: expected 'Table.Column' in '{usage}'."),
            source.line.start_reference(),
        )),
        [first, ..] => Err(source.grammar_error(
            first,
            format!("Invalid column argument '{}': expected 'Table.Column' in '{usage}'.", argument.describe()),
        )),
    }
}
