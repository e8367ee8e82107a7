//! Line parsers for function, enum, table and type declarations.

use lexy_core::lang::keywords::KeywordId;
use lexy_core::lang::operators::OperatorId;

use super::parsable::{NextNode, ParsableNode, ParseLineContext};
use crate::ast::{
    ColumnHeader, EnumDefinition, EnumMember, Expression, ExpressionKind, ExpressionList, Function, Table,
    TableHeader, TableRow, TypeAnnotation, TypeDefinition, VariableBlock, VariableBlockKind, VariableDefinition,
};
use crate::diagnostics::{CompileError, errors};
use crate::lexer::{Token, TokenKind};
use crate::source::SourceReference;
use crate::token_helpers::TokenSlice;

const FUNCTION_PARAMETERS: usize = 0;
const FUNCTION_RESULTS: usize = 1;
const FUNCTION_CODE: usize = 2;

impl ParsableNode for Function {
    fn parse(&mut self, context: &mut ParseLineContext<'_>) -> NextNode {
        let tokens = context.tokens();
        let Some(first) = tokens.first() else {
            return NextNode::Leaf;
        };
        let reference = context.reference();

        let (slot, occupied, name) = match first.keyword_id() {
            Some(KeywordId::Parameters) => (FUNCTION_PARAMETERS, self.parameters.is_some(), "parameters"),
            Some(KeywordId::Results) => (FUNCTION_RESULTS, self.results.is_some(), "results"),
            Some(KeywordId::Code) => (FUNCTION_CODE, self.code.is_some(), "code"),
            _ => {
                context.report(errors::invalid_token(
                    &first.to_string(),
                    "Expected 'parameters', 'results' or 'code'.",
                    reference,
                ));
                return NextNode::Ignore;
            }
        };
        if !context.expect_single_token(name) {
            return NextNode::Ignore;
        }
        if occupied {
            context.report(errors::duplicated_block(name, reference));
            return NextNode::Ignore;
        }

        match slot {
            FUNCTION_PARAMETERS => self.parameters = Some(VariableBlock::new(VariableBlockKind::Parameters, reference)),
            FUNCTION_RESULTS => self.results = Some(VariableBlock::new(VariableBlockKind::Results, reference)),
            _ => self.code = Some(ExpressionList::new(reference)),
        }
        NextNode::child(slot)
    }

    fn child_mut(&mut self, slot: usize) -> Option<&mut dyn ParsableNode> {
        match slot {
            FUNCTION_PARAMETERS => self.parameters.as_mut().map(|b| b as &mut dyn ParsableNode),
            FUNCTION_RESULTS => self.results.as_mut().map(|b| b as &mut dyn ParsableNode),
            FUNCTION_CODE => self.code.as_mut().map(|c| c as &mut dyn ParsableNode),
            _ => None,
        }
    }
}

/// Parse a `Type Name [= default]` line into a definition.
pub(super) fn variable_definition(context: &mut ParseLineContext<'_>) -> Option<VariableDefinition> {
    let expression = match context.parse_line_expression() {
        Ok(expression) => expression,
        Err(error) => {
            context.report(error);
            return None;
        }
    };
    let Expression { id, reference, kind } = expression;
    match kind {
        ExpressionKind::VariableDeclaration(declaration) => Some(VariableDefinition {
            id,
            name: declaration.name,
            reference,
            type_annotation: declaration.type_annotation,
            default: declaration.default.map(|d| *d),
        }),
        _ => {
            context.report(errors::invalid_token_count(
                "variable definition",
                "Type Name = defaultValue",
                reference,
            ));
            None
        }
    }
}

impl ParsableNode for VariableBlock {
    fn parse(&mut self, context: &mut ParseLineContext<'_>) -> NextNode {
        match variable_definition(context) {
            Some(variable) => {
                self.variables.push(variable);
                NextNode::Leaf
            }
            None => NextNode::Ignore,
        }
    }
}

impl ParsableNode for TypeDefinition {
    fn parse(&mut self, context: &mut ParseLineContext<'_>) -> NextNode {
        match variable_definition(context) {
            Some(member) => {
                self.members.push(member);
                NextNode::Leaf
            }
            None => NextNode::Ignore,
        }
    }
}

impl ParsableNode for EnumDefinition {
    fn parse(&mut self, context: &mut ParseLineContext<'_>) -> NextNode {
        let tokens = context.tokens();
        let reference = context.reference();
        let member = match tokens {
            [name] => name.name().map(|name| (name, None)),
            [name, assign, value] if assign.is_operator(OperatorId::Assignment) => match (name.name(), &value.kind) {
                (Some(name), TokenKind::Number(number)) if number.fract() == 0.0 => Some((name, Some(*number as i64))),
                _ => None,
            },
            _ => None,
        };
        let Some((name, value)) = member else {
            context.report(errors::invalid_token_count("enum member", "Name = 1", reference));
            return NextNode::Ignore;
        };
        if self.contains_member(name) {
            context.report(errors::duplicated_name("enum member", name, reference));
            return NextNode::Ignore;
        }
        self.members.push(EnumMember {
            name: name.to_string(),
            reference,
            value,
        });
        NextNode::Leaf
    }
}

/// Cells of a `| a | b |` line, or `None` when the line is not wrapped in separators.
pub(super) fn table_cells(tokens: &[Token]) -> Option<Vec<&[Token]>> {
    let separator = |t: &Token| t.is_operator(OperatorId::TableSeparator);
    let (first, last) = (tokens.first()?, tokens.last()?);
    if tokens.len() < 2 || !separator(first) || !separator(last) {
        return None;
    }
    Some(tokens[1..tokens.len() - 1].split(|t| separator(t)).collect())
}

/// Parse each cell of a table row as a value expression.
pub(super) fn table_row(
    context: &mut ParseLineContext<'_>,
    cells: &[&[Token]],
    expected: usize,
) -> Result<TableRow, CompileError> {
    let reference = context.reference();
    if cells.len() != expected {
        return Err(CompileError::grammar(
            format!("Invalid number of values: {} found, {expected} expected.", cells.len()),
            reference,
        ));
    }
    let mut values = Vec::with_capacity(cells.len());
    for cell in cells {
        if cell.is_empty() {
            return Err(CompileError::grammar("Invalid table row: empty value.", reference));
        }
        values.push(context.parse_expression(cell)?);
    }
    Ok(TableRow { reference, values })
}

fn column_header(context: &ParseLineContext<'_>, cell: &[Token]) -> Result<ColumnHeader, CompileError> {
    let reference = cell
        .first()
        .map(|t| context.token_reference(t))
        .unwrap_or_else(|| context.reference());
    match cell {
        [type_token, name] => match (TypeAnnotation::from_token(type_token), name.name()) {
            (Some(TypeAnnotation::Implicit), _) | (None, _) | (_, None) => Err(invalid_column_header(cell, reference)),
            (Some(type_annotation), Some(name)) => Ok(ColumnHeader {
                name: name.to_string(),
                type_annotation,
                reference,
            }),
        },
        _ => Err(invalid_column_header(cell, reference)),
    }
}

fn invalid_column_header(cell: &[Token], reference: SourceReference) -> CompileError {
    CompileError::grammar(
        format!("Invalid column header '{}': expected 'type Name'.", cell.describe()),
        reference,
    )
}

impl Table {
    fn parse_header(&mut self, context: &mut ParseLineContext<'_>, cells: &[&[Token]]) -> Result<(), CompileError> {
        let columns = cells
            .iter()
            .map(|cell| column_header(context, cell))
            .collect::<Result<Vec<_>, _>>()?;
        for (index, column) in columns.iter().enumerate() {
            if columns[..index].iter().any(|c| c.name == column.name) {
                context.report(errors::duplicated_name("column", &column.name, column.reference.clone()));
            }
        }
        self.header = Some(TableHeader {
            reference: context.reference(),
            columns,
        });
        Ok(())
    }
}

impl ParsableNode for Table {
    fn parse(&mut self, context: &mut ParseLineContext<'_>) -> NextNode {
        let reference = context.reference();
        let Some(cells) = table_cells(context.tokens()) else {
            context.report(errors::invalid_token_count("table row", "| value | value |", reference));
            return NextNode::Ignore;
        };

        let result = match self.header.as_ref().map(|h| h.columns.len()) {
            Some(expected) => table_row(context, &cells, expected).map(|row| self.rows.push(row)),
            None => self.parse_header(context, &cells),
        };

        match result {
            Ok(()) => NextNode::Leaf,
            Err(error) => {
                context.report(error);
                NextNode::Ignore
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    #[test]
    fn test_table_cells() {
        let tokens = tokenize("| number A | string B |").unwrap();
        let cells = table_cells(&tokens).unwrap();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].describe(), "number A");

        assert!(table_cells(&tokenize("number A |").unwrap()).is_none());
        assert!(table_cells(&tokenize("|").unwrap()).is_none());
    }
}
