//! Line parsers for scenarios and their blocks.

use lexy_core::lang::keywords::KeywordId;

use super::declarations::{table_cells, table_row};
use super::parsable::{NextNode, ParsableNode, ParseLineContext};
use crate::ast::{
    AssignmentBlock, AssignmentBlockKind, EnumDefinition, ExpectationKind, ExpectedErrors, ExpressionKind, Function,
    Scenario, ScenarioFunction, Table, ValidationColumn, ValidationTable,
};
use crate::diagnostics::errors;
use crate::lexer::{Token, TokenKind};

const FUNCTION: usize = 0;
const ENUM: usize = 1;
const TABLE: usize = 2;
const PARAMETERS: usize = 3;
const RESULTS: usize = 4;
const VALIDATION_TABLE: usize = 5;
const EXPECT_ERRORS: usize = 6;
const EXPECT_COMPONENT_ERRORS: usize = 7;
const EXPECT_EXECUTION_ERRORS: usize = 8;

impl Scenario {
    fn parse_function(&mut self, context: &mut ParseLineContext<'_>) -> NextNode {
        let reference = context.reference();
        if self.function.is_some() {
            context.report(errors::duplicated_block("function", reference));
            return NextNode::Ignore;
        }
        match context.tokens() {
            [_] => {
                self.function = Some(ScenarioFunction::Inline(Function::new(self.name.clone(), reference)));
                NextNode::child(FUNCTION)
            }
            [_, name] if name.name().is_some() => {
                self.function = Some(ScenarioFunction::Reference {
                    name: name.name().unwrap_or_default().to_string(),
                    reference: context.token_reference(name),
                });
                NextNode::Leaf
            }
            _ => {
                context.report(errors::invalid_token_count("scenario function", "function Name", reference));
                NextNode::Ignore
            }
        }
    }

    fn parse_expect_error(&mut self, context: &mut ParseLineContext<'_>) -> NextNode {
        let reference = context.reference();
        if self.expect_error.is_some() {
            context.report(errors::duplicated_block("expectError", reference));
            return NextNode::Ignore;
        }
        match context.tokens() {
            [_, message] if message.kind.quoted().is_some() => {
                let mut expected = ExpectedErrors::new(ExpectationKind::Error, reference);
                expected.messages.extend(message.kind.quoted().map(str::to_string));
                self.expect_error = Some(expected);
                NextNode::Leaf
            }
            _ => {
                context.report(errors::invalid_token_count("expectError", "expectError \"message\"", reference));
                NextNode::Ignore
            }
        }
    }
}

impl ParsableNode for Scenario {
    fn parse(&mut self, context: &mut ParseLineContext<'_>) -> NextNode {
        let tokens = context.tokens();
        let Some(first) = tokens.first() else {
            return NextNode::Leaf;
        };
        let reference = context.reference();

        let keyword = first.keyword_id();
        match keyword {
            Some(KeywordId::Function) => return self.parse_function(context),
            Some(KeywordId::ExpectError) => return self.parse_expect_error(context),
            _ => {}
        }

        let (slot, name) = match keyword {
            Some(KeywordId::Enum) => (ENUM, "enum"),
            Some(KeywordId::Table) => (TABLE, "table"),
            Some(KeywordId::Parameters) => (PARAMETERS, "parameters"),
            Some(KeywordId::Results) => (RESULTS, "results"),
            Some(KeywordId::ValidationTable) => (VALIDATION_TABLE, "validationTable"),
            Some(KeywordId::ExpectErrors) => (EXPECT_ERRORS, "expectErrors"),
            Some(KeywordId::ExpectComponentErrors) => (EXPECT_COMPONENT_ERRORS, "expectComponentErrors"),
            Some(KeywordId::ExpectExecutionErrors) => (EXPECT_EXECUTION_ERRORS, "expectExecutionErrors"),
            _ => {
                context.report(errors::invalid_token(
                    &first.to_string(),
                    "Scenario block keyword expected.",
                    reference,
                ));
                return NextNode::Ignore;
            }
        };
        if !context.expect_single_token(name) {
            return NextNode::Ignore;
        }
        if self.child_mut(slot).is_some() {
            context.report(errors::duplicated_block(name, reference));
            return NextNode::Ignore;
        }

        let scenario_name = self.name.clone();
        match slot {
            ENUM => self.enum_definition = Some(EnumDefinition::new(scenario_name, reference)),
            TABLE => self.table = Some(Table::new(scenario_name, reference)),
            PARAMETERS => self.parameters = Some(AssignmentBlock::new(AssignmentBlockKind::Parameters, reference)),
            RESULTS => self.results = Some(AssignmentBlock::new(AssignmentBlockKind::Results, reference)),
            VALIDATION_TABLE => self.validation_table = Some(ValidationTable::new(reference)),
            EXPECT_ERRORS => self.expect_errors = Some(ExpectedErrors::new(ExpectationKind::Errors, reference)),
            EXPECT_COMPONENT_ERRORS => {
                self.expect_component_errors = Some(ExpectedErrors::new(ExpectationKind::ComponentErrors, reference))
            }
            _ => {
                self.expect_execution_errors = Some(ExpectedErrors::new(ExpectationKind::ExecutionErrors, reference))
            }
        }
        NextNode::child(slot)
    }

    fn child_mut(&mut self, slot: usize) -> Option<&mut dyn ParsableNode> {
        match slot {
            FUNCTION => match &mut self.function {
                Some(ScenarioFunction::Inline(function)) => Some(function as &mut dyn ParsableNode),
                _ => None,
            },
            ENUM => self.enum_definition.as_mut().map(|n| n as &mut dyn ParsableNode),
            TABLE => self.table.as_mut().map(|n| n as &mut dyn ParsableNode),
            PARAMETERS => self.parameters.as_mut().map(|n| n as &mut dyn ParsableNode),
            RESULTS => self.results.as_mut().map(|n| n as &mut dyn ParsableNode),
            VALIDATION_TABLE => self.validation_table.as_mut().map(|n| n as &mut dyn ParsableNode),
            EXPECT_ERRORS => self.expect_errors.as_mut().map(|n| n as &mut dyn ParsableNode),
            EXPECT_COMPONENT_ERRORS => self.expect_component_errors.as_mut().map(|n| n as &mut dyn ParsableNode),
            EXPECT_EXECUTION_ERRORS => self.expect_execution_errors.as_mut().map(|n| n as &mut dyn ParsableNode),
            _ => None,
        }
    }
}

impl ParsableNode for AssignmentBlock {
    fn parse(&mut self, context: &mut ParseLineContext<'_>) -> NextNode {
        let expression = match context.parse_line_expression() {
            Ok(expression) => expression,
            Err(error) => {
                context.report(error);
                return NextNode::Ignore;
            }
        };
        if !matches!(expression.kind, ExpressionKind::Assignment(_)) {
            context.report(errors::invalid_token_count("assignment", "Name = value", expression.reference));
            return NextNode::Ignore;
        }
        self.assignments.push(expression);
        NextNode::Leaf
    }
}

fn validation_column(context: &ParseLineContext<'_>, cell: &[Token]) -> Option<ValidationColumn> {
    let [token] = cell else {
        return None;
    };
    let name = match &token.kind {
        TokenKind::MemberAccess(parts) => parts.join("."),
        _ => token.name()?.to_string(),
    };
    Some(ValidationColumn {
        name,
        reference: context.token_reference(token),
    })
}

impl ParsableNode for ValidationTable {
    fn parse(&mut self, context: &mut ParseLineContext<'_>) -> NextNode {
        let reference = context.reference();
        let Some(cells) = table_cells(context.tokens()) else {
            context.report(errors::invalid_token_count("validation table row", "| value | value |", reference));
            return NextNode::Ignore;
        };

        if let Some(expected) = self.header.as_ref().map(Vec::len) {
            return match table_row(context, &cells, expected) {
                Ok(row) => {
                    self.rows.push(row);
                    NextNode::Leaf
                }
                Err(error) => {
                    context.report(error);
                    NextNode::Ignore
                }
            };
        }

        let columns: Option<Vec<_>> = cells.iter().map(|cell| validation_column(context, cell)).collect();
        match columns {
            Some(columns) => {
                self.header = Some(columns);
                NextNode::Leaf
            }
            None => {
                context.report(errors::invalid_token_count("validation table header", "| Name | Name |", reference));
                NextNode::Ignore
            }
        }
    }
}

impl ParsableNode for ExpectedErrors {
    fn parse(&mut self, context: &mut ParseLineContext<'_>) -> NextNode {
        match context.tokens() {
            [message] if message.kind.quoted().is_some() => {
                self.messages.extend(message.kind.quoted().map(str::to_string));
                NextNode::Leaf
            }
            _ => {
                let reference = context.reference();
                context.report(errors::invalid_token_count("expected error", "\"message\"", reference));
                NextNode::Ignore
            }
        }
    }
}
