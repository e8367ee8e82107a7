//! Function call checks: system, table, user and library functions.

use lexy_core::lang::functions;
use lexy_syntax::ast::{ColumnReference, Expression, ExpressionKind, FunctionCall, Table, TableCall, TypeArgument, UserCall};
use lexy_syntax::diagnostics::{CompileError, errors};

use super::{expression_type_mismatch, not_assignable};
use crate::frontend::context::ValidationContext;
use crate::frontend::types::{GeneratedType, GeneratedTypeSource, VariableType};

impl ValidationContext<'_> {
    pub(super) fn check_call(&mut self, expression: &Expression, call: &FunctionCall) -> Option<VariableType> {
        match call {
            FunctionCall::New(argument) => self.check_type_argument(call.name(), argument),
            FunctionCall::Fill(argument) => {
                let object = self.check_type_argument(call.name(), argument)?;
                self.check_same_named_variables(&object, expression, true);
                Some(object)
            }
            FunctionCall::Extract(argument) => {
                let object = self.check_expression(argument)?;
                if !object.is_object() {
                    self.report(CompileError::type_error(
                        format!("Invalid 'extract' argument type '{object}': type with members expected."),
                        argument.reference.clone(),
                    ));
                    return None;
                }
                self.check_same_named_variables(&object, expression, false);
                Some(VariableType::Void)
            }
            FunctionCall::Table(table_call) => self.check_table_call(table_call),
            FunctionCall::User(user_call) => self.check_user_call(expression, user_call),
        }
    }

    fn check_type_argument(&mut self, function: &str, argument: &TypeArgument) -> Option<VariableType> {
        match self.types().resolve_type_path(&argument.path) {
            Some(object) if object.is_object() => Some(object),
            Some(other) => {
                self.report(CompileError::type_error(
                    format!("Invalid '{function}' argument '{other}': type with members expected."),
                    argument.reference.clone(),
                ));
                None
            }
            None => {
                self.report(errors::unknown_type(&argument.path.to_string(), argument.reference.clone()));
                None
            }
        }
    }

    /// Members of `object` that have a same-named variable in scope must be type compatible with it: the variable
    /// flows into the member for `fill`, the member into the variable for `extract`.
    fn check_same_named_variables(&mut self, object: &VariableType, expression: &Expression, into_member: bool) {
        let types = self.types();
        for (name, member_type) in types.members(object) {
            let Some(variable_type) = self.variables().get(&name).map(|v| v.variable_type.clone()) else {
                continue;
            };
            let (target, value) = if into_member {
                (&member_type, &variable_type)
            } else {
                (&variable_type, &member_type)
            };
            if !types.is_assignable(target, value) {
                self.report(not_assignable(&name, target, value, expression.reference.clone()));
            }
        }
    }

    fn check_table_call(&mut self, call: &TableCall) -> Option<VariableType> {
        let types = self.types();
        let discriminator_type = call.discriminator.as_deref().and_then(|d| self.check_expression(d));
        let value_type = self.check_expression(&call.value);

        let Some(table) = types.nodes().table(&call.table) else {
            self.report(errors::unknown_table(&call.table, call.table_reference.clone()));
            return None;
        };

        let search_type = self.check_column(table, &call.search_column);
        if let (Some(column_type), Some(value_type)) = (&search_type, &value_type) {
            if !types.is_assignable(column_type, value_type) {
                self.report(expression_type_mismatch(column_type, value_type, call.value.reference.clone()));
            }
        }
        if let Some(column) = &call.discriminator_column {
            let column_type = self.check_column(table, column);
            if let (Some(column_type), Some(discriminator_type), Some(discriminator)) =
                (&column_type, &discriminator_type, &call.discriminator)
            {
                if !types.is_assignable(column_type, discriminator_type) {
                    self.report(expression_type_mismatch(
                        column_type,
                        discriminator_type,
                        discriminator.reference.clone(),
                    ));
                }
            }
        }

        match &call.result_column {
            Some(column) => self.check_column(table, column),
            None => Some(VariableType::Generated(GeneratedType::new(
                table.name.clone(),
                GeneratedTypeSource::TableRow,
            ))),
        }
    }

    fn check_column(&mut self, table: &Table, column: &ColumnReference) -> Option<VariableType> {
        if column.table != table.name {
            self.report(CompileError::semantic(
                format!("Invalid column reference '{column}': table '{}' expected.", table.name),
                column.reference.clone(),
            ));
            return None;
        }
        let Some(header) = table.column(&column.column) else {
            self.report(CompileError::semantic(
                format!("Unknown column name: '{column}'."),
                column.reference.clone(),
            ));
            return None;
        };
        self.types().resolve_annotation(&header.type_annotation)
    }

    /// A user function when one with that name exists, a library function otherwise.
    fn check_user_call(&mut self, expression: &Expression, call: &UserCall) -> Option<VariableType> {
        let types = self.types();
        if types.nodes().function(&call.name).is_some() {
            let parameters = VariableType::Generated(GeneratedType::new(
                call.name.clone(),
                GeneratedTypeSource::FunctionParameters,
            ));
            match call.arguments.as_slice() {
                [] => {}
                [argument] if matches!(argument.kind, ExpressionKind::Spread) => {
                    self.record_type(argument.id, parameters.clone());
                    self.check_same_named_variables(&parameters, argument, true);
                }
                [argument] => {
                    if let Some(argument_type) = self.check_expression(argument) {
                        if !types.is_assignable(&parameters, &argument_type) {
                            self.report(expression_type_mismatch(
                                &parameters,
                                &argument_type,
                                argument.reference.clone(),
                            ));
                        }
                    }
                }
                arguments => {
                    for argument in arguments {
                        self.check_expression(argument);
                    }
                    self.report(invalid_argument_count(&call.name, "0 or 1", arguments.len(), expression));
                }
            }
            return Some(VariableType::Generated(GeneratedType::new(
                call.name.clone(),
                GeneratedTypeSource::FunctionResults,
            )));
        }

        let Some(library) = functions::library_function(&call.name) else {
            for argument in &call.arguments {
                self.check_expression(argument);
            }
            self.report(errors::unknown_function(&call.name, expression.reference.clone()));
            return None;
        };
        for argument in call.arguments.iter().skip(library.parameters.len()) {
            self.check_expression(argument);
        }
        if call.arguments.len() != library.parameters.len() {
            self.report(invalid_argument_count(
                &call.name,
                &library.parameters.len().to_string(),
                call.arguments.len(),
                expression,
            ));
        }
        for (argument, expected) in call.arguments.iter().zip(library.parameters) {
            let Some(argument_type) = self.check_expression(argument) else {
                continue;
            };
            let expected = VariableType::Primitive(*expected);
            if argument_type != expected {
                self.report(expression_type_mismatch(&expected, &argument_type, argument.reference.clone()));
            }
        }
        Some(VariableType::Primitive(library.result))
    }
}

fn invalid_argument_count(function: &str, expected: &str, found: usize, expression: &Expression) -> CompileError {
    CompileError::semantic(
        format!("Invalid number of arguments for '{function}': {expected} expected, {found} found."),
        expression.reference.clone(),
    )
}
