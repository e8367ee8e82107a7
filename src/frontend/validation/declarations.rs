//! Root declarations: functions, enums, tables and types.

use lexy_syntax::ast::{
    EnumDefinition, Expression, Function, NodeId, RootNode, Table, TypeAnnotation, TypeDefinition,
    VariableDefinition,
};
use lexy_syntax::diagnostics::{CompileError, errors};
use lexy_syntax::source::SourceReference;

use super::expression_type_mismatch;
use crate::frontend::context::{ValidationContext, VariableSource};
use crate::frontend::types::VariableType;

/// A variable being declared, whether in a parameters/results/type block or in code.
pub(super) struct Declaration<'e> {
    pub id: NodeId,
    pub name: &'e str,
    pub annotation: &'e TypeAnnotation,
    pub default: Option<&'e Expression>,
    pub reference: &'e SourceReference,
}

impl<'e> From<&'e VariableDefinition> for Declaration<'e> {
    fn from(definition: &'e VariableDefinition) -> Self {
        Self {
            id: definition.id,
            name: &definition.name,
            annotation: &definition.type_annotation,
            default: definition.default.as_ref(),
            reference: &definition.reference,
        }
    }
}

impl ValidationContext<'_> {
    pub(super) fn check_root(&mut self, node: &RootNode) {
        match node {
            RootNode::Function(function) => self.check_function(function),
            RootNode::Enum(enum_definition) => self.check_enum(enum_definition),
            RootNode::Table(table) => self.check_table(table),
            RootNode::Type(type_definition) => self.check_type(type_definition),
            RootNode::Scenario(scenario) => self.check_scenario(scenario),
        }
    }

    pub(super) fn check_function(&mut self, function: &Function) {
        // Parameters, results and top-level code share the function scope; nested blocks get their own.
        let mut scope = self.scope();
        for variable in function.parameter_variables() {
            scope.check_declaration(variable.into(), VariableSource::Parameters);
        }
        for variable in function.result_variables() {
            scope.check_declaration(variable.into(), VariableSource::Results);
        }
        for expression in function.code_expressions() {
            scope.check_expression(expression);
        }
    }

    pub(super) fn check_enum(&mut self, enum_definition: &EnumDefinition) {
        if enum_definition.members.is_empty() {
            self.fail(
                &enum_definition.reference,
                format!("Invalid enum '{}': no members.", enum_definition.name),
            );
        }
        let mut values = Vec::new();
        for member in &enum_definition.members {
            let Some(value) = member.value else {
                continue;
            };
            if values.contains(&value) {
                self.report(CompileError::semantic(
                    format!("Duplicated enum value: '{value}'"),
                    member.reference.clone(),
                ));
            } else {
                values.push(value);
            }
        }
    }

    pub(super) fn check_table(&mut self, table: &Table) {
        let Some(header) = &table.header else {
            self.fail(&table.reference, format!("Invalid table '{}': no header.", table.name));
            return;
        };
        let types = self.types();
        let mut column_types = Vec::with_capacity(header.columns.len());
        for column in &header.columns {
            let resolved = types.resolve_annotation(&column.type_annotation);
            if resolved.is_none() {
                self.report(errors::unknown_type(&column.type_annotation.to_string(), column.reference.clone()));
            }
            column_types.push(resolved);
        }

        for row in &table.rows {
            let mut scope = self.scope();
            for (value, column_type) in row.values.iter().zip(&column_types) {
                let Some(value_type) = scope.check_expression(value) else {
                    continue;
                };
                let Some(column_type) = column_type else {
                    continue;
                };
                if !types.is_assignable(column_type, &value_type) {
                    scope.report(expression_type_mismatch(column_type, &value_type, value.reference.clone()));
                }
            }
        }
    }

    pub(super) fn check_type(&mut self, type_definition: &TypeDefinition) {
        let mut scope = self.scope();
        for member in &type_definition.members {
            if let TypeAnnotation::Named(path) = &member.type_annotation {
                if matches!(path.parts(), [only] if *only == type_definition.name) {
                    scope.report(CompileError::semantic(
                        format!("Invalid member '{}': type '{path}' cannot contain itself.", member.name),
                        member.reference.clone(),
                    ));
                    continue;
                }
            }
            scope.check_declaration(member.into(), VariableSource::Type);
        }
    }

    /// Resolve the declared type, check the default against it and register the variable.
    ///
    /// A declaration whose default does not match its type is not registered. Returns the registered type.
    pub(super) fn check_declaration(&mut self, declaration: Declaration<'_>, source: VariableSource) -> Option<VariableType> {
        let types = self.types();
        let declared = match declaration.annotation {
            TypeAnnotation::Implicit => None,
            annotation => match types.resolve_annotation(annotation) {
                Some(declared) => Some(declared),
                None => {
                    self.report(errors::unknown_type(&annotation.to_string(), declaration.reference.clone()));
                    return None;
                }
            },
        };
        let default_type = declaration.default.and_then(|default| self.check_expression(default));

        let variable_type = match (declared, default_type) {
            (Some(declared), Some(default_type)) => {
                if !types.is_assignable(&declared, &default_type) {
                    let reference = declaration.default.map_or(declaration.reference, |d| &d.reference);
                    self.report(expression_type_mismatch(&declared, &default_type, reference.clone()));
                    return None;
                }
                declared
            }
            (Some(declared), None) => declared,
            (None, Some(default_type)) => default_type,
            (None, None) => {
                if declaration.default.is_none() {
                    self.report(CompileError::semantic(
                        format!("Invalid variable declaration '{}': 'var' requires a default value.", declaration.name),
                        declaration.reference.clone(),
                    ));
                }
                return None;
            }
        };

        self.record_definition(declaration.id, variable_type.clone());
        self.register_variable_and_verify_unique(declaration.name, variable_type.clone(), source, declaration.reference)
            .then_some(variable_type)
    }
}
