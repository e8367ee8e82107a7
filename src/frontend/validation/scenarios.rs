//! Scenario checks.
//!
//! Scenario `parameters`, `results` and `validationTable` blocks refer to the parameters and results of the
//! function under test by name. Each block is checked in its own scope into which those names are injected.

use lexy_syntax::ast::{AssignmentBlock, Function, Scenario, ScenarioFunction, ValidationTable, VariablePath};
use lexy_syntax::diagnostics::{CompileError, errors};

use super::expression_type_mismatch;
use crate::frontend::context::{ValidationContext, VariableSource};
use crate::frontend::types::GeneratedTypeSource;

impl ValidationContext<'_> {
    pub(super) fn check_scenario(&mut self, scenario: &Scenario) {
        let types = self.types();
        let function = match &scenario.function {
            Some(ScenarioFunction::Inline(function)) => {
                self.check_function(function);
                Some(function)
            }
            Some(ScenarioFunction::Reference { name, reference }) => {
                let function = types.nodes().function(name);
                if function.is_none() {
                    self.report(errors::unknown_function(name, reference.clone()));
                }
                function
            }
            None => None,
        };
        if let Some(enum_definition) = &scenario.enum_definition {
            self.check_enum(enum_definition);
        }
        if let Some(table) = &scenario.table {
            self.check_table(table);
        }
        if scenario.function.is_none() && scenario.enum_definition.is_none() && scenario.table.is_none() {
            self.report(CompileError::semantic(
                format!("Invalid scenario '{}': function, enum or table expected.", scenario.name),
                scenario.reference.clone(),
            ));
        }

        let Some(function) = function else {
            return;
        };
        if let Some(block) = &scenario.parameters {
            self.check_scenario_assignments(function, block, VariableSource::Parameters);
        }
        if let Some(block) = &scenario.results {
            self.check_scenario_assignments(function, block, VariableSource::Results);
        }
        if let Some(table) = &scenario.validation_table {
            self.check_validation_table(function, table);
        }
    }

    /// Register the parameters and/or results of `function` in the current scope.
    fn inject_function_variables(&mut self, function: &Function, parameters: bool, results: bool) {
        let types = self.types();
        let blocks = [
            (parameters, function.parameter_variables(), GeneratedTypeSource::FunctionParameters),
            (results, function.result_variables(), GeneratedTypeSource::FunctionResults),
        ];
        for (_, variables, generated) in blocks.into_iter().filter(|(enabled, _, _)| *enabled) {
            let source = match generated {
                GeneratedTypeSource::FunctionResults => VariableSource::Results,
                _ => VariableSource::Parameters,
            };
            let member_types = types.function_members(function, generated);
            for variable in variables {
                let variable_type = member_types
                    .iter()
                    .find_map(|(name, t)| (*name == variable.name).then_some(t));
                if let Some(variable_type) = variable_type {
                    self.register_variable_and_verify_unique(
                        &variable.name,
                        variable_type.clone(),
                        source,
                        &variable.reference,
                    );
                }
            }
        }
    }

    fn check_scenario_assignments(&mut self, function: &Function, block: &AssignmentBlock, source: VariableSource) {
        let mut scope = self.scope();
        scope.inject_function_variables(
            function,
            source == VariableSource::Parameters,
            source == VariableSource::Results,
        );
        for assignment in &block.assignments {
            scope.check_expression(assignment);
        }
    }

    fn check_validation_table(&mut self, function: &Function, table: &ValidationTable) {
        let mut scope = self.scope();
        scope.inject_function_variables(function, true, true);

        let mut column_types = Vec::new();
        for column in table.columns() {
            let path = VariablePath::new(column.name.split('.').map(str::to_string).collect());
            let resolved = scope.variable_type_by_path(&path).map(|v| v.variable_type);
            if resolved.is_none() {
                scope.report(CompileError::semantic(
                    format!("Unknown parameter or result: '{}'.", column.name),
                    column.reference.clone(),
                ));
            }
            column_types.push(resolved);
        }

        let types = scope.types();
        for row in &table.rows {
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
}
