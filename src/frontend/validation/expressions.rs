//! Expression checks: type derivation, variables, operators and control flow.

use lexy_core::lang::operators;
use lexy_syntax::ast::{
    AssignmentExpression, BinaryExpression, BracketedExpression, Expression, ExpressionKind, ExpressionList,
    SpreadAssignment, SwitchExpression, VariablePath,
};
use lexy_syntax::diagnostics::{CompileError, errors};

use super::declarations::Declaration;
use super::{expression_type_mismatch, not_assignable};
use crate::frontend::context::{ValidationContext, VariableSource};
use crate::frontend::types::{GeneratedType, GeneratedTypeSource, VariableType};

impl ValidationContext<'_> {
    /// Check a block body in its own scope.
    pub(super) fn check_body(&mut self, body: &ExpressionList) {
        let mut scope = self.scope();
        for expression in &body.expressions {
            scope.check_expression(expression);
        }
    }

    /// Derive the type of `expression`, record it and return it. `None` means an error was logged.
    pub(super) fn check_expression(&mut self, expression: &Expression) -> Option<VariableType> {
        let derived = self.derive_type(expression)?;
        self.record_type(expression.id, derived.clone());
        Some(derived)
    }

    fn derive_type(&mut self, expression: &Expression) -> Option<VariableType> {
        match &expression.kind {
            ExpressionKind::Literal(value) => Some(VariableType::Primitive(value.primitive_type())),
            ExpressionKind::Identifier(name) => self.check_variable(expression, &VariablePath::from_name(name.clone())),
            ExpressionKind::MemberAccess(path) => self.check_variable(expression, path),
            ExpressionKind::Binary(binary) => self.check_binary(expression, binary),
            ExpressionKind::Assignment(assignment) => self.check_assignment(expression, assignment),
            ExpressionKind::VariableDeclaration(declaration) => {
                let declaration = Declaration {
                    id: expression.id,
                    name: &declaration.name,
                    annotation: &declaration.type_annotation,
                    default: declaration.default.as_deref(),
                    reference: &expression.reference,
                };
                self.check_declaration(declaration, VariableSource::Code);
                Some(VariableType::Void)
            }
            ExpressionKind::Parenthesized(inner) => self.check_expression(inner),
            ExpressionKind::Bracketed(bracketed) => self.check_bracketed(expression, bracketed),
            ExpressionKind::FunctionCall(call) => self.check_call(expression, call),
            ExpressionKind::If(chain) => {
                self.check_condition("if", &chain.condition);
                self.check_body(&chain.body);
                for alternative in &chain.alternatives {
                    self.check_expression(alternative);
                }
                Some(VariableType::Void)
            }
            ExpressionKind::ElseIf(branch) => {
                self.check_condition("elseif", &branch.condition);
                self.check_body(&branch.body);
                Some(VariableType::Void)
            }
            ExpressionKind::Else(branch) => {
                self.check_body(&branch.body);
                Some(VariableType::Void)
            }
            ExpressionKind::Switch(switch) => self.check_switch(switch),
            // Case values are checked against the switch they belong to.
            ExpressionKind::Case(case) => {
                self.check_body(&case.body);
                Some(VariableType::Void)
            }
            ExpressionKind::Spread => {
                self.report(CompileError::semantic(
                    "Invalid spread: '...' is only allowed as a function argument.",
                    expression.reference.clone(),
                ));
                None
            }
            ExpressionKind::SpreadAssignment(spread) => self.check_spread_assignment(expression, spread),
        }
    }

    /// A variable in scope, or else a root declaration, followed by member lookups.
    fn check_variable(&mut self, expression: &Expression, path: &VariablePath) -> Option<VariableType> {
        if let Some(variable) = self.variable_type_by_path(path) {
            let variable_type = variable.variable_type.clone();
            self.record_variable(expression.id, variable);
            return Some(variable_type);
        }
        if !self.variables().contains(path.root()) {
            let types = self.types();
            let mut resolved = types.root_type(path.root());
            for member in &path.parts()[1..] {
                resolved = resolved.and_then(|owner| types.member_type(&owner, member));
            }
            if resolved.is_some() {
                return resolved;
            }
        }
        self.report(errors::unknown_variable(&path.to_string(), expression.reference.clone()));
        None
    }

    fn check_binary(&mut self, expression: &Expression, binary: &BinaryExpression) -> Option<VariableType> {
        let left = self.check_expression(&binary.left);
        let right = self.check_expression(&binary.right);
        let (left, right) = (left?, right?);
        let result = self.rules().result_type(binary.operator, &left, &right);
        if result.is_none() {
            self.report(errors::invalid_operator_types(
                operators::as_str(binary.operator),
                &left.to_string(),
                &right.to_string(),
                expression.reference.clone(),
            ));
        }
        result
    }

    fn check_assignment(&mut self, expression: &Expression, assignment: &AssignmentExpression) -> Option<VariableType> {
        let target = &assignment.target;
        if !matches!(target.kind, ExpressionKind::Identifier(_) | ExpressionKind::MemberAccess(_)) {
            self.report(CompileError::semantic(
                format!("Invalid assignment target '{target}': variable expected."),
                target.reference.clone(),
            ));
            self.check_expression(&assignment.value);
            return None;
        }
        let target_type = self.check_expression(target);
        let value_type = self.check_expression(&assignment.value);
        let target_type = target_type?;
        if self.info().variable(target.id).is_none() {
            self.report(CompileError::semantic(
                format!("Invalid assignment target '{target}': variable expected."),
                target.reference.clone(),
            ));
            return None;
        }
        let value_type = value_type?;
        if !self.types().is_assignable(&target_type, &value_type) {
            self.report(not_assignable(
                &target.to_string(),
                &target_type,
                &value_type,
                expression.reference.clone(),
            ));
        }
        Some(VariableType::Void)
    }

    fn check_condition(&mut self, keyword: &str, condition: &Expression) {
        let Some(condition_type) = self.check_expression(condition) else {
            return;
        };
        if condition_type != VariableType::BOOLEAN {
            self.report(CompileError::type_error(
                format!("Invalid '{keyword}' condition type '{condition_type}'. Expected 'boolean'."),
                condition.reference.clone(),
            ));
        }
    }

    fn check_switch(&mut self, switch: &SwitchExpression) -> Option<VariableType> {
        let condition_type = self.check_expression(&switch.condition);
        let mut has_default = false;
        for case_expression in &switch.cases {
            let ExpressionKind::Case(case) = &case_expression.kind else {
                continue;
            };
            match &case.value {
                Some(value) => {
                    let value_type = self.check_expression(value);
                    if let (Some(expected), Some(actual)) = (&condition_type, &value_type) {
                        if expected != actual {
                            self.report(expression_type_mismatch(expected, actual, value.reference.clone()));
                        }
                    }
                }
                None if has_default => {
                    self.report(CompileError::semantic(
                        "Duplicated 'default' case.",
                        case_expression.reference.clone(),
                    ));
                }
                None => has_default = true,
            }
            self.check_expression(case_expression);
        }
        Some(VariableType::Void)
    }

    /// `Table[index]`: a row of a root table.
    fn check_bracketed(&mut self, expression: &Expression, bracketed: &BracketedExpression) -> Option<VariableType> {
        let index_type = self.check_expression(&bracketed.index);
        if let Some(index_type) = index_type {
            if index_type != VariableType::NUMBER {
                self.report(expression_type_mismatch(
                    &VariableType::NUMBER,
                    &index_type,
                    bracketed.index.reference.clone(),
                ));
            }
        }
        match self.types().root_type(&bracketed.target) {
            Some(VariableType::Table(name)) => Some(VariableType::Generated(GeneratedType::new(
                name,
                GeneratedTypeSource::TableRow,
            ))),
            _ => {
                self.report(CompileError::semantic(
                    format!("Invalid indexer: '{}' is not a table.", bracketed.target),
                    expression.reference.clone(),
                ));
                None
            }
        }
    }

    /// `... = Function(...)`: every result of the call is written to the variable with the same name.
    fn check_spread_assignment(&mut self, expression: &Expression, spread: &SpreadAssignment) -> Option<VariableType> {
        let results = self.check_expression(&spread.call)?;
        if !results.is_object() {
            self.report(CompileError::semantic(
                format!("Invalid spread assignment: '{}' has no results.", spread.call),
                expression.reference.clone(),
            ));
            return None;
        }
        for (name, result_type) in self.types().members(&results) {
            let Some(variable_type) = self.variables().get(&name).map(|v| v.variable_type.clone()) else {
                self.report(errors::unknown_variable(&name, expression.reference.clone()));
                continue;
            };
            if !self.types().is_assignable(&variable_type, &result_type) {
                self.report(not_assignable(&name, &variable_type, &result_type, expression.reference.clone()));
            }
        }
        Some(VariableType::Void)
    }
}
