//! Validation of a parsed Lexy document: name resolution and type checking.
//!
//! Validation walks the root declarations in the given order and checks every expression against the type
//! system, recording results in a [`ValidationInfo`] so later stages never re-derive types.
//!
//! ## Notes
//!
//! - **Error accumulation**: every failure is logged against the declaration being validated and the walk
//!   continues. An expression whose type cannot be derived yields `None`, and checks that need that type are
//!   skipped so one mistake is reported once.
//! - **Scopes**: a function's parameters, results and top-level code share one scope. `if`/`elseif`/`else`/`case`
//!   bodies, type bodies, table rows and scenario blocks each get their own. A name is unique within its scope and
//!   shadows the same name in outer scopes.
//! - **Operators**: legal operand types come from an injected [`OperatorTypeRules`] table.
//!
//! ## See also
//!
//! - [`types`](super::types) – the type family, member lookup and assignability
//! - [`context`](super::context) – variable scopes and the guards that restore them

mod calls;
mod declarations;
mod expressions;
mod operators;
mod scenarios;

#[cfg(test)]
mod tests;

pub use operators::{OperandType, OperatorTypeRule, OperatorTypeRules};

use lexy_syntax::ast::RootNodeList;
use lexy_syntax::diagnostics::{CompileError, ParserLogger};
use lexy_syntax::source::SourceReference;

use super::context::{ValidationContext, ValidationInfo};
use super::types::{TypeSystem, VariableType};

/// Validate the root nodes at `order` (indices into `nodes.nodes`), logging failures to `logger`.
#[tracing::instrument(skip_all, fields(node_count = order.len()))]
pub fn validate(
    nodes: &RootNodeList,
    order: &[usize],
    rules: &OperatorTypeRules,
    logger: &mut ParserLogger,
) -> ValidationInfo {
    let mut context = ValidationContext::new(TypeSystem::new(nodes, rules), rules, logger);
    for node in order.iter().filter_map(|&index| nodes.nodes.get(index)) {
        tracing::trace!(node = node.name(), kind = %node.kind(), "validating");
        let mut node_context = context.in_node(node.name());
        node_context.check_root(node);
    }
    context.into_info()
}

fn expression_type_mismatch(expected: &VariableType, actual: &VariableType, reference: SourceReference) -> CompileError {
    CompileError::type_error(
        format!("Invalid expression type '{actual}'. Expected '{expected}'."),
        reference,
    )
}

fn not_assignable(
    variable: &str,
    target: &VariableType,
    value: &VariableType,
    reference: SourceReference,
) -> CompileError {
    CompileError::type_error(
        format!("Variable '{variable}' of type '{target}' is not assignable from type '{value}'."),
        reference,
    )
}
