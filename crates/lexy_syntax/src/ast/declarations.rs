//! Function, enum, table and type declarations.

use lexy_core::lang::conventions::ROW_MEMBER;

use super::expr::{Expression, ExpressionList, NodeId, TypeAnnotation, VariablePath};
use crate::source::SourceReference;

/// `function Name` with optional `parameters`, `results` and `code` blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub reference: SourceReference,
    pub parameters: Option<VariableBlock>,
    pub results: Option<VariableBlock>,
    pub code: Option<ExpressionList>,
}

impl Function {
    pub fn new(name: impl Into<String>, reference: SourceReference) -> Self {
        Self {
            name: name.into(),
            reference,
            parameters: None,
            results: None,
            code: None,
        }
    }

    pub fn parameter_variables(&self) -> &[VariableDefinition] {
        self.parameters.as_ref().map_or(&[], |b| b.variables.as_slice())
    }

    pub fn result_variables(&self) -> &[VariableDefinition] {
        self.results.as_ref().map_or(&[], |b| b.variables.as_slice())
    }

    pub fn code_expressions(&self) -> &[Expression] {
        self.code.as_ref().map_or(&[], |c| c.expressions.as_slice())
    }
}

/// Which block a list of variable definitions belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableBlockKind {
    Parameters,
    Results,
}

/// `parameters` or `results` block of a function.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableBlock {
    pub kind: VariableBlockKind,
    pub reference: SourceReference,
    pub variables: Vec<VariableDefinition>,
}

impl VariableBlock {
    pub fn new(kind: VariableBlockKind, reference: SourceReference) -> Self {
        Self {
            kind,
            reference,
            variables: Vec::new(),
        }
    }
}

/// `Type Name [= default]` in a parameters, results or type block.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDefinition {
    pub id: NodeId,
    pub name: String,
    pub reference: SourceReference,
    pub type_annotation: TypeAnnotation,
    pub default: Option<Expression>,
}

/// `enum Name` with one member per line.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDefinition {
    pub name: String,
    pub reference: SourceReference,
    pub members: Vec<EnumMember>,
}

impl EnumDefinition {
    pub fn new(name: impl Into<String>, reference: SourceReference) -> Self {
        Self {
            name: name.into(),
            reference,
            members: Vec::new(),
        }
    }

    pub fn contains_member(&self, name: &str) -> bool {
        self.members.iter().any(|m| m.name == name)
    }
}

/// `Member` or `Member = 3`.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    pub name: String,
    pub reference: SourceReference,
    pub value: Option<i64>,
}

/// `table Name` with a `| type Name |` header and `| value |` rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub reference: SourceReference,
    pub header: Option<TableHeader>,
    pub rows: Vec<TableRow>,
}

impl Table {
    pub fn new(name: impl Into<String>, reference: SourceReference) -> Self {
        Self {
            name: name.into(),
            reference,
            header: None,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[ColumnHeader] {
        self.header.as_ref().map_or(&[], |h| h.columns.as_slice())
    }

    pub fn column(&self, name: &str) -> Option<&ColumnHeader> {
        self.columns().iter().find(|c| c.name == name)
    }

    /// Type path of one row: `Table.Row`.
    pub fn row_type_path(&self) -> VariablePath {
        VariablePath::from_name(self.name.clone()).append(ROW_MEMBER)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableHeader {
    pub reference: SourceReference,
    pub columns: Vec<ColumnHeader>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnHeader {
    pub name: String,
    pub type_annotation: TypeAnnotation,
    pub reference: SourceReference,
}

/// One `| ... |` row: a value expression per column.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub reference: SourceReference,
    pub values: Vec<Expression>,
}

/// `type Name` with one member definition per line.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefinition {
    pub name: String,
    pub reference: SourceReference,
    pub members: Vec<VariableDefinition>,
}

impl TypeDefinition {
    pub fn new(name: impl Into<String>, reference: SourceReference) -> Self {
        Self {
            name: name.into(),
            reference,
            members: Vec::new(),
        }
    }

    pub fn member(&self, name: &str) -> Option<&VariableDefinition> {
        self.members.iter().find(|m| m.name == name)
    }
}
