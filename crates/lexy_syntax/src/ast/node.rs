//! Uniform borrowed view over every node type.
//!
//! [`NodeRef`] gives tree walks (the dependency builder, the CLI tree printer, tests) one shape to match on:
//! a type tag, a source reference and the ordered children. Absent optional blocks are simply not listed.

use std::fmt;

use super::declarations::{
    ColumnHeader, EnumDefinition, EnumMember, Function, Table, TableHeader, TableRow, TypeDefinition,
    VariableBlock, VariableBlockKind, VariableDefinition,
};
use super::expr::{Expression, ExpressionKind, ExpressionList, FunctionCall};
use super::scenario::{AssignmentBlock, AssignmentBlockKind, ExpectedErrors, Scenario, ScenarioFunction, ValidationTable};
use crate::source::SourceReference;

/// Type tag of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Function,
    FunctionParameters,
    FunctionResults,
    FunctionCode,
    VariableDefinition,
    EnumDefinition,
    EnumMember,
    Table,
    TableHeader,
    ColumnHeader,
    TableRow,
    TypeDefinition,
    Scenario,
    ScenarioFunctionName,
    ScenarioParameters,
    ScenarioResults,
    ValidationTable,
    ExpectedErrors,
    ExpressionList,
    LiteralExpression,
    IdentifierExpression,
    MemberAccessExpression,
    BinaryExpression,
    AssignmentExpression,
    VariableDeclarationExpression,
    ParenthesizedExpression,
    BracketedExpression,
    NewFunctionExpression,
    FillFunctionExpression,
    ExtractFunctionExpression,
    TableFunctionExpression,
    FunctionCallExpression,
    IfExpression,
    ElseIfExpression,
    ElseExpression,
    SwitchExpression,
    CaseExpression,
    SpreadExpression,
    SpreadAssignmentExpression,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Borrowed view of any node.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Function(&'a Function),
    VariableBlock(&'a VariableBlock),
    Variable(&'a VariableDefinition),
    Code(&'a ExpressionList),
    Enum(&'a EnumDefinition),
    EnumMember(&'a EnumMember),
    Table(&'a Table),
    TableHeader(&'a TableHeader),
    Column(&'a ColumnHeader),
    TableRow(&'a TableRow),
    Type(&'a TypeDefinition),
    Scenario(&'a Scenario),
    FunctionName(&'a ScenarioFunction),
    Assignments(&'a AssignmentBlock),
    ValidationTable(&'a ValidationTable),
    ExpectedErrors(&'a ExpectedErrors),
    Expressions(&'a ExpressionList),
    Expression(&'a Expression),
}

impl<'a> NodeRef<'a> {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::Function(_) => NodeKind::Function,
            NodeRef::VariableBlock(b) => match b.kind {
                VariableBlockKind::Parameters => NodeKind::FunctionParameters,
                VariableBlockKind::Results => NodeKind::FunctionResults,
            },
            NodeRef::Variable(_) => NodeKind::VariableDefinition,
            NodeRef::Code(_) => NodeKind::FunctionCode,
            NodeRef::Enum(_) => NodeKind::EnumDefinition,
            NodeRef::EnumMember(_) => NodeKind::EnumMember,
            NodeRef::Table(_) => NodeKind::Table,
            NodeRef::TableHeader(_) => NodeKind::TableHeader,
            NodeRef::Column(_) => NodeKind::ColumnHeader,
            NodeRef::TableRow(_) => NodeKind::TableRow,
            NodeRef::Type(_) => NodeKind::TypeDefinition,
            NodeRef::Scenario(_) => NodeKind::Scenario,
            NodeRef::FunctionName(_) => NodeKind::ScenarioFunctionName,
            NodeRef::Assignments(b) => match b.kind {
                AssignmentBlockKind::Parameters => NodeKind::ScenarioParameters,
                AssignmentBlockKind::Results => NodeKind::ScenarioResults,
            },
            NodeRef::ValidationTable(_) => NodeKind::ValidationTable,
            NodeRef::ExpectedErrors(_) => NodeKind::ExpectedErrors,
            NodeRef::Expressions(_) => NodeKind::ExpressionList,
            NodeRef::Expression(e) => expression_kind(e),
        }
    }

    pub fn reference(&self) -> &'a SourceReference {
        match self {
            NodeRef::Function(n) => &n.reference,
            NodeRef::VariableBlock(n) => &n.reference,
            NodeRef::Variable(n) => &n.reference,
            NodeRef::Code(n) => &n.reference,
            NodeRef::Enum(n) => &n.reference,
            NodeRef::EnumMember(n) => &n.reference,
            NodeRef::Table(n) => &n.reference,
            NodeRef::TableHeader(n) => &n.reference,
            NodeRef::Column(n) => &n.reference,
            NodeRef::TableRow(n) => &n.reference,
            NodeRef::Type(n) => &n.reference,
            NodeRef::Scenario(n) => &n.reference,
            NodeRef::FunctionName(n) => n.reference(),
            NodeRef::Assignments(n) => &n.reference,
            NodeRef::ValidationTable(n) => &n.reference,
            NodeRef::ExpectedErrors(n) => &n.reference,
            NodeRef::Expressions(n) => &n.reference,
            NodeRef::Expression(n) => &n.reference,
        }
    }

    /// Name of named nodes (declarations, members, columns, variables).
    pub fn name(&self) -> Option<&'a str> {
        match self {
            NodeRef::Function(n) => Some(&n.name),
            NodeRef::Variable(n) => Some(&n.name),
            NodeRef::Enum(n) => Some(&n.name),
            NodeRef::EnumMember(n) => Some(&n.name),
            NodeRef::Table(n) => Some(&n.name),
            NodeRef::Column(n) => Some(&n.name),
            NodeRef::Type(n) => Some(&n.name),
            NodeRef::Scenario(n) => Some(&n.name),
            NodeRef::FunctionName(ScenarioFunction::Reference { name, .. }) => Some(name),
            NodeRef::FunctionName(ScenarioFunction::Inline(f)) => Some(&f.name),
            _ => None,
        }
    }

    /// Ordered children. Absent blocks are skipped, never represented by placeholders.
    pub fn children(&self) -> Vec<NodeRef<'a>> {
        match *self {
            NodeRef::Function(f) => {
                let mut children = Vec::new();
                children.extend(f.parameters.as_ref().map(NodeRef::VariableBlock));
                children.extend(f.results.as_ref().map(NodeRef::VariableBlock));
                children.extend(f.code.as_ref().map(NodeRef::Code));
                children
            }
            NodeRef::VariableBlock(b) => b.variables.iter().map(NodeRef::Variable).collect(),
            NodeRef::Variable(v) => v.default.iter().map(NodeRef::Expression).collect(),
            NodeRef::Code(list) | NodeRef::Expressions(list) => {
                list.expressions.iter().map(NodeRef::Expression).collect()
            }
            NodeRef::Enum(e) => e.members.iter().map(NodeRef::EnumMember).collect(),
            NodeRef::EnumMember(_) | NodeRef::Column(_) | NodeRef::ExpectedErrors(_) => Vec::new(),
            NodeRef::Table(t) => {
                let mut children = Vec::new();
                children.extend(t.header.as_ref().map(NodeRef::TableHeader));
                children.extend(t.rows.iter().map(NodeRef::TableRow));
                children
            }
            NodeRef::TableHeader(h) => h.columns.iter().map(NodeRef::Column).collect(),
            NodeRef::TableRow(r) => r.values.iter().map(NodeRef::Expression).collect(),
            NodeRef::Type(t) => t.members.iter().map(NodeRef::Variable).collect(),
            NodeRef::Scenario(s) => {
                let mut children = Vec::new();
                match &s.function {
                    Some(ScenarioFunction::Inline(f)) => children.push(NodeRef::Function(f)),
                    Some(reference) => children.push(NodeRef::FunctionName(reference)),
                    None => {}
                }
                children.extend(s.enum_definition.as_ref().map(NodeRef::Enum));
                children.extend(s.table.as_ref().map(NodeRef::Table));
                children.extend(s.parameters.as_ref().map(NodeRef::Assignments));
                children.extend(s.results.as_ref().map(NodeRef::Assignments));
                children.extend(s.validation_table.as_ref().map(NodeRef::ValidationTable));
                children.extend(s.expectations().map(NodeRef::ExpectedErrors));
                children
            }
            NodeRef::FunctionName(_) => Vec::new(),
            NodeRef::Assignments(b) => b.assignments.iter().map(NodeRef::Expression).collect(),
            NodeRef::ValidationTable(v) => v.rows.iter().map(NodeRef::TableRow).collect(),
            NodeRef::Expression(e) => expression_children(e),
        }
    }
}

fn expression_kind(expression: &Expression) -> NodeKind {
    match &expression.kind {
        ExpressionKind::Literal(_) => NodeKind::LiteralExpression,
        ExpressionKind::Identifier(_) => NodeKind::IdentifierExpression,
        ExpressionKind::MemberAccess(_) => NodeKind::MemberAccessExpression,
        ExpressionKind::Binary(_) => NodeKind::BinaryExpression,
        ExpressionKind::Assignment(_) => NodeKind::AssignmentExpression,
        ExpressionKind::VariableDeclaration(_) => NodeKind::VariableDeclarationExpression,
        ExpressionKind::Parenthesized(_) => NodeKind::ParenthesizedExpression,
        ExpressionKind::Bracketed(_) => NodeKind::BracketedExpression,
        ExpressionKind::FunctionCall(call) => match call {
            FunctionCall::New(_) => NodeKind::NewFunctionExpression,
            FunctionCall::Fill(_) => NodeKind::FillFunctionExpression,
            FunctionCall::Extract(_) => NodeKind::ExtractFunctionExpression,
            FunctionCall::Table(_) => NodeKind::TableFunctionExpression,
            FunctionCall::User(_) => NodeKind::FunctionCallExpression,
        },
        ExpressionKind::If(_) => NodeKind::IfExpression,
        ExpressionKind::ElseIf(_) => NodeKind::ElseIfExpression,
        ExpressionKind::Else(_) => NodeKind::ElseExpression,
        ExpressionKind::Switch(_) => NodeKind::SwitchExpression,
        ExpressionKind::Case(_) => NodeKind::CaseExpression,
        ExpressionKind::Spread => NodeKind::SpreadExpression,
        ExpressionKind::SpreadAssignment(_) => NodeKind::SpreadAssignmentExpression,
    }
}

/// Block bodies are exposed as `ExpressionList` children so the tree keeps its shape.
fn expression_children(expression: &Expression) -> Vec<NodeRef<'_>> {
    match &expression.kind {
        ExpressionKind::If(i) => {
            let mut children = vec![NodeRef::Expression(i.condition.as_ref()), NodeRef::Expressions(&i.body)];
            children.extend(i.alternatives.iter().map(NodeRef::Expression));
            children
        }
        ExpressionKind::ElseIf(e) => vec![NodeRef::Expression(e.condition.as_ref()), NodeRef::Expressions(&e.body)],
        ExpressionKind::Else(e) => vec![NodeRef::Expressions(&e.body)],
        ExpressionKind::Case(c) => {
            let mut children: Vec<NodeRef<'_>> = c.value.iter().map(|v| NodeRef::Expression(v.as_ref())).collect();
            children.push(NodeRef::Expressions(&c.body));
            children
        }
        _ => expression.children().into_iter().map(NodeRef::Expression).collect(),
    }
}

/// Depth-first pre-order walk from `node`, `node` included.
pub fn walk<'a>(node: NodeRef<'a>, visit: &mut dyn FnMut(NodeRef<'a>)) {
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        visit(current);
        let children = current.children();
        stack.extend(children.into_iter().rev());
    }
}
