//! Expression nodes.
//!
//! Every expression carries a [`NodeId`] that is unique within one parse. Validation keys its side tables
//! (derived types, resolved variables) by that id, so two expressions on the same line never collide.

use std::cell::Cell;
use std::fmt;

use lexy_core::lang::conventions::{IMPLICIT_TYPE_KEYWORD, MEMBER_SEPARATOR};
use lexy_core::lang::functions::TableFunctionId;
use lexy_core::lang::operators::{self, OperatorId};
use lexy_core::lang::types::{self, PrimitiveTypeId};

use crate::lexer::{DateTimeLiteral, Token, TokenKind};
use crate::source::SourceReference;

/// Identity of an expression or variable definition within one parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Hands out [`NodeId`]s. Shared by reference across the parser and the expression factory.
#[derive(Debug, Default)]
pub struct NodeIds {
    next: Cell<u32>,
}

impl NodeIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> NodeId {
        let id = self.next.get();
        self.next.set(id + 1);
        NodeId(id)
    }
}

/// Dotted path such as `Parameters.Person.Name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariablePath {
    parts: Vec<String>,
}

impl VariablePath {
    /// An empty `parts` becomes a single empty segment, so `root()` is always defined.
    pub fn new(parts: Vec<String>) -> Self {
        if parts.is_empty() {
            return Self {
                parts: vec![String::new()],
            };
        }
        Self { parts }
    }

    pub fn from_name(name: impl Into<String>) -> Self {
        Self {
            parts: vec![name.into()],
        }
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn root(&self) -> &str {
        &self.parts[0]
    }

    pub fn last(&self) -> &str {
        &self.parts[self.parts.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.iter().all(String::is_empty)
    }

    pub fn has_children(&self) -> bool {
        self.parts.len() > 1
    }

    /// The path without its root segment.
    pub fn child_path(&self) -> Option<VariablePath> {
        self.has_children().then(|| VariablePath {
            parts: self.parts[1..].to_vec(),
        })
    }

    /// The path without its last segment.
    pub fn parent(&self) -> Option<VariablePath> {
        self.has_children().then(|| VariablePath {
            parts: self.parts[..self.parts.len() - 1].to_vec(),
        })
    }

    pub fn append(&self, name: impl Into<String>) -> VariablePath {
        let mut parts = self.parts.clone();
        parts.push(name.into());
        VariablePath { parts }
    }
}

impl fmt::Display for VariablePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = MEMBER_SEPARATOR.to_string();
        f.write_str(&self.parts.join(separator.as_str()))
    }
}

/// Declared type of a variable or column as written in source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeAnnotation {
    Primitive(PrimitiveTypeId),
    /// `var`: the type is taken from the default value.
    Implicit,
    /// An enum, table row, custom type or generated type: `Marital`, `Tax.Row`, `Calculate.Parameters`.
    Named(VariablePath),
}

impl TypeAnnotation {
    /// Interpret a single token as a type annotation.
    pub fn from_token(token: &Token) -> Option<Self> {
        match &token.kind {
            TokenKind::Keyword(word) if word == IMPLICIT_TYPE_KEYWORD => Some(TypeAnnotation::Implicit),
            TokenKind::Keyword(word) => match types::from_str(word) {
                Some(id) => Some(TypeAnnotation::Primitive(id)),
                None => token.name().map(|n| TypeAnnotation::Named(VariablePath::from_name(n))),
            },
            TokenKind::MemberAccess(parts) => Some(TypeAnnotation::Named(VariablePath::new(parts.clone()))),
            _ => None,
        }
    }
}

impl fmt::Display for TypeAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeAnnotation::Primitive(id) => f.write_str(types::as_str(*id)),
            TypeAnnotation::Implicit => f.write_str(IMPLICIT_TYPE_KEYWORD),
            TypeAnnotation::Named(path) => write!(f, "{path}"),
        }
    }
}

/// Literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Number(f64),
    String(String),
    Boolean(bool),
    Date(DateTimeLiteral),
}

impl LiteralValue {
    pub fn from_token(token: &Token) -> Option<Self> {
        match &token.kind {
            TokenKind::Number(value) => Some(LiteralValue::Number(*value)),
            TokenKind::QuotedLiteral(text) => Some(LiteralValue::String(text.clone())),
            TokenKind::Boolean(value) => Some(LiteralValue::Boolean(*value)),
            TokenKind::DateTime(date) => Some(LiteralValue::Date(*date)),
            _ => None,
        }
    }

    pub fn primitive_type(&self) -> PrimitiveTypeId {
        match self {
            LiteralValue::Number(_) => PrimitiveTypeId::Number,
            LiteralValue::String(_) => PrimitiveTypeId::String,
            LiteralValue::Boolean(_) => PrimitiveTypeId::Boolean,
            LiteralValue::Date(_) => PrimitiveTypeId::Date,
        }
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Number(value) => write!(f, "{value}"),
            LiteralValue::String(text) => write!(f, "\"{text}\""),
            LiteralValue::Boolean(value) => write!(f, "{value}"),
            LiteralValue::Date(date) => write!(f, "{date}"),
        }
    }
}

/// An expression with identity and location.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub id: NodeId,
    pub reference: SourceReference,
    pub kind: ExpressionKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    Literal(LiteralValue),
    Identifier(String),
    MemberAccess(VariablePath),
    Binary(BinaryExpression),
    Assignment(AssignmentExpression),
    VariableDeclaration(VariableDeclaration),
    Parenthesized(Box<Expression>),
    /// `Table[index]`: a row of a table by position.
    Bracketed(BracketedExpression),
    FunctionCall(FunctionCall),
    If(IfExpression),
    ElseIf(ElseIfExpression),
    Else(ElseExpression),
    Switch(SwitchExpression),
    Case(CaseExpression),
    /// `...` as a call argument.
    Spread,
    /// `... = Function(...)`
    SpreadAssignment(SpreadAssignment),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    pub left: Box<Expression>,
    pub operator: OperatorId,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentExpression {
    pub target: Box<Expression>,
    pub value: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    pub type_annotation: TypeAnnotation,
    pub name: String,
    pub default: Option<Box<Expression>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BracketedExpression {
    pub target: String,
    pub index: Box<Expression>,
}

/// Ordered body of a block: function code, `if` branches, `case` bodies.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionList {
    pub reference: SourceReference,
    pub expressions: Vec<Expression>,
}

impl ExpressionList {
    pub fn new(reference: SourceReference) -> Self {
        Self {
            reference,
            expressions: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfExpression {
    pub condition: Box<Expression>,
    pub body: ExpressionList,
    /// `elseif` and `else` branches in source order.
    pub alternatives: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElseIfExpression {
    pub condition: Box<Expression>,
    pub body: ExpressionList,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElseExpression {
    pub body: ExpressionList,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchExpression {
    pub condition: Box<Expression>,
    /// `case` and `default` expressions.
    pub cases: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseExpression {
    /// `None` for `default`.
    pub value: Option<Box<Expression>>,
    pub body: ExpressionList,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpreadAssignment {
    pub call: Box<Expression>,
}

/// Function call forms.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionCall {
    /// `new(Type)`: a default-initialized object.
    New(TypeArgument),
    /// `fill(Type)`: an object populated from same-named variables in scope.
    Fill(TypeArgument),
    /// `extract(variable)`: copy members of an object into same-named variables.
    Extract(Box<Expression>),
    Table(TableCall),
    /// A user function or, failing that, a library function.
    User(UserCall),
}

impl FunctionCall {
    pub fn name(&self) -> &str {
        use lexy_core::lang::functions::{self, SystemFunctionId};
        match self {
            FunctionCall::New(_) => functions::system_function_info(SystemFunctionId::New).canonical,
            FunctionCall::Fill(_) => functions::system_function_info(SystemFunctionId::Fill).canonical,
            FunctionCall::Extract(_) => functions::system_function_info(SystemFunctionId::Extract).canonical,
            FunctionCall::Table(call) => functions::table_function_info(call.function).canonical,
            FunctionCall::User(call) => &call.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeArgument {
    pub path: VariablePath,
    pub reference: SourceReference,
}

/// `lookUp`, `lookUpBy`, `lookUpRow`, `lookUpRowBy`.
#[derive(Debug, Clone, PartialEq)]
pub struct TableCall {
    pub function: TableFunctionId,
    pub table: String,
    pub table_reference: SourceReference,
    pub discriminator: Option<Box<Expression>>,
    pub value: Box<Expression>,
    pub discriminator_column: Option<ColumnReference>,
    pub search_column: ColumnReference,
    /// Only set for value lookups, row lookups return the whole row.
    pub result_column: Option<ColumnReference>,
}

/// `Table.Column` argument of a table function.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnReference {
    pub table: String,
    pub column: String,
    pub reference: SourceReference,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserCall {
    pub name: String,
    pub arguments: Vec<Expression>,
}

/// Read or write access to a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableAccess {
    Read,
    Write,
}

/// A variable touched by an expression, as written in source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariableUsage {
    pub path: VariablePath,
    pub access: VariableAccess,
}

impl Expression {
    pub fn new(id: NodeId, reference: SourceReference, kind: ExpressionKind) -> Self {
        Self { id, reference, kind }
    }

    /// Expressions that own an indented body.
    pub fn is_block(&self) -> bool {
        matches!(
            self.kind,
            ExpressionKind::If(_)
                | ExpressionKind::ElseIf(_)
                | ExpressionKind::Else(_)
                | ExpressionKind::Switch(_)
                | ExpressionKind::Case(_)
        )
    }

    /// Direct sub-expressions, bodies flattened in source order.
    pub fn children(&self) -> Vec<&Expression> {
        match &self.kind {
            ExpressionKind::Literal(_)
            | ExpressionKind::Identifier(_)
            | ExpressionKind::MemberAccess(_)
            | ExpressionKind::Spread => Vec::new(),
            ExpressionKind::Binary(b) => vec![b.left.as_ref(), b.right.as_ref()],
            ExpressionKind::Assignment(a) => vec![a.target.as_ref(), a.value.as_ref()],
            ExpressionKind::VariableDeclaration(d) => d.default.iter().map(Box::as_ref).collect(),
            ExpressionKind::Parenthesized(inner) => vec![inner.as_ref()],
            ExpressionKind::Bracketed(b) => vec![b.index.as_ref()],
            ExpressionKind::FunctionCall(call) => match call {
                FunctionCall::New(_) | FunctionCall::Fill(_) => Vec::new(),
                FunctionCall::Extract(argument) => vec![argument.as_ref()],
                FunctionCall::Table(t) => t.discriminator.iter().map(Box::as_ref).chain([t.value.as_ref()]).collect(),
                FunctionCall::User(u) => u.arguments.iter().collect(),
            },
            ExpressionKind::If(i) => std::iter::once(i.condition.as_ref())
                .chain(i.body.expressions.iter())
                .chain(i.alternatives.iter())
                .collect(),
            ExpressionKind::ElseIf(e) => std::iter::once(e.condition.as_ref())
                .chain(e.body.expressions.iter())
                .collect(),
            ExpressionKind::Else(e) => e.body.expressions.iter().collect(),
            ExpressionKind::Switch(s) => std::iter::once(s.condition.as_ref()).chain(s.cases.iter()).collect(),
            ExpressionKind::Case(c) => c.value.iter().map(Box::as_ref).chain(c.body.expressions.iter()).collect(),
            ExpressionKind::SpreadAssignment(s) => vec![s.call.as_ref()],
        }
    }

    /// Variables read or written by this expression and its children, syntactically.
    pub fn used_variables(&self) -> Vec<VariableUsage> {
        let mut usages = Vec::new();
        self.collect_variables(VariableAccess::Read, &mut usages);
        usages
    }

    fn collect_variables(&self, access: VariableAccess, usages: &mut Vec<VariableUsage>) {
        match &self.kind {
            ExpressionKind::Identifier(name) => usages.push(VariableUsage {
                path: VariablePath::from_name(name.clone()),
                access,
            }),
            ExpressionKind::MemberAccess(path) => usages.push(VariableUsage {
                path: path.clone(),
                access,
            }),
            ExpressionKind::Assignment(a) => {
                a.target.collect_variables(VariableAccess::Write, usages);
                a.value.collect_variables(VariableAccess::Read, usages);
            }
            ExpressionKind::VariableDeclaration(d) => {
                usages.push(VariableUsage {
                    path: VariablePath::from_name(d.name.clone()),
                    access: VariableAccess::Write,
                });
                if let Some(default) = &d.default {
                    default.collect_variables(VariableAccess::Read, usages);
                }
            }
            _ => {
                for child in self.children() {
                    child.collect_variables(VariableAccess::Read, usages);
                }
            }
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExpressionKind::Literal(value) => write!(f, "{value}"),
            ExpressionKind::Identifier(name) => f.write_str(name),
            ExpressionKind::MemberAccess(path) => write!(f, "{path}"),
            ExpressionKind::Binary(b) => write!(f, "({} {} {})", b.left, operators::as_str(b.operator), b.right),
            ExpressionKind::Assignment(a) => write!(f, "{} = {}", a.target, a.value),
            ExpressionKind::VariableDeclaration(d) => match &d.default {
                Some(default) => write!(f, "{} {} = {default}", d.type_annotation, d.name),
                None => write!(f, "{} {}", d.type_annotation, d.name),
            },
            // Binary expressions already render their own parentheses.
            ExpressionKind::Parenthesized(inner) => match inner.kind {
                ExpressionKind::Binary(_) => write!(f, "{inner}"),
                _ => write!(f, "({inner})"),
            },
            ExpressionKind::Bracketed(b) => write!(f, "{}[{}]", b.target, b.index),
            ExpressionKind::FunctionCall(call) => match call {
                FunctionCall::New(t) | FunctionCall::Fill(t) => write!(f, "{}({})", call.name(), t.path),
                FunctionCall::Extract(argument) => write!(f, "{}({argument})", call.name()),
                FunctionCall::Table(t) => {
                    let mut arguments = vec![t.table.clone()];
                    arguments.extend(t.discriminator.iter().map(ToString::to_string));
                    arguments.push(t.value.to_string());
                    arguments.extend(t.discriminator_column.iter().map(ToString::to_string));
                    arguments.push(t.search_column.to_string());
                    arguments.extend(t.result_column.iter().map(ToString::to_string));
                    write!(f, "{}({})", call.name(), arguments.join(", "))
                }
                FunctionCall::User(u) => {
                    let arguments: Vec<String> = u.arguments.iter().map(ToString::to_string).collect();
                    write!(f, "{}({})", u.name, arguments.join(", "))
                }
            },
            ExpressionKind::If(i) => write!(f, "if {}", i.condition),
            ExpressionKind::ElseIf(e) => write!(f, "elseif {}", e.condition),
            ExpressionKind::Else(_) => f.write_str("else"),
            ExpressionKind::Switch(s) => write!(f, "switch {}", s.condition),
            ExpressionKind::Case(c) => match &c.value {
                Some(value) => write!(f, "case {value}"),
                None => f.write_str("default"),
            },
            ExpressionKind::Spread => f.write_str("..."),
            ExpressionKind::SpreadAssignment(s) => write!(f, "... = {}", s.call),
        }
    }
}

impl fmt::Display for ColumnReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}
