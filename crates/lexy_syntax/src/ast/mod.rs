//! Node model for Lexy documents.
//!
//! A document is a [`RootNodeList`]: the root declarations in source order plus the include directives and
//! comment lines that were routed to it. Expressions live in [`expr`]; declarations in [`declarations`] and
//! [`scenario`]. [`NodeRef`] is a borrowed, uniform view over every node type for tree walks.

pub mod declarations;
pub mod expr;
mod node;
pub mod scenario;

pub use declarations::{
    ColumnHeader, EnumDefinition, EnumMember, Function, Table, TableHeader, TableRow, TypeDefinition,
    VariableBlock, VariableBlockKind, VariableDefinition,
};
pub use expr::{
    AssignmentExpression, BinaryExpression, BracketedExpression, CaseExpression, ColumnReference, ElseExpression,
    ElseIfExpression, Expression, ExpressionKind, ExpressionList, FunctionCall, IfExpression, LiteralValue, NodeId,
    NodeIds, SpreadAssignment, SwitchExpression, TableCall, TypeAnnotation, TypeArgument, UserCall,
    VariableAccess, VariableDeclaration, VariablePath, VariableUsage,
};
pub use node::{NodeKind, NodeRef, walk};
pub use scenario::{
    AssignmentBlock, AssignmentBlockKind, ExpectationKind, ExpectedErrors, Scenario, ScenarioFunction,
    ValidationColumn, ValidationTable,
};

use lexy_core::lang::keywords::{self, KeywordId};

use crate::source::SourceReference;

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum RootNode {
    Function(Function),
    Enum(EnumDefinition),
    Table(Table),
    Type(TypeDefinition),
    Scenario(Scenario),
}

impl RootNode {
    pub fn name(&self) -> &str {
        match self {
            RootNode::Function(f) => &f.name,
            RootNode::Enum(e) => &e.name,
            RootNode::Table(t) => &t.name,
            RootNode::Type(t) => &t.name,
            RootNode::Scenario(s) => &s.name,
        }
    }

    pub fn reference(&self) -> &SourceReference {
        match self {
            RootNode::Function(f) => &f.reference,
            RootNode::Enum(e) => &e.reference,
            RootNode::Table(t) => &t.reference,
            RootNode::Type(t) => &t.reference,
            RootNode::Scenario(s) => &s.reference,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.as_node().kind()
    }

    /// Declaration keyword: `function`, `enum`, ...
    pub fn keyword(&self) -> &'static str {
        let id = match self {
            RootNode::Function(_) => KeywordId::Function,
            RootNode::Enum(_) => KeywordId::Enum,
            RootNode::Table(_) => KeywordId::Table,
            RootNode::Type(_) => KeywordId::Type,
            RootNode::Scenario(_) => KeywordId::Scenario,
        };
        keywords::as_str(id)
    }

    pub fn as_node(&self) -> NodeRef<'_> {
        match self {
            RootNode::Function(f) => NodeRef::Function(f),
            RootNode::Enum(e) => NodeRef::Enum(e),
            RootNode::Table(t) => NodeRef::Table(t),
            RootNode::Type(t) => NodeRef::Type(t),
            RootNode::Scenario(s) => NodeRef::Scenario(s),
        }
    }
}

/// `include "file"` at the root of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct IncludeDirective {
    pub file_name: String,
    pub reference: SourceReference,
    pub processed: bool,
}

/// A comment-only line.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub text: String,
    pub reference: SourceReference,
}

/// A parsed document: root declarations in source order (included files appended).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RootNodeList {
    pub nodes: Vec<RootNode>,
    pub includes: Vec<IncludeDirective>,
    pub comments: Vec<Comment>,
}

impl RootNodeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RootNode> {
        self.nodes.iter()
    }

    /// First root node with `name`.
    pub fn get(&self, name: &str) -> Option<&RootNode> {
        self.nodes.iter().find(|n| n.name() == name)
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.nodes.iter().find_map(|n| match n {
            RootNode::Function(f) if f.name == name => Some(f),
            _ => None,
        })
    }

    pub fn enum_definition(&self, name: &str) -> Option<&EnumDefinition> {
        self.nodes.iter().find_map(|n| match n {
            RootNode::Enum(e) if e.name == name => Some(e),
            _ => None,
        })
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.nodes.iter().find_map(|n| match n {
            RootNode::Table(t) if t.name == name => Some(t),
            _ => None,
        })
    }

    pub fn type_definition(&self, name: &str) -> Option<&TypeDefinition> {
        self.nodes.iter().find_map(|n| match n {
            RootNode::Type(t) if t.name == name => Some(t),
            _ => None,
        })
    }

    pub fn scenario(&self, name: &str) -> Option<&Scenario> {
        self.nodes.iter().find_map(|n| match n {
            RootNode::Scenario(s) if s.name == name => Some(s),
            _ => None,
        })
    }

    pub fn scenarios(&self) -> impl Iterator<Item = &Scenario> {
        self.nodes.iter().filter_map(|n| match n {
            RootNode::Scenario(s) => Some(s),
            _ => None,
        })
    }
}

impl<'a> IntoIterator for &'a RootNodeList {
    type Item = &'a RootNode;
    type IntoIter = std::slice::Iter<'a, RootNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
