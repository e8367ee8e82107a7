//! The line-receiver protocol shared by every block node.
//!
//! A [`ParsableNode`] receives one line at a time and answers which node should receive the lines indented one
//! level deeper: itself ([`NextNode::Current`]), a child it just created or selected ([`NextNode::Child`]), or
//! nobody. [`NextNode::Leaf`] makes a deeper line an indentation error; [`NextNode::Ignore`] swallows deeper
//! lines silently and is used after a failed line so its body does not cascade into more errors.
//!
//! Children are addressed by slot paths from the document root instead of references, so the index never holds a
//! borrow into the tree while the tree is being extended.

use lexy_core::lang::keywords::KeywordId;

use super::index::NodePath;
use crate::ast::{
    EnumDefinition, Expression, Function, IncludeDirective, NodeIds, RootNode, RootNodeList, Scenario, Table,
    TypeDefinition,
};
use crate::diagnostics::{CompileError, ParserLogger, errors};
use crate::lexer::Token;
use crate::line::Line;
use crate::parser::expressions::{ExpressionFactory, ExpressionSource};
use crate::source::SourceReference;

/// Receiver for lines one level deeper than the line just parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextNode {
    Current,
    /// Slot path relative to the node that parsed the line.
    Child(NodePath),
    Leaf,
    Ignore,
}

impl NextNode {
    pub fn child(slot: usize) -> Self {
        NextNode::Child(vec![slot])
    }

    /// Prefix a child path with `slot`, for nodes that forward lines to a sub-node.
    pub fn within(self, slot: usize) -> Self {
        match self {
            NextNode::Current => NextNode::child(slot),
            NextNode::Child(mut path) => {
                path.insert(0, slot);
                NextNode::Child(path)
            }
            other => other,
        }
    }
}

/// Everything a node needs to parse one line.
pub struct ParseLineContext<'a> {
    pub line: &'a Line,
    pub logger: &'a mut ParserLogger,
    pub factory: &'a ExpressionFactory,
    pub ids: &'a NodeIds,
}

impl<'a> ParseLineContext<'a> {
    pub fn tokens(&self) -> &'a [Token] {
        &self.line.tokens
    }

    pub fn reference(&self) -> SourceReference {
        self.line.start_reference()
    }

    pub fn token_reference(&self, token: &Token) -> SourceReference {
        self.line.token_reference(token)
    }

    pub fn report(&mut self, error: CompileError) {
        self.logger.report(error);
    }

    pub fn fail_at(&mut self, token: &Token, message: impl Into<String>) {
        let reference = self.token_reference(token);
        self.logger.report(CompileError::grammar(message, reference));
    }

    pub fn parse_expression(&self, tokens: &[Token]) -> Result<Expression, CompileError> {
        self.factory.parse(tokens, &ExpressionSource::new(self.line, self.ids))
    }

    /// Parse the whole line as one expression.
    pub fn parse_line_expression(&self) -> Result<Expression, CompileError> {
        self.parse_expression(&self.line.tokens)
    }

    /// `keyword Name` header line: returns the name or logs the expected form.
    pub fn declaration_name(&mut self, keyword: &str) -> Option<String> {
        let tokens = self.tokens();
        match tokens {
            [_, name] if name.name().is_some() => name.name().map(str::to_string),
            _ => {
                self.report(errors::invalid_token_count(
                    &format!("{keyword} declaration"),
                    &format!("{keyword} Name"),
                    self.reference(),
                ));
                None
            }
        }
    }

    /// A block keyword that must stand alone on its line.
    pub fn expect_single_token(&mut self, keyword: &str) -> bool {
        match self.tokens().get(1) {
            Some(extra) => {
                self.fail_at(extra, format!("Invalid token '{extra}'. No tokens expected after '{keyword}'."));
                false
            }
            None => true,
        }
    }
}

pub trait ParsableNode {
    /// Parse one line addressed to this node.
    fn parse(&mut self, context: &mut ParseLineContext<'_>) -> NextNode;

    /// Child addressed by `slot`, as handed out through [`NextNode::Child`].
    fn child_mut(&mut self, _slot: usize) -> Option<&mut dyn ParsableNode> {
        None
    }
}

/// Follow `path` from `root`.
pub fn node_at<'n>(root: &'n mut dyn ParsableNode, path: &[usize]) -> Option<&'n mut dyn ParsableNode> {
    let mut current = root;
    for &slot in path {
        current = current.child_mut(slot)?;
    }
    Some(current)
}

impl ParsableNode for RootNodeList {
    fn parse(&mut self, context: &mut ParseLineContext<'_>) -> NextNode {
        let tokens = context.tokens();
        let Some(first) = tokens.first() else {
            return NextNode::Leaf;
        };
        let reference = context.reference();

        let node = match first.keyword_id() {
            Some(KeywordId::Include) => {
                match tokens {
                    [_, file] if file.kind.quoted().is_some() => self.includes.push(IncludeDirective {
                        file_name: file.kind.quoted().unwrap_or_default().to_string(),
                        reference,
                        processed: false,
                    }),
                    _ => context.report(errors::invalid_token_count("include", "include \"file\"", reference)),
                }
                return NextNode::Leaf;
            }
            Some(KeywordId::Function) => context
                .declaration_name("function")
                .map(|name| RootNode::Function(Function::new(name, reference))),
            Some(KeywordId::Enum) => context
                .declaration_name("enum")
                .map(|name| RootNode::Enum(EnumDefinition::new(name, reference))),
            Some(KeywordId::Table) => context
                .declaration_name("table")
                .map(|name| RootNode::Table(Table::new(name, reference))),
            Some(KeywordId::Type) => context
                .declaration_name("type")
                .map(|name| RootNode::Type(TypeDefinition::new(name, reference))),
            Some(KeywordId::Scenario) => context
                .declaration_name("scenario")
                .map(|name| RootNode::Scenario(Scenario::new(name, reference))),
            _ => {
                context.report(errors::invalid_token(&first.to_string(), "Keyword expected.", reference));
                None
            }
        };

        match node {
            Some(node) => {
                tracing::trace!(name = node.name(), kind = %node.kind(), "root node");
                if self.get(node.name()).is_some() {
                    // Kept in the list so its body still parses; validation and ordering see both.
                    let previous = context.logger.set_current_node(Some(node.name().to_string()));
                    context.report(errors::duplicated_node_name(node.name(), node.reference().clone()));
                    context.logger.set_current_node(previous);
                }
                self.nodes.push(node);
                NextNode::child(self.nodes.len() - 1)
            }
            None => NextNode::Ignore,
        }
    }

    fn child_mut(&mut self, slot: usize) -> Option<&mut dyn ParsableNode> {
        self.nodes.get_mut(slot).map(|node| node as &mut dyn ParsableNode)
    }
}

impl ParsableNode for RootNode {
    fn parse(&mut self, context: &mut ParseLineContext<'_>) -> NextNode {
        match self {
            RootNode::Function(node) => node.parse(context),
            RootNode::Enum(node) => node.parse(context),
            RootNode::Table(node) => node.parse(context),
            RootNode::Type(node) => node.parse(context),
            RootNode::Scenario(node) => node.parse(context),
        }
    }

    fn child_mut(&mut self, slot: usize) -> Option<&mut dyn ParsableNode> {
        match self {
            RootNode::Function(node) => node.child_mut(slot),
            RootNode::Enum(node) => node.child_mut(slot),
            RootNode::Table(node) => node.child_mut(slot),
            RootNode::Type(node) => node.child_mut(slot),
            RootNode::Scenario(node) => node.child_mut(slot),
        }
    }
}
