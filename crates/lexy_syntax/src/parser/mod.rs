//! Document parser: turns indented source lines into a [`RootNodeList`].
//!
//! Each line is tokenized, its indentation depth computed, and the line handed to the node that currently receives
//! lines at that depth (see [`ParsableNodeIndex`]). The node's answer ([`NextNode`]) decides who receives the
//! lines one level deeper. Errors are logged per line and parsing continues with the next line.
//!
//! ## Notes
//! - Includes are collected while parsing and resolved afterwards, relative to the including file, until no
//!   unprocessed include remains. A normalized path is parsed at most once, so include cycles terminate.
//! - Comment lines are routed to [`RootNodeList::comments`] whatever their indentation.

pub mod expressions;
pub mod files;

mod code;
mod declarations;
mod includes;
mod index;
mod parsable;
mod scenario;


use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use lexy_core::lang::conventions::{DEFAULT_FILE_EXTENSION, DEFAULT_INDENT_WIDTH};

use crate::ast::{Comment, NodeIds, RootNodeList};
use crate::diagnostics::{CompileError, ParserLogger, errors};
use crate::lexer::{Token, TokenKind};
use crate::line::Line;
use crate::source::SourceFile;

use expressions::ExpressionFactory;
pub use files::{FileSystem, MemoryFileSystem, OsFileSystem};
pub use index::{NodePath, ParsableNodeIndex};
pub use parsable::{NextNode, ParsableNode, ParseLineContext, node_at};

/// Options for the document parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOptions {
    /// Spaces per indentation level. A tab always counts as one level.
    pub indent_width: usize,
    /// Extension of included files, without the dot.
    pub file_extension: String,
    pub resolve_includes: bool,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            indent_width: DEFAULT_INDENT_WIDTH,
            file_extension: DEFAULT_FILE_EXTENSION.to_string(),
            resolve_includes: true,
        }
    }
}

/// Parse result: the tree and everything that was logged while building it.
#[derive(Debug)]
pub struct ParsedDocument {
    pub nodes: RootNodeList,
    pub logger: ParserLogger,
    /// Next free expression id, so later stages can keep numbering without collisions.
    pub ids: NodeIds,
}

impl ParsedDocument {
    pub fn has_errors(&self) -> bool {
        self.logger.has_errors()
    }
}

/// Line-driven parser for one document and its includes.
pub struct DocumentParser<'a> {
    factory: &'a ExpressionFactory,
    options: &'a DocumentOptions,
    ids: NodeIds,
    logger: ParserLogger,
    nodes: RootNodeList,
}

impl<'a> DocumentParser<'a> {
    pub fn new(factory: &'a ExpressionFactory, options: &'a DocumentOptions) -> Self {
        Self {
            factory,
            options,
            ids: NodeIds::new(),
            logger: ParserLogger::new(),
            nodes: RootNodeList::new(),
        }
    }

    /// Parse in-memory lines. Include directives are recorded but not resolved.
    #[tracing::instrument(skip_all, fields(file = file_name, line_count = lines.len()))]
    pub fn parse_lines<S: AsRef<str>>(mut self, lines: &[S], file_name: &str) -> ParsedDocument {
        self.parse_source(lines, file_name);
        self.finish()
    }

    /// Parse in-memory lines and resolve includes through `fs`.
    #[tracing::instrument(skip_all, fields(file = file_name, line_count = lines.len()))]
    pub fn parse_with_includes<S: AsRef<str>>(
        mut self,
        lines: &[S],
        file_name: &str,
        fs: &dyn FileSystem,
    ) -> ParsedDocument {
        let mut included = BTreeSet::from([fs.normalize(Path::new(file_name))]);
        self.parse_source(lines, file_name);
        if self.options.resolve_includes {
            self.resolve_includes(fs, &mut included);
        }
        self.finish()
    }

    /// Read `path` through `fs` and parse it with its includes.
    pub fn parse_file(mut self, path: &Path, fs: &dyn FileSystem) -> ParsedDocument {
        match fs.read_all_lines(path) {
            Ok(lines) => self.parse_with_includes(&lines, &path.to_string_lossy(), fs),
            Err(error) => {
                self.logger.fail_unlocated(format!("Could not read file '{}': {error}", path.display()));
                self.finish()
            }
        }
    }

    fn finish(self) -> ParsedDocument {
        tracing::debug!(
            node_count = self.nodes.len(),
            error_count = self.logger.error_count(),
            "document parsed"
        );
        ParsedDocument {
            nodes: self.nodes,
            logger: self.logger,
            ids: self.ids,
        }
    }

    fn parse_source<S: AsRef<str>>(&mut self, lines: &[S], file_name: &str) {
        let file = SourceFile::new(file_name);
        let mut index = ParsableNodeIndex::new();

        for (number, text) in lines.iter().enumerate() {
            let text = text.as_ref();
            if text.trim().is_empty() {
                continue;
            }
            let line = match Line::tokenize(number, text, &file) {
                Ok(line) => line,
                Err(error) => {
                    let owner = self.root_name(index.root_slot(index.max_depth()));
                    self.report_for(owner, error);
                    continue;
                }
            };
            if line.is_comment() {
                if let Some(Token {
                    kind: TokenKind::Comment(text),
                    column,
                }) = &line.comment
                {
                    self.nodes.comments.push(Comment {
                        text: text.clone(),
                        reference: line.reference(*column),
                    });
                }
                continue;
            }

            let depth = match line.indent(self.options.indent_width) {
                Ok(depth) => depth,
                Err(error) => {
                    let owner = self.root_name(index.root_slot(index.max_depth()));
                    self.report_for(owner, error);
                    continue;
                }
            };
            if depth > index.max_depth() {
                let owner = self.root_name(index.root_slot(index.max_depth()));
                let error = errors::invalid_indentation(
                    &format!("expected at most {} levels, found {depth}.", index.max_depth()),
                    line.start_reference(),
                );
                self.report_for(owner, error);
                continue;
            }
            let Some(mut path) = index.enter(depth) else {
                // Body of a block whose header failed: skip it and everything below it.
                index.set(depth + 1, None);
                continue;
            };

            let owner = self.root_name(path.first().copied());
            let previous = self.logger.set_current_node(owner);
            let next = match node_at(&mut self.nodes, &path) {
                Some(node) => {
                    let mut context = ParseLineContext {
                        line: &line,
                        logger: &mut self.logger,
                        factory: self.factory,
                        ids: &self.ids,
                    };
                    node.parse(&mut context)
                }
                None => {
                    tracing::error!(?path, "no node at index path");
                    NextNode::Ignore
                }
            };
            self.logger.set_current_node(previous);

            match next {
                NextNode::Current => index.set(depth + 1, Some(path)),
                NextNode::Child(relative) => {
                    path.extend(relative);
                    index.set(depth + 1, Some(path));
                }
                NextNode::Leaf => {}
                NextNode::Ignore => index.set(depth + 1, None),
            }
        }
    }

    fn root_name(&self, slot: Option<usize>) -> Option<String> {
        slot.and_then(|slot| self.nodes.nodes.get(slot))
            .map(|node| node.name().to_string())
    }

    fn report_for(&mut self, owner: Option<String>, error: CompileError) {
        let previous = self.logger.set_current_node(owner);
        self.logger.report(error);
        self.logger.set_current_node(previous);
    }

    fn resolve_includes(&mut self, fs: &dyn FileSystem, included: &mut BTreeSet<PathBuf>) {
        loop {
            let pending: Vec<usize> = (0..self.nodes.includes.len())
                .filter(|&i| !self.nodes.includes[i].processed)
                .collect();
            if pending.is_empty() {
                break;
            }
            for i in pending {
                self.nodes.includes[i].processed = true;
                let directive = self.nodes.includes[i].clone();
                let files = match includes::resolve(&directive, fs, &self.options.file_extension) {
                    Ok(files) => files,
                    Err(error) => {
                        self.logger.report(error);
                        continue;
                    }
                };
                for file in files {
                    if !included.insert(fs.normalize(&file)) {
                        tracing::trace!(file = %file.display(), "already included");
                        continue;
                    }
                    match fs.read_all_lines(&file) {
                        Ok(lines) => {
                            tracing::debug!(file = %file.display(), "including");
                            self.parse_source(&lines, &file.to_string_lossy());
                        }
                        Err(_) => self
                            .logger
                            .report(errors::invalid_include(&directive.file_name, directive.reference.clone())),
                    }
                }
            }
        }
    }
}
