//! End-to-end front end: parse, build the dependency graph, validate.
//!
//! [`LexyParser`] owns the grammar configuration (expression factory and operator type rules) and runs the
//! stages over one document. Diagnostics accumulate in the document's [`ParserLogger`]; once every stage has
//! run, a document with errors is turned into a [`ParseError`] unless [`ParserOptions::suppress_exceptions`]
//! asks for the [`ParserResult`] regardless.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use lexy_core::lang::conventions::DEFAULT_FILE_EXTENSION;
use lexy_syntax::ast::{NodeIds, RootNode, RootNodeList};
use lexy_syntax::diagnostics::{ErrorKind, ParserLogger};
use lexy_syntax::parser::expressions::ExpressionFactory;
use lexy_syntax::parser::{DocumentOptions, DocumentParser, FileSystem, ParsedDocument};
use miette::Diagnostic;
use thiserror::Error;

use super::context::ValidationInfo;
use super::dependencies::DependencyGraph;
use super::expectations::{ScenarioExpectations, ScenarioOutcome};
use super::validation::{self, OperatorTypeRules};

/// Errors returned by [`LexyParser`] after all diagnostics have been collected.
#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    #[error("could not read '{}': {source}", path.display())]
    #[diagnostic(code(lexy::parse::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not resolve includes of '{file}':\n{}", messages.join("\n"))]
    #[diagnostic(code(lexy::parse::include))]
    Include { file: String, messages: Vec<String> },

    #[error("circular reference detected in '{file}': {}", names.join(", "))]
    #[diagnostic(code(lexy::parse::circular), help("break the cycle so declarations can be ordered"))]
    Circular { file: String, names: Vec<String> },

    #[error("parsing '{file}' failed with {} error(s):\n{}", messages.len(), messages.join("\n"))]
    #[diagnostic(code(lexy::parse::failed))]
    Failed { file: String, messages: Vec<String> },
}

/// Options for a [`LexyParser`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// Return the result even when errors were logged.
    pub suppress_exceptions: bool,
    /// Spaces per indentation level.
    pub indent_width: usize,
    /// Extension of included files, without the dot.
    pub file_extension: String,
    /// Run validation after parsing.
    pub validate: bool,
    pub resolve_includes: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        let document = DocumentOptions::default();
        Self {
            suppress_exceptions: false,
            indent_width: document.indent_width,
            file_extension: DEFAULT_FILE_EXTENSION.to_string(),
            validate: true,
            resolve_includes: true,
        }
    }
}

impl ParserOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_suppress_exceptions(mut self, suppress: bool) -> Self {
        self.suppress_exceptions = suppress;
        self
    }

    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    pub fn with_file_extension(mut self, extension: impl Into<String>) -> Self {
        self.file_extension = extension.into();
        self
    }

    pub fn with_validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    pub fn with_resolve_includes(mut self, resolve: bool) -> Self {
        self.resolve_includes = resolve;
        self
    }

    fn document_options(&self) -> DocumentOptions {
        DocumentOptions {
            indent_width: self.indent_width,
            file_extension: self.file_extension.clone(),
            resolve_includes: self.resolve_includes,
        }
    }
}

/// Everything the front end produced for one document.
#[derive(Debug)]
pub struct ParserResult {
    pub nodes: RootNodeList,
    pub logger: ParserLogger,
    pub graph: DependencyGraph,
    pub info: ValidationInfo,
    /// Next free expression id.
    pub ids: NodeIds,
}

impl ParserResult {
    pub fn has_errors(&self) -> bool {
        self.logger.has_errors()
    }

    pub fn node(&self, name: &str) -> Option<&RootNode> {
        self.nodes.get(name)
    }

    /// Root nodes with every node after the nodes it depends on.
    ///
    /// ## Errors
    /// Returns the names on circular references when there are any.
    pub fn sorted_nodes(&self) -> Result<Vec<&RootNode>, &[String]> {
        let sorted = self.graph.sorted_nodes()?;
        Ok(self.resolve(sorted))
    }

    /// `name` and the nodes it depends on, transitively, dependencies first.
    pub fn node_and_dependencies(&self, name: &str) -> Option<Vec<&RootNode>> {
        let indices = self.graph.node_and_dependencies(name)?;
        Some(self.resolve(&indices))
    }

    /// Compile-time expectation outcome of every scenario, in document order.
    pub fn scenario_outcomes(&self) -> IndexMap<String, ScenarioOutcome> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                RootNode::Scenario(scenario) => Some((
                    scenario.name.clone(),
                    ScenarioExpectations::new(scenario).evaluate(&self.logger),
                )),
                _ => None,
            })
            .collect()
    }

    fn resolve(&self, indices: &[usize]) -> Vec<&RootNode> {
        indices.iter().filter_map(|&index| self.nodes.nodes.get(index)).collect()
    }
}

/// Parses and validates Lexy documents.
#[derive(Debug)]
pub struct LexyParser {
    factory: ExpressionFactory,
    rules: OperatorTypeRules,
    options: ParserOptions,
}

impl Default for LexyParser {
    fn default() -> Self {
        Self::new(ParserOptions::default())
    }
}

impl LexyParser {
    pub fn new(options: ParserOptions) -> Self {
        Self {
            factory: ExpressionFactory::standard(),
            rules: OperatorTypeRules::standard(),
            options,
        }
    }

    pub fn with_factory(mut self, factory: ExpressionFactory) -> Self {
        self.factory = factory;
        self
    }

    pub fn with_operator_rules(mut self, rules: OperatorTypeRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parse in-memory lines. Include directives are recorded but not resolved.
    #[tracing::instrument(skip_all, fields(file = file_name, line_count = lines.len()))]
    pub fn parse<S: AsRef<str>>(&self, lines: &[S], file_name: &str) -> Result<ParserResult, ParseError> {
        let options = self.options.document_options();
        let document = DocumentParser::new(&self.factory, &options).parse_lines(lines, file_name);
        self.finish(document, file_name)
    }

    /// Parse in-memory lines, resolving includes through `fs`.
    #[tracing::instrument(skip_all, fields(file = file_name, line_count = lines.len()))]
    pub fn parse_with<S: AsRef<str>>(
        &self,
        lines: &[S],
        file_name: &str,
        fs: &dyn FileSystem,
    ) -> Result<ParserResult, ParseError> {
        let options = self.options.document_options();
        let document = DocumentParser::new(&self.factory, &options).parse_with_includes(lines, file_name, fs);
        self.finish(document, file_name)
    }

    /// Read `path` through `fs` and parse it with its includes.
    ///
    /// ## Errors
    /// A file that cannot be read is an [`ParseError::Io`], whatever the options say.
    #[tracing::instrument(skip_all, fields(path = %path.display()))]
    pub fn parse_file(&self, path: &Path, fs: &dyn FileSystem) -> Result<ParserResult, ParseError> {
        let lines = fs.read_all_lines(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse_with(&lines, &path.to_string_lossy(), fs)
    }

    fn finish(&self, document: ParsedDocument, file_name: &str) -> Result<ParserResult, ParseError> {
        let ParsedDocument {
            nodes,
            mut logger,
            ids,
        } = document;

        let graph = DependencyGraph::build(&nodes);
        graph.report_circular_references(&nodes, &mut logger);

        let info = if self.options.validate {
            validation::validate(&nodes, &graph.validation_order(), &self.rules, &mut logger)
        } else {
            ValidationInfo::default()
        };

        tracing::debug!(
            node_count = nodes.len(),
            error_count = logger.error_count(),
            circular = graph.has_circular_references(),
            "front end finished"
        );
        let result = ParserResult {
            nodes,
            logger,
            graph,
            info,
            ids,
        };
        if self.options.suppress_exceptions || !result.has_errors() {
            return Ok(result);
        }
        Err(failure(&result, file_name))
    }
}

/// The error for a result with errors: include failures first, then cycles, then everything else.
fn failure(result: &ParserResult, file_name: &str) -> ParseError {
    let file = file_name.to_string();
    let includes: Vec<String> = result
        .logger
        .errors()
        .filter(|entry| entry.kind == Some(ErrorKind::Include))
        .map(|entry| entry.located_message())
        .collect();
    if !includes.is_empty() {
        return ParseError::Include {
            file,
            messages: includes,
        };
    }
    if result.graph.has_circular_references() {
        return ParseError::Circular {
            file,
            names: result.graph.circular_references().to_vec(),
        };
    }
    ParseError::Failed {
        file,
        messages: result.logger.error_messages(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ParserOptions::default();
        assert!(!options.suppress_exceptions);
        assert!(options.validate);
        assert!(options.resolve_includes);
        assert_eq!(options.file_extension, "lexy");
        assert_eq!(options.indent_width, 2);
    }

    #[test]
    fn test_options_builder() {
        let options = ParserOptions::new()
            .with_suppress_exceptions(true)
            .with_indent_width(4)
            .with_file_extension("lx")
            .with_validate(false)
            .with_resolve_includes(false);
        let document = options.document_options();
        assert_eq!(document.indent_width, 4);
        assert_eq!(document.file_extension, "lx");
        assert!(!document.resolve_includes);
        assert!(options.suppress_exceptions);
    }

    #[test]
    fn test_errors_raise_after_accumulation() {
        let parser = LexyParser::default();
        let error = parser
            .parse(&["function A", "  code", "    number X = Y", "    number Z = W"], "a.lexy")
            .unwrap_err();
        let ParseError::Failed { messages, .. } = error else {
            panic!("expected failure, got {error:?}");
        };
        assert_eq!(messages.len(), 2);
        assert!(messages[0].starts_with("a.lexy(3, "));
        assert!(messages[0].ends_with("Unknown variable name: 'Y'."));
        assert!(messages[1].ends_with("Unknown variable name: 'W'."));
    }

    #[test]
    fn test_suppressed_errors_return_the_result() {
        let parser = LexyParser::new(ParserOptions::new().with_suppress_exceptions(true));
        let result = parser.parse(&["function A", "  code", "    number X = Y"], "a.lexy").unwrap();
        assert!(result.has_errors());
        assert!(result.logger.node_has_errors("A"));
    }

    #[test]
    fn test_validation_can_be_skipped() {
        let parser = LexyParser::new(ParserOptions::new().with_validate(false));
        let result = parser.parse(&["function A", "  code", "    number X = Y"], "a.lexy").unwrap();
        assert!(!result.has_errors());
        assert!(result.info.expression_types.is_empty());
    }

    #[test]
    fn test_cycle_is_a_circular_error() {
        let parser = LexyParser::default();
        let error = parser
            .parse(&["function A", "  code", "    B()", "function B", "  code", "    A()"], "c.lexy")
            .unwrap_err();
        assert!(matches!(error, ParseError::Circular { ref names, .. } if names == &["A", "B"]));
        assert_eq!(Diagnostic::code(&error).map(|c| c.to_string()).as_deref(), Some("lexy::parse::circular"));
    }
}
