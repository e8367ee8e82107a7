//! Diagnostics and the parser logger.
//!
//! Lexy keeps going after an error: every failure is recorded in the [`ParserLogger`] and parsing or validation
//! continues with the next line or declaration. Each entry is attributed to the root declaration that was being
//! processed so callers can ask for the errors of a single node.

use std::fmt;

use thiserror::Error;

use crate::source::SourceReference;

/// A compile-time error with location information.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{reference}: {message}")]
pub struct CompileError {
    pub message: String,
    pub reference: SourceReference,
    pub kind: ErrorKind,
    pub hints: Vec<String>,
}

impl CompileError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, reference: SourceReference) -> Self {
        Self {
            message: message.into(),
            reference,
            kind,
            hints: Vec::new(),
        }
    }

    pub fn lexical(message: impl Into<String>, reference: SourceReference) -> Self {
        Self::new(ErrorKind::Lexical, message, reference)
    }

    pub fn grammar(message: impl Into<String>, reference: SourceReference) -> Self {
        Self::new(ErrorKind::Grammar, message, reference)
    }

    pub fn semantic(message: impl Into<String>, reference: SourceReference) -> Self {
        Self::new(ErrorKind::Semantic, message, reference)
    }

    pub fn type_error(message: impl Into<String>, reference: SourceReference) -> Self {
        Self::new(ErrorKind::Type, message, reference)
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }
}

/// `lexy::<kind>` error codes and hints for `miette` rendering.
impl miette::Diagnostic for CompileError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!("lexy::{}", self.kind.code())))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        if self.hints.is_empty() {
            return None;
        }
        Some(Box::new(self.hints.join("\n")))
    }
}

/// Broad category of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Lexical,
    Indentation,
    Grammar,
    Semantic,
    Type,
    Dependency,
    Include,
}

impl ErrorKind {
    /// Stable short code, used in `lexy::<code>` diagnostic codes.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Lexical => "lexical",
            ErrorKind::Indentation => "indentation",
            ErrorKind::Grammar => "grammar",
            ErrorKind::Semantic => "semantic",
            ErrorKind::Type => "type",
            ErrorKind::Dependency => "dependency",
            ErrorKind::Include => "include",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Lexical => write!(f, "lexical error"),
            ErrorKind::Indentation => write!(f, "indentation error"),
            ErrorKind::Grammar => write!(f, "grammar error"),
            ErrorKind::Semantic => write!(f, "semantic error"),
            ErrorKind::Type => write!(f, "type error"),
            ErrorKind::Dependency => write!(f, "dependency error"),
            ErrorKind::Include => write!(f, "include error"),
        }
    }
}

/// Severity of a logged entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Error,
}

/// One logger entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub reference: Option<SourceReference>,
    pub message: String,
    /// Root declaration that was current when the entry was logged.
    pub node: Option<String>,
    pub kind: Option<ErrorKind>,
    pub hints: Vec<String>,
}

impl LogEntry {
    pub fn is_error(&self) -> bool {
        self.level == LogLevel::Error
    }

    /// `file(line, column): message`, or just the message when the entry has no location.
    pub fn located_message(&self) -> String {
        match &self.reference {
            Some(reference) => format!("{reference}: {}", self.message),
            None => self.message.clone(),
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            LogLevel::Info => "INFO",
            LogLevel::Error => "ERROR",
        };
        write!(f, "{level} - {}", self.located_message())
    }
}

/// Accumulates log entries and errors for a whole parse.
///
/// ## Notes
/// - Entries are mirrored to `tracing` (`debug` for info, `warn` for errors) so `RUST_LOG` shows them live.
/// - The "current node" is plain state. Callers that change it are responsible for restoring the previous value;
///   the validation context does this with a drop guard.
#[derive(Debug, Clone, Default)]
pub struct ParserLogger {
    entries: Vec<LogEntry>,
    current_node: Option<String>,
}

impl ParserLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute subsequent entries to `node`; returns the previous attribution.
    pub fn set_current_node(&mut self, node: Option<String>) -> Option<String> {
        std::mem::replace(&mut self.current_node, node)
    }

    pub fn current_node(&self) -> Option<&str> {
        self.current_node.as_deref()
    }

    pub fn log(&mut self, reference: Option<&SourceReference>, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(node = self.current_node.as_deref(), "{message}");
        self.entries.push(LogEntry {
            level: LogLevel::Info,
            reference: reference.cloned(),
            message,
            node: self.current_node.clone(),
            kind: None,
            hints: Vec::new(),
        });
    }

    /// Record a failure at `reference`.
    pub fn fail(&mut self, reference: &SourceReference, message: impl Into<String>) {
        self.push_error(Some(reference.clone()), message.into(), None, Vec::new());
    }

    /// Record a failure that has no meaningful source location (e.g. a missing entry file).
    pub fn fail_unlocated(&mut self, message: impl Into<String>) {
        self.push_error(None, message.into(), None, Vec::new());
    }

    /// Record a structured compile error.
    pub fn report(&mut self, error: CompileError) {
        let CompileError {
            message,
            reference,
            kind,
            hints,
        } = error;
        self.push_error(Some(reference), message, Some(kind), hints);
    }

    fn push_error(
        &mut self,
        reference: Option<SourceReference>,
        message: String,
        kind: Option<ErrorKind>,
        hints: Vec<String>,
    ) {
        match &reference {
            Some(reference) => {
                tracing::warn!(node = self.current_node.as_deref(), %reference, "{message}")
            }
            None => tracing::warn!(node = self.current_node.as_deref(), "{message}"),
        }
        self.entries.push(LogEntry {
            level: LogLevel::Error,
            reference,
            message,
            node: self.current_node.clone(),
            kind,
            hints,
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn errors(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(|e| e.is_error())
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    /// All error messages, rendered as `file(line, column): message`.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors().map(LogEntry::located_message).collect()
    }

    /// Error messages attributed to the root declaration `node`.
    pub fn error_node_messages(&self, node: &str) -> Vec<String> {
        self.errors()
            .filter(|e| e.node.as_deref() == Some(node))
            .map(LogEntry::located_message)
            .collect()
    }

    pub fn node_has_errors(&self, node: &str) -> bool {
        self.errors().any(|e| e.node.as_deref() == Some(node))
    }

    /// Errors that are not attributed to any root declaration (includes, stray indentation).
    pub fn error_root_messages(&self) -> Vec<String> {
        self.errors()
            .filter(|e| e.node.is_none())
            .map(LogEntry::located_message)
            .collect()
    }

    /// Full log, one entry per line.
    pub fn format_entries(&self) -> String {
        self.entries
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// ============================================================================
// Error catalog
// ============================================================================

/// Common diagnostics, kept in one place so their wording stays consistent.
pub mod errors {
    use super::*;

    pub fn invalid_token(found: &str, expected: &str, reference: SourceReference) -> CompileError {
        CompileError::grammar(format!("Invalid token '{found}'. {expected}"), reference)
    }

    pub fn invalid_token_count(construct: &str, usage: &str, reference: SourceReference) -> CompileError {
        CompileError::grammar(format!("Invalid {construct}: expected '{usage}'."), reference)
    }

    pub fn invalid_expression(text: &str, reference: SourceReference) -> CompileError {
        CompileError::grammar(format!("Invalid expression: '{text}'"), reference)
    }

    pub fn duplicated_block(block: &str, reference: SourceReference) -> CompileError {
        CompileError::grammar(format!("Duplicated '{block}' block."), reference)
    }

    pub fn invalid_indentation(reason: &str, reference: SourceReference) -> CompileError {
        CompileError::new(ErrorKind::Indentation, format!("Invalid indentation: {reason}"), reference)
    }

    pub fn duplicated_node_name(name: &str, reference: SourceReference) -> CompileError {
        CompileError::semantic(format!("Duplicated node name: '{name}'"), reference)
    }

    pub fn duplicated_name(kind: &str, name: &str, reference: SourceReference) -> CompileError {
        CompileError::semantic(format!("Duplicated {kind} name: '{name}'"), reference)
    }

    pub fn invalid_name(name: &str, reference: SourceReference) -> CompileError {
        CompileError::semantic(
            format!("Invalid identifier: '{name}'"),
            reference,
        )
        .with_hint("Identifiers start with a letter and contain only letters, digits and '_'.")
    }

    pub fn unknown_variable(name: &str, reference: SourceReference) -> CompileError {
        CompileError::semantic(format!("Unknown variable name: '{name}'."), reference)
    }

    pub fn unknown_type(name: &str, reference: SourceReference) -> CompileError {
        CompileError::semantic(format!("Unknown type: '{name}'"), reference)
    }

    pub fn unknown_function(name: &str, reference: SourceReference) -> CompileError {
        CompileError::semantic(format!("Unknown function name: '{name}'"), reference)
    }

    pub fn unknown_table(name: &str, reference: SourceReference) -> CompileError {
        CompileError::semantic(format!("Unknown table name: '{name}'"), reference)
    }

    pub fn variable_redeclared(name: &str, reference: SourceReference) -> CompileError {
        CompileError::semantic(format!("Duplicated variable name: '{name}'"), reference)
    }

    pub fn type_mismatch(context: &str, expected: &str, actual: &str, reference: SourceReference) -> CompileError {
        CompileError::type_error(
            format!("{context}: type mismatch. Expected '{expected}' but got '{actual}'."),
            reference,
        )
    }

    pub fn invalid_operator_types(
        operator: &str,
        left: &str,
        right: &str,
        reference: SourceReference,
    ) -> CompileError {
        CompileError::type_error(
            format!("Invalid operator '{operator}' for types '{left}' and '{right}'."),
            reference,
        )
    }

    pub fn circular_reference(names: &[String], reference: SourceReference) -> CompileError {
        let list = names
            .iter()
            .map(|n| format!("'{n}'"))
            .collect::<Vec<_>>()
            .join(", ");
        CompileError::new(
            ErrorKind::Dependency,
            format!("Circular reference detected in: {list}"),
            reference,
        )
    }

    pub fn invalid_include(name: &str, reference: SourceReference) -> CompileError {
        CompileError::new(ErrorKind::Include, format!("Invalid include file name '{name}'"), reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceFile;

    fn reference(line: usize) -> SourceReference {
        SourceReference::new(SourceFile::new("test.lexy"), line, 1)
    }

    #[test]
    fn test_errors_are_attributed_to_current_node() {
        let mut logger = ParserLogger::new();
        logger.fail(&reference(1), "outside");
        let previous = logger.set_current_node(Some("Tax".to_string()));
        logger.fail(&reference(2), "inside");
        logger.log(Some(&reference(3)), "informational");
        logger.set_current_node(previous);

        assert!(logger.has_errors());
        assert_eq!(logger.error_count(), 2);
        assert_eq!(logger.error_node_messages("Tax"), vec!["test.lexy(2, 1): inside".to_string()]);
        assert_eq!(logger.error_root_messages(), vec!["test.lexy(1, 1): outside".to_string()]);
        assert!(logger.node_has_errors("Tax"));
        assert!(!logger.node_has_errors("Other"));
        assert_eq!(logger.current_node(), None);
    }

    #[test]
    fn test_entry_rendering() {
        let mut logger = ParserLogger::new();
        logger.report(errors::duplicated_node_name("Tax", reference(4)));
        logger.log(None, "done");
        insta::assert_snapshot!(logger.format_entries(), @r"
        ERROR - test.lexy(4, 1): Duplicated node name: 'Tax'
        INFO - done
        ");
    }

    #[test]
    fn test_circular_reference_message() {
        let error = errors::circular_reference(&["A".to_string(), "B".to_string()], reference(1));
        assert_eq!(error.message, "Circular reference detected in: 'A', 'B'");
        assert_eq!(error.kind, ErrorKind::Dependency);
    }

    #[test]
    fn test_diagnostic_code_and_help() {
        use miette::Diagnostic;

        let error = errors::invalid_name("1abc", reference(2));
        assert_eq!(error.code().map(|c| c.to_string()).as_deref(), Some("lexy::semantic"));
        assert!(error.help().is_some());
        assert!(errors::unknown_type("X", reference(2)).help().is_none());
    }
}
