//! Token types for the Lexy line tokenizer.
//!
//! ## Notes
//! - Every word is a `Keyword` token, reserved or not. Whether a word is reserved is decided by the node that
//!   consumes it (see `keyword_id`), since `Name`, `number` and `if` all scan the same way.
//! - Operator tokens carry stable IDs from `lexy_core::lang::operators`.
//! - Columns are 1-based character positions within the line.

use std::fmt;

use lexy_core::lang::keywords::{self, KeywordId};
use lexy_core::lang::operators::{self, OperatorId};

use super::literals::DateTimeLiteral;

/// Kind of token produced by the tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// A bare word: declaration keyword, type name, variable name, function name.
    Keyword(String),
    /// Dotted access such as `Parameters.Value` or `Marital.Single`.
    MemberAccess(Vec<String>),
    Number(f64),
    /// Double-quoted text, quotes stripped.
    QuotedLiteral(String),
    Boolean(bool),
    DateTime(DateTimeLiteral),
    Operator(OperatorId),
    /// Text after `//`, trimmed.
    Comment(String),
}

impl TokenKind {
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::Number(_) | TokenKind::QuotedLiteral(_) | TokenKind::Boolean(_) | TokenKind::DateTime(_)
        )
    }

    /// Short description used in diagnostics ("keyword", "number literal", ...).
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Keyword(_) => "keyword",
            TokenKind::MemberAccess(_) => "member access",
            TokenKind::Number(_) => "number literal",
            TokenKind::QuotedLiteral(_) => "quoted literal",
            TokenKind::Boolean(_) => "boolean literal",
            TokenKind::DateTime(_) => "date literal",
            TokenKind::Operator(_) => "operator",
            TokenKind::Comment(_) => "comment",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Keyword(word) => f.write_str(word),
            TokenKind::MemberAccess(parts) => f.write_str(&parts.join(".")),
            TokenKind::Number(value) => write!(f, "{value}"),
            TokenKind::QuotedLiteral(text) => write!(f, "\"{text}\""),
            TokenKind::Boolean(value) => write!(f, "{value}"),
            TokenKind::DateTime(date) => write!(f, "{date}"),
            TokenKind::Operator(id) => f.write_str(operators::as_str(*id)),
            TokenKind::Comment(text) => write!(f, "// {text}"),
        }
    }
}

/// A token with its kind and 1-based start column.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, column: usize) -> Self {
        Self { kind, column }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

/// Resolve a word to a reserved keyword id, if it is one.
pub fn keyword_id(word: &str) -> Option<KeywordId> {
    keywords::from_str(word)
}
