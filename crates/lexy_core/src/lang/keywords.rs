//! Define the reserved keyword vocabulary for the Lexy language.
//!
//! This module is the single source of truth for reserved words: a stable identifier
//! ([`KeywordId`]) plus a const metadata table ([`KEYWORDS`]) that records canonical spellings,
//! categories, and the block a keyword may appear in.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive** (`elseif`, `validationTable`, `lookUp`...).
//! - This registry is intentionally **pure** (no AST/IO/side effects).
//! - `true`/`false` are reserved here but the tokenizer turns them into boolean literals.
//!
//! ## Examples
//! ```rust
//! use lexy_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("elseif"), Some(KeywordId::ElseIf));
//! assert_eq!(keywords::as_str(KeywordId::ValidationTable), "validationTable");
//! ```

/// Stable identifier for every reserved keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    // Root declarations
    Function,
    Enum,
    Table,
    Type,
    Scenario,
    Include,

    // Function blocks
    Parameters,
    Results,
    Code,

    // Scenario blocks
    ValidationTable,
    ExpectError,
    ExpectErrors,
    ExpectComponentErrors,
    ExpectExecutionErrors,

    // Statements
    If,
    ElseIf,
    Else,
    Switch,
    Case,
    Default,
    Var,

    // Literals
    True,
    False,
}

/// High-level grouping for documentation and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    Declaration,
    Block,
    Scenario,
    Statement,
    Literal,
}

/// Metadata for a keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub category: KeywordCategory,
    /// Short description for generated docs and "expected ..." hints.
    pub description: &'static str,
}

const fn kw(
    id: KeywordId,
    canonical: &'static str,
    category: KeywordCategory,
    description: &'static str,
) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        category,
        description,
    }
}

/// Registry of all keywords.
pub const KEYWORDS: &[KeywordInfo] = &[
    kw(KeywordId::Function, "function", KeywordCategory::Declaration, "function declaration"),
    kw(KeywordId::Enum, "enum", KeywordCategory::Declaration, "enumeration declaration"),
    kw(KeywordId::Table, "table", KeywordCategory::Declaration, "table declaration"),
    kw(KeywordId::Type, "type", KeywordCategory::Declaration, "record type declaration"),
    kw(KeywordId::Scenario, "scenario", KeywordCategory::Declaration, "test scenario declaration"),
    kw(KeywordId::Include, "include", KeywordCategory::Declaration, "include another source file"),
    kw(KeywordId::Parameters, "parameters", KeywordCategory::Block, "function parameters block"),
    kw(KeywordId::Results, "results", KeywordCategory::Block, "function results block"),
    kw(KeywordId::Code, "code", KeywordCategory::Block, "function code block"),
    kw(KeywordId::ValidationTable, "validationTable", KeywordCategory::Scenario, "scenario validation table"),
    kw(KeywordId::ExpectError, "expectError", KeywordCategory::Scenario, "single expected error"),
    kw(KeywordId::ExpectErrors, "expectErrors", KeywordCategory::Scenario, "list of expected errors"),
    kw(
        KeywordId::ExpectComponentErrors,
        "expectComponentErrors",
        KeywordCategory::Scenario,
        "errors expected on the tested component",
    ),
    kw(
        KeywordId::ExpectExecutionErrors,
        "expectExecutionErrors",
        KeywordCategory::Scenario,
        "errors expected while executing",
    ),
    kw(KeywordId::If, "if", KeywordCategory::Statement, "conditional block"),
    kw(KeywordId::ElseIf, "elseif", KeywordCategory::Statement, "chained conditional block"),
    kw(KeywordId::Else, "else", KeywordCategory::Statement, "fallback conditional block"),
    kw(KeywordId::Switch, "switch", KeywordCategory::Statement, "multi-way branch"),
    kw(KeywordId::Case, "case", KeywordCategory::Statement, "switch branch"),
    kw(KeywordId::Default, "default", KeywordCategory::Statement, "fallback switch branch"),
    kw(KeywordId::Var, "var", KeywordCategory::Statement, "variable with an inferred type"),
    kw(KeywordId::True, "true", KeywordCategory::Literal, "boolean true"),
    kw(KeywordId::False, "false", KeywordCategory::Literal, "boolean false"),
];

/// Resolve a spelling to its keyword id.
pub fn from_str(name: &str) -> Option<KeywordId> {
    KEYWORDS.iter().find(|k| k.canonical == name).map(|k| k.id)
}

/// Canonical spelling of a keyword.
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}

/// Registry metadata for a keyword.
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    KEYWORDS
        .iter()
        .find(|k| k.id == id)
        .expect("INVARIANT: every KeywordId has a registry entry")
}

/// Keywords that may start a root declaration at indentation depth 0.
pub fn root_keywords() -> impl Iterator<Item = &'static KeywordInfo> {
    KEYWORDS.iter().filter(|k| k.category == KeywordCategory::Declaration)
}
