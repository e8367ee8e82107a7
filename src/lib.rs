#![forbid(unsafe_code)]
//! Lexy Compiler Front End
//!
//! Lexy is an indented, line-oriented language for functions, enums, lookup tables, types and test scenarios.
//! This crate turns Lexy documents into a validated, type-checked and dependency-ordered node tree: the
//! frontend (types, validation, dependency graph, pipeline) and the `lexy` command line tool.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Diagnostics**: Problems in the document being compiled are never panics. They are logged to the
//!   `ParserLogger` and compilation continues.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a compiler bug (logic error), use `.expect("INVARIANT: reason")` with a
//!   clear explanation.

pub mod cli;
pub mod frontend;

pub use frontend::ast;
pub use frontend::diagnostics;
pub use frontend::lexer;
pub use frontend::parser;

pub use frontend::dependencies::DependencyGraph;
pub use frontend::expectations::{ScenarioExpectations, ScenarioOutcome};
pub use frontend::pipeline::{LexyParser, ParseError, ParserOptions, ParserResult};
pub use frontend::validation::OperatorTypeRules;
