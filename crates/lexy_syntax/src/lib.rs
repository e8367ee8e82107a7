//! Shared syntax frontend for the Lexy language: tokenizer, node model, expression factory, document parser.
//!
//! This crate is dependency-light and intended for reuse across the compiler, the CLI, and tooling that wants
//! partial trees (scenario runners, editors).
//!
//! ## Notes
//! - This crate is intentionally "syntax-only": it does not resolve names, check types, or order declarations.
//! - Vocabulary identity (keywords/operators/function names) comes from `lexy_core::lang` registries.
//!
//! ## Examples
//! ```rust,no_run
//! use lexy_syntax::parser::{DocumentParser, DocumentOptions};
//! use lexy_syntax::parser::expressions::ExpressionFactory;
//!
//! let factory = ExpressionFactory::standard();
//! let options = DocumentOptions::default();
//! let lines = vec!["enum Marital".to_string(), "  Single".to_string()];
//! let document = DocumentParser::new(&factory, &options).parse_lines(&lines, "inline.lexy");
//! assert_eq!(document.nodes.len(), 1);
//! ```

pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod line;
pub mod parser;
pub mod source;
pub mod token_helpers;
