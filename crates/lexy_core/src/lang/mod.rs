//! Lexy language vocabulary registries.
//!
//! This module is the "front door" for language-level vocabulary: reserved keywords, operators,
//! primitive types, built-in functions, and conventions.
//!
//! The design goal is to avoid stringly-typed checks scattered across the parser and validator.
//! Instead, callers work with **stable IDs** (e.g. `KeywordId`, `OperatorId`) and look up
//! spellings/metadata via registry tables.
//!
//! ## Notes
//! - Registries are **pure**: no AST types, no IO, no side effects.
//! - The tokenizer/parser enforce syntax; registries provide spellings and metadata for shared use (diagnostics,
//!   precedence, arity checks).
//!
//! ## Examples
//! ```rust
//! use lexy_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("function"), Some(KeywordId::Function));
//! assert_eq!(keywords::as_str(KeywordId::Function), "function");
//! ```

pub mod conventions;
pub mod functions;
pub mod keywords;
pub mod operators;
pub mod types;
