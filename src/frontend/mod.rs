//! Lexy compiler front end
//!
//! This module contains all front end components:
//! - `lexer`, `parser`, `ast`, `diagnostics`, `source`: provided by the shared `lexy_syntax` crate
//! - `types`: the type family, member lookup and assignability
//! - `context`: variable scopes, provenance and validation side tables
//! - `validation`: name resolution and type checking of a parsed document
//! - `dependencies`: the dependency graph between root declarations
//! - `expectations`: compile-time error expectations of scenarios
//! - `pipeline`: the end-to-end [`LexyParser`](pipeline::LexyParser)

// Syntax components are provided by the shared lexy_syntax crate.
pub use lexy_syntax::{ast, diagnostics, lexer, parser, source};

// Compiler-specific pieces remain local.
pub mod context;
pub mod dependencies;
pub mod expectations;
pub mod pipeline;
pub mod types;
pub mod validation;
