//! Provide the canonical language vocabulary for the Lexy compiler front end.
//!
//! This crate is intentionally small and dependency-free. It contains the registries that both the syntax crate
//! (tokenizer, expression factory) and the compiler crate (validation, dependency ordering) consult, so spellings
//! and arities live in exactly one place.
//!
//! ## Notes
//!
//! - This is a "vocabulary" crate: **no IO**, no global mutable state, and no AST types.
//! - Current scope: keywords, operators (with precedence tiers), primitive type names, system/table/library
//!   function signatures, and well-known member names.

pub mod lang;
