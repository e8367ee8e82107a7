//! Guardrails for the vocabulary registries.
//!
//! These tests catch drift between registries: duplicated spellings, a keyword that shadows a function name the
//! parser dispatches on, or an operator table whose longest-match order is broken.

use std::collections::HashSet;

use lexy_core::lang::functions::{LIBRARY_FUNCTIONS, SYSTEM_FUNCTIONS, TABLE_FUNCTIONS};
use lexy_core::lang::keywords::KEYWORDS;
use lexy_core::lang::operators::{self, OPERATORS};
use lexy_core::lang::types::PRIMITIVE_TYPES;

#[test]
fn keyword_spellings_are_unique() {
    let mut seen = HashSet::new();
    for info in KEYWORDS {
        assert!(seen.insert(info.canonical), "duplicate keyword spelling: {}", info.canonical);
    }
}

#[test]
fn operator_spellings_are_unique() {
    let mut seen = HashSet::new();
    for info in OPERATORS {
        assert!(seen.insert(info.spelling), "duplicate operator spelling: {}", info.spelling);
    }
}

#[test]
fn every_operator_is_found_by_longest_prefix() {
    for info in OPERATORS {
        let found = operators::longest_prefix(info.spelling).map(|o| o.id);
        assert_eq!(found, Some(info.id), "longest prefix mismatch for '{}'", info.spelling);
    }
}

#[test]
fn function_names_do_not_collide() {
    let mut seen = HashSet::new();
    let names = SYSTEM_FUNCTIONS
        .iter()
        .map(|f| f.canonical)
        .chain(TABLE_FUNCTIONS.iter().map(|f| f.canonical))
        .chain(LIBRARY_FUNCTIONS.iter().map(|f| f.canonical));
    for name in names {
        assert!(seen.insert(name), "duplicate function name: {name}");
        assert!(
            KEYWORDS.iter().all(|k| k.canonical != name),
            "function name '{name}' is also a keyword"
        );
    }
}

#[test]
fn primitive_types_are_not_keywords() {
    for info in PRIMITIVE_TYPES {
        assert!(
            KEYWORDS.iter().all(|k| k.canonical != info.canonical),
            "type '{}' is also a keyword",
            info.canonical
        );
    }
}

#[test]
fn table_function_arity_matches_usage() {
    for info in TABLE_FUNCTIONS {
        let arguments = info.usage.matches(',').count() + 1;
        assert_eq!(arguments, info.arity, "usage of '{}' disagrees with arity", info.canonical);
    }
}
