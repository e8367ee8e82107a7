//! Integration tests for the Lexy compiler front end

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use lexy::frontend::parser::{MemoryFileSystem, OsFileSystem};
use lexy::{LexyParser, ParseError, ParserOptions, ScenarioOutcome};

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Helper to run the full pipeline on a source file
fn compile_file(path: &Path) -> Result<(), Vec<String>> {
    LexyParser::default()
        .parse_file(path, &OsFileSystem)
        .map(|_| ())
        .map_err(|error| match error {
            ParseError::Failed { messages, .. } | ParseError::Include { messages, .. } => messages,
            other => vec![other.to_string()],
        })
}

fn lexy_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().is_some_and(|e| e == "lexy"))
        .collect();
    files.sort();
    files
}

/// Test that all valid fixtures compile successfully
#[test]
fn test_valid_fixtures() {
    let files = lexy_files(&fixtures().join("valid"));
    assert!(!files.is_empty());
    for path in files {
        let result = compile_file(&path);
        assert!(
            result.is_ok(),
            "Expected {} to compile successfully, got errors: {:?}",
            path.display(),
            result.unwrap_err()
        );
    }
}

/// Test that invalid fixtures produce errors
#[test]
fn test_invalid_fixtures() {
    let files = lexy_files(&fixtures().join("invalid"));
    assert!(!files.is_empty());
    for path in files {
        assert!(
            compile_file(&path).is_err(),
            "Expected {} to fail compilation, but it succeeded",
            path.display()
        );
    }
}

#[test]
fn test_enum_table_function_order() {
    let result = LexyParser::default()
        .parse_file(&fixtures().join("valid/enum_table_function.lexy"), &OsFileSystem)
        .unwrap();
    let names: Vec<&str> = result.sorted_nodes().unwrap().iter().map(|n| n.name()).collect();
    assert_eq!(names, vec!["EnumExample", "TableExample", "FunctionWithEnumDependency"]);

    let graph = &result.graph;
    assert_eq!(graph.nodes().len(), 3);
    assert!(!graph.has_circular_references());
    let dependencies = |name: &str| -> BTreeSet<String> {
        graph
            .node(name)
            .unwrap()
            .dependencies
            .iter()
            .map(|&index| graph.nodes()[index].name.clone())
            .collect()
    };
    let set = |names: &[&str]| names.iter().map(|n| n.to_string()).collect::<BTreeSet<_>>();
    assert_eq!(dependencies("EnumExample"), set(&[]));
    assert_eq!(dependencies("TableExample"), set(&["EnumExample"]));
    assert_eq!(
        dependencies("FunctionWithEnumDependency"),
        set(&["EnumExample", "TableExample"])
    );
}

#[test]
fn test_declarations_are_ordered_after_their_dependencies() {
    let result = LexyParser::default()
        .parse_file(&fixtures().join("valid/tax_calculation.lexy"), &OsFileSystem)
        .unwrap();
    let sorted = result.sorted_nodes().unwrap();
    let position = |name: &str| sorted.iter().position(|n| n.name() == name).unwrap();

    assert!(position("Band") < position("TaxRates"));
    assert!(position("TaxRates") < position("CalculateTax"));
    assert!(position("CalculateTax") < position("Summary"));
    assert!(position("CalculateTax") < position("HighIncome"));
    assert_eq!(sorted.len(), result.nodes.len());

    let names: Vec<&str> = result
        .node_and_dependencies("CalculateTax")
        .unwrap()
        .iter()
        .map(|n| n.name())
        .collect();
    assert_eq!(names, vec!["Band", "TaxRates", "CalculateTax"]);
}

#[test]
fn test_directory_include_from_disk() {
    let result = LexyParser::default()
        .parse_file(&fixtures().join("includes/main.lexy"), &OsFileSystem)
        .unwrap();
    let names: Vec<&str> = result.sorted_nodes().unwrap().iter().map(|n| n.name()).collect();
    assert_eq!(names, vec!["Level", "Amounts", "Main"]);
}

#[test]
fn test_missing_include_is_an_include_error() {
    let fs = MemoryFileSystem::new().with_file("main.lexy", "include \"missing\"\nenum E\n  A");
    let error = LexyParser::default().parse_file(Path::new("main.lexy"), &fs).unwrap_err();
    let ParseError::Include { messages, .. } = error else {
        panic!("expected include error, got {error:?}");
    };
    assert_eq!(messages, vec!["main.lexy(1, 1): Invalid include file name 'missing'"]);
}

#[test]
fn test_unreadable_file_is_an_io_error() {
    let error = LexyParser::default()
        .parse_file(Path::new("missing.lexy"), &MemoryFileSystem::new())
        .unwrap_err();
    assert!(matches!(error, ParseError::Io { .. }));
}

#[test]
fn test_indentation_error_is_reported_with_location() {
    let parser = LexyParser::new(ParserOptions::new().with_suppress_exceptions(true));
    let result = parser
        .parse_file(&fixtures().join("invalid/bad_indentation.lexy"), &OsFileSystem)
        .unwrap();
    let messages = result.logger.error_messages();
    assert!(
        messages.iter().any(|m| m.contains("(2, 1): Invalid indentation")),
        "{messages:?}"
    );
}

#[test]
fn test_duplicated_declaration() {
    let parser = LexyParser::new(ParserOptions::new().with_suppress_exceptions(true));
    let result = parser
        .parse_file(&fixtures().join("invalid/duplicated_declaration.lexy"), &OsFileSystem)
        .unwrap();
    assert!(result.has_errors());
    assert!(result.logger.node_has_errors("ValidateTableKeyword"));
}

#[test]
fn test_scenario_outcomes() {
    let source = [
        "function Calculate",
        "  parameters",
        "    number Income",
        "  results",
        "    number Tax",
        "  code",
        "    Tax = Income / 10",
        "scenario Runs",
        "  function Calculate",
        "  parameters",
        "    Income = 100",
        "scenario ExpectsFailure",
        "  function Missing",
        "  expectError \"Unknown function name\"",
        "scenario UnexpectedFailure",
        "  function Calculate",
        "  parameters",
        "    Unknown = 1",
    ];
    let parser = LexyParser::new(ParserOptions::new().with_suppress_exceptions(true));
    let result = parser.parse(&source, "scenarios.lexy").unwrap();
    let outcomes = result.scenario_outcomes();

    assert_eq!(outcomes["Runs"], ScenarioOutcome::Run);
    assert_eq!(outcomes["ExpectsFailure"], ScenarioOutcome::Matched);
    assert!(outcomes["ExpectsFailure"].is_success());
    assert!(!outcomes["ExpectsFailure"].should_execute());
    assert!(!outcomes["UnexpectedFailure"].is_success());
}

#[test]
fn test_validation_info_is_exposed() {
    let result = LexyParser::default()
        .parse_file(&fixtures().join("valid/types_and_inline_scenarios.lexy"), &OsFileSystem)
        .unwrap();
    assert!(!result.info.expression_types.is_empty());
    assert!(!result.info.definitions.is_empty());
}
