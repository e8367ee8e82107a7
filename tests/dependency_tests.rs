//! Dependency ordering and circular reference reporting through the public pipeline.

use lexy::{LexyParser, ParseError, ParserOptions};

fn parse(source: &str) -> lexy::ParserResult {
    let lines: Vec<&str> = source.lines().collect();
    LexyParser::new(ParserOptions::new().with_suppress_exceptions(true))
        .parse(&lines, "deps.lexy")
        .unwrap()
}

fn order(result: &lexy::ParserResult) -> String {
    result
        .sorted_nodes()
        .unwrap()
        .iter()
        .map(|node| format!("{} {}", node.keyword(), node.name()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_every_node_follows_its_dependencies() {
    let result = parse(
        r#"scenario Check
  function Outer
  results
    Total = 2
function Outer
  results
    number Total
  code
    Inner.Results R = Inner(...)
    Total = R.Value + lookUp(Rates, R.Value, Rates.Key, Rates.Rate)
table Rates
  | number Key | number Rate |
  | 1 | 2 |
function Inner
  results
    number Value
  code
    Point P = new(Point)
    Value = P.X
type Point
  number X
  number Y"#,
    );
    assert!(!result.has_errors(), "{}", result.logger.format_entries());
    insta::assert_snapshot!(order(&result), @r"
    type Point
    function Inner
    table Rates
    function Outer
    scenario Check
    ");

    for (index, node) in result.graph.nodes().iter().enumerate() {
        let sorted = result.graph.sorted_nodes().unwrap();
        let position = sorted.iter().position(|&i| i == index).unwrap();
        for dependency in &node.dependencies {
            let dependency_position = sorted.iter().position(|i| i == dependency).unwrap();
            assert!(dependency_position < position, "{} before its dependency", node.name);
        }
    }
}

#[test]
fn test_cycle_members_are_reported_once_each() {
    let result = parse(
        "function A\n  code\n    B()\nfunction B\n  code\n    C()\n    A()\nfunction C\n  code\n    A()\n    B()",
    );
    assert_eq!(result.graph.circular_references(), ["A", "B", "C"]);
    assert!(result.sorted_nodes().is_err());

    for name in ["A", "B", "C"] {
        let circular: Vec<String> = result
            .logger
            .errors()
            .filter(|e| e.node.as_deref() == Some(name) && e.message.starts_with("Circular reference"))
            .map(|e| e.message.clone())
            .collect();
        assert_eq!(circular, vec!["Circular reference detected in: 'A', 'B', 'C'"]);
    }
}

#[test]
fn test_self_reference_is_not_a_dependency() {
    let result = parse("function Countdown\n  parameters\n    number N\n  code\n    Countdown(...)");
    assert!(!result.graph.has_circular_references());
    assert!(result.graph.nodes()[0].dependencies.is_empty());
}

#[test]
fn test_cycle_blocks_ordering_by_default() {
    let error = LexyParser::default()
        .parse(&["type A", "  B Inner", "type B", "  A Outer"], "types.lexy")
        .unwrap_err();
    insta::assert_snapshot!(error.to_string(), @"circular reference detected in 'types.lexy': A, B");
    assert!(matches!(error, ParseError::Circular { .. }));
}
