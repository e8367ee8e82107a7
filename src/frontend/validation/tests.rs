use lexy_syntax::ast::{ExpressionKind, RootNodeList};
use lexy_syntax::diagnostics::ParserLogger;
use lexy_syntax::parser::expressions::ExpressionFactory;
use lexy_syntax::parser::{DocumentOptions, DocumentParser};

use super::*;
use crate::frontend::context::ValidationInfo;

const ENUM_TABLE_FUNCTION: &str = r#"
enum EnumExample
  Single
  Married
  CivilPartnership

table TableExample
  | EnumExample Value | number Result |
  | EnumExample.Single | 123 |
  | EnumExample.Married | 456 |

function FunctionWithEnumDependency
  parameters
    EnumExample EnumValue = EnumExample.Single
  results
    number Result
  code
    Result = lookUp(TableExample, EnumValue, TableExample.Value, TableExample.Result)
"#;

const CALCULATE: &str = r#"
function Calculate
  parameters
    number Income
  results
    number Tax
  code
    Tax = Income / 10
"#;

fn check(source: &str) -> (RootNodeList, ParserLogger, ValidationInfo) {
    let factory = ExpressionFactory::standard();
    let options = DocumentOptions::default();
    let lines: Vec<&str> = source.lines().collect();
    let mut document = DocumentParser::new(&factory, &options).parse_lines(&lines, "test.lexy");
    assert!(!document.has_errors(), "{}", document.logger.format_entries());

    let order: Vec<usize> = (0..document.nodes.len()).collect();
    let info = validate(&document.nodes, &order, &OperatorTypeRules::standard(), &mut document.logger);
    (document.nodes, document.logger, info)
}

fn messages(source: &str) -> Vec<String> {
    let (_, logger, _) = check(source);
    logger.errors().map(|e| e.message.clone()).collect()
}

#[test]
fn test_enum_table_function_is_valid() {
    let (nodes, logger, info) = check(ENUM_TABLE_FUNCTION);
    assert!(!logger.has_errors(), "{}", logger.format_entries());

    let code = nodes.function("FunctionWithEnumDependency").unwrap().code_expressions();
    let ExpressionKind::Assignment(assignment) = &code[0].kind else {
        panic!("expected assignment, got {}", code[0]);
    };
    assert_eq!(info.expression_type(assignment.value.id), Some(&VariableType::NUMBER));
    assert!(info.variable(assignment.target.id).is_some());
}

#[test]
fn test_assignment_type_mismatch() {
    assert_eq!(
        messages("function A\n  results\n    number Result\n  code\n    Result = \"text\""),
        vec!["Variable 'Result' of type 'number' is not assignable from type 'string'."]
    );
}

#[test]
fn test_mismatched_declaration_is_not_registered() {
    assert_eq!(
        messages("function A\n  code\n    number X = \"text\"\n    X = 1"),
        vec![
            "Invalid expression type 'string'. Expected 'number'.",
            "Unknown variable name: 'X'.",
        ]
    );
}

#[test]
fn test_unknown_variable() {
    assert_eq!(
        messages("function A\n  code\n    number X = Y"),
        vec!["Unknown variable name: 'Y'."]
    );
}

#[test]
fn test_operator_types() {
    assert_eq!(
        messages("function A\n  code\n    number X = 1 + true"),
        vec!["Invalid operator '+' for types 'number' and 'boolean'."]
    );
    assert!(messages("function A\n  code\n    string X = \"a\" + 1").is_empty());
}

#[test]
fn test_if_condition_must_be_boolean() {
    assert_eq!(
        messages("function A\n  code\n    number X = 1\n    if X\n      X = 2"),
        vec!["Invalid 'if' condition type 'number'. Expected 'boolean'."]
    );
}

#[test]
fn test_switch_cases() {
    let source = r#"function A
  code
    number X = 1
    switch X
      case "one"
        X = 2
      default
        X = 3
      default
        X = 4"#;
    assert_eq!(
        messages(source),
        vec![
            "Invalid expression type 'string'. Expected 'number'.",
            "Duplicated 'default' case.",
        ]
    );
}

#[test]
fn test_sibling_scopes_reuse_names() {
    let source = r#"function A
  code
    boolean Flag = true
    if Flag
      number X = 1
    else
      number X = 2"#;
    assert!(messages(source).is_empty());
}

#[test]
fn test_nested_scope_can_shadow() {
    let source = r#"function A
  parameters
    number X
  code
    if X > 1
      string X = "inner"
      string Y = X + "!"
    number Z = X * 2"#;
    assert!(messages(source).is_empty());
}

#[test]
fn test_function_scope_names_are_unique() {
    let source = r#"function A
  parameters
    number X
  results
    number X
  code
    string X = "code""#;
    assert_eq!(
        messages(source),
        vec!["Duplicated variable name: 'X'", "Duplicated variable name: 'X'"]
    );
}

#[test]
fn test_table_value_type() {
    assert_eq!(
        messages("table T\n  | number A | string B |\n  | 1 | 2 |"),
        vec!["Invalid expression type 'number'. Expected 'string'."]
    );
}

#[test]
fn test_lookup_value_must_match_search_column() {
    let source = r#"table Tax
  | number Income | number Rate |
  | 1000 | 0.1 |
function A
  parameters
    string Income
  results
    number Rate
  code
    Rate = lookUp(Tax, Income, Tax.Income, Tax.Rate)"#;
    assert_eq!(messages(source), vec!["Invalid expression type 'string'. Expected 'number'."]);
}

#[test]
fn test_spread_call_checks_same_named_variables() {
    let source = format!(
        "{CALCULATE}\nfunction Caller\n  parameters\n    string Income\n  results\n    number Tax\n  code\n    ... = Calculate(...)"
    );
    assert_eq!(
        messages(&source),
        vec!["Variable 'Income' of type 'number' is not assignable from type 'string'."]
    );
}

#[test]
fn test_call_results_as_declared_type() {
    let source = format!(
        "{CALCULATE}\nfunction Caller\n  results\n    number Tax\n  code\n    Calculate.Results R = Calculate()\n    Tax = R.Tax"
    );
    assert!(messages(&source).is_empty());
}

#[test]
fn test_library_function_arity() {
    assert_eq!(
        messages("function A\n  code\n    number X = power(2)"),
        vec!["Invalid number of arguments for 'power': 2 expected, 1 found."]
    );
    assert_eq!(
        messages("function A\n  code\n    number X = unknownFunction(2)"),
        vec!["Unknown function name: 'unknownFunction'"]
    );
}

#[test]
fn test_arguments_are_checked_when_the_count_is_wrong() {
    let source = format!("{CALCULATE}\nfunction Caller\n  code\n    Calculate(Missing, Other)");
    assert_eq!(
        messages(&source),
        vec![
            "Unknown variable name: 'Missing'.",
            "Unknown variable name: 'Other'.",
            "Invalid number of arguments for 'Calculate': 0 or 1 expected, 2 found.",
        ]
    );
    assert_eq!(
        messages("function A\n  code\n    number X = abs(1, Missing)"),
        vec![
            "Unknown variable name: 'Missing'.",
            "Invalid number of arguments for 'abs': 1 expected, 2 found.",
        ]
    );
}

#[test]
fn test_fill_checks_same_named_variables() {
    let source = r#"type Person
  string Name
  number Age
function A
  results
    Person Result
  code
    string Name = "x"
    boolean Age = true
    Result = fill(Person)
    Result = new(Person)"#;
    assert_eq!(
        messages(source),
        vec!["Variable 'Age' of type 'number' is not assignable from type 'boolean'."]
    );
}

#[test]
fn test_scenario_parameters_and_validation_table() {
    let source = format!(
        r#"{CALCULATE}
scenario Basic
  function Calculate
  parameters
    Income = "high"
  validationTable
    | Income | Missing |
    | 10 | 1 |"#
    );
    assert_eq!(
        messages(&source),
        vec![
            "Variable 'Income' of type 'number' is not assignable from type 'string'.",
            "Unknown parameter or result: 'Missing'.",
        ]
    );
}

#[test]
fn test_var_parameters_with_expression_defaults() {
    let source = r#"enum Marital
  Single
  Married
function Calc
  parameters
    var Status = Marital.Single
    var Amount = 1 + 2
  results
    number R
  code
    R = Amount
function Caller
  results
    number R
  code
    Calc.Parameters P = new(Calc.Parameters)
    P.Status = Marital.Married
    R = P.Amount
scenario S
  function Calc
  parameters
    Status = Marital.Married
    Amount = 5"#;
    assert!(messages(source).is_empty(), "{:?}", messages(source));
}

#[test]
fn test_scenario_var_parameter_keeps_its_type() {
    let source = r#"enum Marital
  Single
  Married
function Calc
  parameters
    var Status = Marital.Single
scenario S
  function Calc
  parameters
    Status = 3"#;
    assert_eq!(
        messages(source),
        vec!["Variable 'Status' of type 'Marital' is not assignable from type 'number'."]
    );
}

#[test]
fn test_scenario_unknown_function() {
    assert_eq!(
        messages("scenario S\n  function Missing\n  parameters\n    Income = 10"),
        vec!["Unknown function name: 'Missing'"]
    );
}

#[test]
fn test_errors_are_attributed_to_the_node() {
    let (_, logger, _) = check("function A\n  code\n    number X = 1\nfunction B\n  code\n    number X = Y");
    assert!(!logger.node_has_errors("A"));
    assert_eq!(logger.error_node_messages("B").len(), 1);
}
