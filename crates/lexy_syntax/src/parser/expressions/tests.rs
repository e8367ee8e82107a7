use super::*;
use crate::ast::{ExpressionKind, FunctionCall};
use crate::source::SourceFile;
use lexy_core::lang::functions::TableFunctionId;
use lexy_core::lang::operators::OperatorId;

fn parse_str(text: &str) -> Result<Expression, CompileError> {
    let line = Line::tokenize(0, text, &SourceFile::new("test.lexy")).unwrap();
    ExpressionFactory::standard().parse_line(&line, &NodeIds::new())
}

fn render(text: &str) -> String {
    parse_str(text).unwrap().to_string()
}

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    let expression = parse_str("B + C * 12").unwrap();
    let ExpressionKind::Binary(binary) = &expression.kind else {
        panic!("expected binary expression, got {expression:?}");
    };
    assert_eq!(binary.operator, OperatorId::Addition);
    let ExpressionKind::Binary(right) = &binary.right.kind else {
        panic!("expected binary right operand");
    };
    assert_eq!(right.operator, OperatorId::Multiplication);
}

#[test]
fn test_precedence_rendering() {
    assert_eq!(render("A = B + C * 12"), "A = (B + (C * 12))");
    assert_eq!(render("A - B - C"), "((A - B) - C)");
    assert_eq!(render("A || B && C == D"), "(A || (B && (C == D)))");
    assert_eq!(render("(A + B) * C"), "((A + B) * C)");
    assert_eq!(render("A < B + 1 && C"), "((A < (B + 1)) && C)");
}

#[test]
fn test_statement_forms() {
    assert!(matches!(parse_str("if A > 5").unwrap().kind, ExpressionKind::If(_)));
    assert!(matches!(parse_str("elseif A > 5").unwrap().kind, ExpressionKind::ElseIf(_)));
    assert!(matches!(parse_str("else").unwrap().kind, ExpressionKind::Else(_)));
    assert!(matches!(parse_str("switch Value").unwrap().kind, ExpressionKind::Switch(_)));
    assert!(matches!(parse_str("case 3").unwrap().kind, ExpressionKind::Case(_)));
    assert!(matches!(parse_str("default").unwrap().kind, ExpressionKind::Case(ref c) if c.value.is_none()));
}

#[test]
fn test_variable_declarations() {
    assert_eq!(render("number A"), "number A");
    assert_eq!(render("number A = 3"), "number A = 3");
    assert_eq!(render("var A = \"x\""), "var A = \"x\"");
    assert_eq!(render("Marital Status = Marital.Single"), "Marital Status = Marital.Single");
    assert_eq!(render("Calculate.Results Results = Calculate(...)"), "Calculate.Results Results = Calculate(...)");
}

#[test]
fn test_function_calls() {
    assert!(matches!(
        parse_str("new(Person)").unwrap().kind,
        ExpressionKind::FunctionCall(FunctionCall::New(_))
    ));
    assert!(matches!(
        parse_str("fill(Calculate.Parameters)").unwrap().kind,
        ExpressionKind::FunctionCall(FunctionCall::Fill(_))
    ));
    assert!(matches!(
        parse_str("extract(Results)").unwrap().kind,
        ExpressionKind::FunctionCall(FunctionCall::Extract(_))
    ));
    assert!(matches!(
        parse_str("abs(A - 5)").unwrap().kind,
        ExpressionKind::FunctionCall(FunctionCall::User(ref u)) if u.arguments.len() == 1
    ));
    assert!(matches!(
        parse_str("... = Calculate(...)").unwrap().kind,
        ExpressionKind::SpreadAssignment(_)
    ));
}

#[test]
fn test_table_functions() {
    let expression = parse_str("lookUp(Tax, Income, Tax.Income, Tax.Rate)").unwrap();
    let ExpressionKind::FunctionCall(FunctionCall::Table(call)) = &expression.kind else {
        panic!("expected table call");
    };
    assert_eq!(call.function, TableFunctionId::LookUp);
    assert_eq!(call.table, "Tax");
    assert_eq!(call.search_column.column, "Income");
    assert_eq!(call.result_column.as_ref().map(|c| c.column.as_str()), Some("Rate"));

    let row = parse_str("lookUpRowBy(Tax, Group, Income, Tax.Group, Tax.Income)").unwrap();
    let ExpressionKind::FunctionCall(FunctionCall::Table(call)) = &row.kind else {
        panic!("expected table call");
    };
    assert!(call.discriminator.is_some());
    assert!(call.result_column.is_none());
}

#[test]
fn test_table_function_wrong_arity_names_usage() {
    let error = parse_str("lookUp(Tax, Income, Tax.Income)").unwrap_err();
    assert_eq!(
        error.message,
        "Invalid 'lookUp' function arguments: expected 'lookUp(Table, value, Table.SearchColumn, Table.ResultColumn)'."
    );
    assert!(parse_str("lookUp(Tax, Income, Income, Tax.Rate)").is_err());
}

#[test]
fn test_values() {
    assert!(matches!(parse_str("Tax[1]").unwrap().kind, ExpressionKind::Bracketed(_)));
    assert!(matches!(parse_str("Person.Name").unwrap().kind, ExpressionKind::MemberAccess(_)));
    assert!(matches!(parse_str("d\"2024-01-01\"").unwrap().kind, ExpressionKind::Literal(_)));
    assert!(matches!(parse_str("Value").unwrap().kind, ExpressionKind::Identifier(_)));
}

#[test]
fn test_matched_rule_failure_is_not_retried() {
    let error = parse_str("if").unwrap_err();
    assert_eq!(error.message, "Invalid 'if' expression: condition expected.");
    let error = parse_str("A = ").unwrap_err();
    assert_eq!(error.message, "Invalid assignment: value expected after '='.");
    let error = parse_str("A +").unwrap_err();
    assert_eq!(error.message, "Invalid expression: right operand expected for '+'.");
}

#[test]
fn test_unparsable_tokens() {
    let error = parse_str("A B C").unwrap_err();
    assert_eq!(error.message, "Invalid expression: 'A B C'");
    assert_eq!(error.reference.to_string(), "test.lexy(1, 1)");
}

#[test]
fn test_expression_ids_are_unique() {
    let expression = parse_str("A = B + C").unwrap();
    let mut ids = vec![expression.id];
    let mut stack = expression.children();
    while let Some(child) = stack.pop() {
        ids.push(child.id);
        stack.extend(child.children());
    }
    let count = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), count);
}
