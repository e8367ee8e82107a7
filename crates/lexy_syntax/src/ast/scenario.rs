//! Scenario declarations: a test case for a function, enum or table.

use super::declarations::{EnumDefinition, Function, Table, TableRow};
use super::expr::Expression;
use crate::source::SourceReference;

/// Function under test: a reference to a root function or an inline definition.
#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioFunction {
    Reference { name: String, reference: SourceReference },
    Inline(Function),
}

impl ScenarioFunction {
    pub fn reference(&self) -> &SourceReference {
        match self {
            ScenarioFunction::Reference { reference, .. } => reference,
            ScenarioFunction::Inline(function) => &function.reference,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub name: String,
    pub reference: SourceReference,
    pub function: Option<ScenarioFunction>,
    pub enum_definition: Option<EnumDefinition>,
    pub table: Option<Table>,
    pub parameters: Option<AssignmentBlock>,
    pub results: Option<AssignmentBlock>,
    pub validation_table: Option<ValidationTable>,
    pub expect_error: Option<ExpectedErrors>,
    pub expect_errors: Option<ExpectedErrors>,
    pub expect_component_errors: Option<ExpectedErrors>,
    pub expect_execution_errors: Option<ExpectedErrors>,
}

impl Scenario {
    pub fn new(name: impl Into<String>, reference: SourceReference) -> Self {
        Self {
            name: name.into(),
            reference,
            function: None,
            enum_definition: None,
            table: None,
            parameters: None,
            results: None,
            validation_table: None,
            expect_error: None,
            expect_errors: None,
            expect_component_errors: None,
            expect_execution_errors: None,
        }
    }

    /// Name of the referenced root function, if the scenario points at one.
    pub fn function_name(&self) -> Option<&str> {
        match &self.function {
            Some(ScenarioFunction::Reference { name, .. }) => Some(name),
            _ => None,
        }
    }

    pub fn inline_function(&self) -> Option<&Function> {
        match &self.function {
            Some(ScenarioFunction::Inline(function)) => Some(function),
            _ => None,
        }
    }

    /// All expectation blocks that are present.
    pub fn expectations(&self) -> impl Iterator<Item = &ExpectedErrors> {
        [
            &self.expect_error,
            &self.expect_errors,
            &self.expect_component_errors,
            &self.expect_execution_errors,
        ]
        .into_iter()
        .flatten()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignmentBlockKind {
    Parameters,
    Results,
}

/// Scenario `parameters` / `results`: one `Name = value` assignment per line.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentBlock {
    pub kind: AssignmentBlockKind,
    pub reference: SourceReference,
    pub assignments: Vec<Expression>,
}

impl AssignmentBlock {
    pub fn new(kind: AssignmentBlockKind, reference: SourceReference) -> Self {
        Self {
            kind,
            reference,
            assignments: Vec::new(),
        }
    }
}

/// Data-driven scenario: a header of parameter/result names and one row per case.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationTable {
    pub reference: SourceReference,
    pub header: Option<Vec<ValidationColumn>>,
    pub rows: Vec<TableRow>,
}

impl ValidationTable {
    pub fn new(reference: SourceReference) -> Self {
        Self {
            reference,
            header: None,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[ValidationColumn] {
        self.header.as_deref().unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationColumn {
    pub name: String,
    pub reference: SourceReference,
}

/// Which stage an expectation block is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpectationKind {
    /// `expectError "message"`: the scenario's own component fails with this message.
    Error,
    /// `expectErrors`: parse errors, one quoted message per line.
    Errors,
    /// `expectComponentErrors`: errors of other declarations, one quoted message per line.
    ComponentErrors,
    /// `expectExecutionErrors`: runtime errors, recorded for the runner.
    ExecutionErrors,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpectedErrors {
    pub kind: ExpectationKind,
    pub reference: SourceReference,
    pub messages: Vec<String>,
}

impl ExpectedErrors {
    pub fn new(kind: ExpectationKind, reference: SourceReference) -> Self {
        Self {
            kind,
            reference,
            messages: Vec::new(),
        }
    }
}
