//! Compile-time error expectations of scenarios.
//!
//! A scenario can state that compiling the document must fail: `expectError` names a fragment of an error
//! logged against the scenario itself, `expectErrors` fragments of any error in the document, and
//! `expectComponentErrors` fragments of errors logged against other declarations. Fragments match by
//! substring. `expectExecutionErrors` is about running the scenario and is left to the runner.
//!
//! A scenario whose expectations are all met has succeeded, but there is nothing left to run: the outcome is
//! [`ScenarioOutcome::Matched`], which reports success and tells the runner not to execute it.

use lexy_syntax::ast::{ExpectationKind, ExpectedErrors, Scenario};
use lexy_syntax::diagnostics::{LogEntry, ParserLogger};

/// What validation decided about one scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioOutcome {
    /// Compiled cleanly and expects no compile errors: execute it.
    Run,
    /// Every expected compile error was logged: succeeded, do not execute.
    Matched,
    /// Expectations were not met, or the scenario failed to compile without expecting it.
    Unmatched { messages: Vec<String> },
}

impl ScenarioOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, ScenarioOutcome::Unmatched { .. })
    }

    pub fn should_execute(&self) -> bool {
        matches!(self, ScenarioOutcome::Run)
    }
}

/// Evaluates the expectations of one scenario against the logged diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioExpectations<'a> {
    scenario: &'a Scenario,
}

impl<'a> ScenarioExpectations<'a> {
    pub fn new(scenario: &'a Scenario) -> Self {
        Self { scenario }
    }

    /// Expectations checked at compile time; execution expectations are skipped.
    pub fn compile_expectations(&self) -> impl Iterator<Item = &'a ExpectedErrors> {
        self.scenario
            .expectations()
            .filter(|expected| expected.kind != ExpectationKind::ExecutionErrors)
    }

    pub fn expects_compile_errors(&self) -> bool {
        self.compile_expectations().next().is_some()
    }

    pub fn evaluate(&self, logger: &ParserLogger) -> ScenarioOutcome {
        let name = self.scenario.name.as_str();
        if !self.expects_compile_errors() {
            let own = logger.error_node_messages(name);
            return if own.is_empty() {
                ScenarioOutcome::Run
            } else {
                ScenarioOutcome::Unmatched { messages: own }
            };
        }

        let mut missing = Vec::new();
        for expected in self.compile_expectations() {
            let logged: Vec<&LogEntry> = logger
                .errors()
                .filter(|entry| applies_to(expected.kind, entry, name))
                .collect();
            for fragment in &expected.messages {
                if !logged.iter().any(|entry| entry.message.contains(fragment.as_str())) {
                    missing.push(format!(
                        "{}: expected error containing '{fragment}' was not logged.",
                        expected.reference
                    ));
                }
            }
        }
        tracing::debug!(scenario = name, missing = missing.len(), "scenario expectations evaluated");

        if missing.is_empty() {
            ScenarioOutcome::Matched
        } else {
            ScenarioOutcome::Unmatched { messages: missing }
        }
    }
}

fn applies_to(kind: ExpectationKind, entry: &LogEntry, scenario: &str) -> bool {
    let node = entry.node.as_deref();
    match kind {
        ExpectationKind::Error => node == Some(scenario),
        ExpectationKind::Errors => true,
        ExpectationKind::ComponentErrors => node.is_some_and(|node| node != scenario),
        ExpectationKind::ExecutionErrors => false,
    }
}
