//! Variable scopes and the validation context.
//!
//! The validation walk keeps three pieces of mutable state besides the logger: the chain of variable scopes, the
//! root declaration errors are attributed to, and the side tables that record what it resolved. Scope and
//! attribution changes are made through [`ContextGuard`]s, which restore the previous state when dropped, so an
//! early return in the middle of a block can never leak a scope or a node name.

use std::ops::{Deref, DerefMut};

use indexmap::IndexMap;
use lexy_syntax::ast::{NodeId, VariablePath};
use lexy_syntax::diagnostics::{CompileError, ParserLogger, errors};
use lexy_syntax::source::SourceReference;

use super::types::{TypeSystem, VariableType};
use super::validation::OperatorTypeRules;

/// Where a variable was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableSource {
    /// A declaration in a code block.
    Code,
    Parameters,
    Results,
    /// A member of a type declaration.
    Type,
    Unknown,
}

/// A variable registered in a scope.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableEntry {
    pub name: String,
    pub variable_type: VariableType,
    pub source: VariableSource,
    pub reference: SourceReference,
}

/// A resolved variable path: the type at the end of the path and where its root variable came from.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableReference {
    pub path: VariablePath,
    pub source: VariableSource,
    pub variable_type: VariableType,
}

/// Chain of variable scopes, innermost last.
#[derive(Debug)]
pub struct VariableContext {
    scopes: Vec<IndexMap<String, VariableEntry>>,
}

impl VariableContext {
    pub fn new() -> Self {
        Self {
            scopes: vec![IndexMap::new()],
        }
    }

    /// Number of scopes, including the outermost one.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    fn push_scope(&mut self) {
        self.scopes.push(IndexMap::new());
    }

    fn pop_scope(&mut self) {
        // The outermost scope is never popped.
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Innermost variable named `name` in any scope of the chain.
    pub fn get(&self, name: &str) -> Option<&VariableEntry> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Add `entry` to the innermost scope unless that scope already has a variable with the same name. Outer
    /// variables are shadowed.
    ///
    /// ## Errors
    /// Returns the entry that is already registered under that name.
    pub fn register(&mut self, entry: VariableEntry) -> Result<(), &VariableEntry> {
        let Some(scope) = self.scopes.last_mut() else {
            return Ok(());
        };
        if scope.contains_key(&entry.name) {
            return Err(&scope[&entry.name]);
        }
        scope.insert(entry.name.clone(), entry);
        Ok(())
    }

    /// Variables visible in the current scope chain, outermost first.
    pub fn visible(&self) -> impl Iterator<Item = &VariableEntry> {
        self.scopes.iter().flat_map(|scope| scope.values())
    }
}

impl Default for VariableContext {
    fn default() -> Self {
        Self::new()
    }
}

/// What validation resolved, keyed by node id, for stages that run after it.
#[derive(Debug, Default, Clone)]
pub struct ValidationInfo {
    /// Expression id -> derived type.
    pub expression_types: IndexMap<NodeId, VariableType>,
    /// Identifier or member access id -> resolved variable.
    pub variables: IndexMap<NodeId, VariableReference>,
    /// Variable definition or declaration id -> declared type.
    pub definitions: IndexMap<NodeId, VariableType>,
}

impl ValidationInfo {
    pub fn expression_type(&self, id: NodeId) -> Option<&VariableType> {
        self.expression_types.get(&id)
    }

    pub fn variable(&self, id: NodeId) -> Option<&VariableReference> {
        self.variables.get(&id)
    }

    pub fn definition_type(&self, id: NodeId) -> Option<&VariableType> {
        self.definitions.get(&id)
    }
}

/// State of one validation run over a document.
pub struct ValidationContext<'a> {
    types: TypeSystem<'a>,
    rules: &'a OperatorTypeRules,
    logger: &'a mut ParserLogger,
    variables: VariableContext,
    info: ValidationInfo,
}

impl<'a> ValidationContext<'a> {
    pub fn new(types: TypeSystem<'a>, rules: &'a OperatorTypeRules, logger: &'a mut ParserLogger) -> Self {
        Self {
            types,
            rules,
            logger,
            variables: VariableContext::new(),
            info: ValidationInfo::default(),
        }
    }

    pub fn types(&self) -> TypeSystem<'a> {
        self.types
    }

    pub fn rules(&self) -> &'a OperatorTypeRules {
        self.rules
    }

    pub fn variables(&self) -> &VariableContext {
        &self.variables
    }

    pub fn info(&self) -> &ValidationInfo {
        &self.info
    }

    pub fn into_info(self) -> ValidationInfo {
        self.info
    }

    /// Log `message` at `reference` against the current declaration.
    pub fn fail(&mut self, reference: &SourceReference, message: impl Into<String>) {
        self.logger.fail(reference, message);
    }

    pub fn report(&mut self, error: CompileError) {
        self.logger.report(error);
    }

    /// Open a nested variable scope that is closed when the guard is dropped.
    pub fn scope(&mut self) -> ContextGuard<'_, 'a> {
        self.variables.push_scope();
        ContextGuard {
            context: self,
            restore: Restore::Scope,
        }
    }

    /// Attribute errors to the root declaration `name` until the guard is dropped.
    pub fn in_node(&mut self, name: &str) -> ContextGuard<'_, 'a> {
        let previous = self.logger.set_current_node(Some(name.to_string()));
        ContextGuard {
            context: self,
            restore: Restore::Node(previous),
        }
    }

    /// Register a variable in the innermost scope, reporting a duplicate instead when that scope already has
    /// the name. Returns whether the variable was registered.
    pub fn register_variable_and_verify_unique(
        &mut self,
        name: &str,
        variable_type: VariableType,
        source: VariableSource,
        reference: &SourceReference,
    ) -> bool {
        let entry = VariableEntry {
            name: name.to_string(),
            variable_type,
            source,
            reference: reference.clone(),
        };
        if self.variables.register(entry).is_err() {
            self.report(errors::variable_redeclared(name, reference.clone()));
            return false;
        }
        true
    }

    /// Resolve `path` starting from a variable in scope: the root segment names the variable, every further
    /// segment a member of the type reached so far.
    pub fn variable_type_by_path(&self, path: &VariablePath) -> Option<VariableReference> {
        let entry = self.variables.get(path.root())?;
        let mut variable_type = entry.variable_type.clone();
        for member in &path.parts()[1..] {
            variable_type = self.types.member_type(&variable_type, member)?;
        }
        Some(VariableReference {
            path: path.clone(),
            source: entry.source,
            variable_type,
        })
    }

    pub fn record_type(&mut self, id: NodeId, variable_type: VariableType) {
        self.info.expression_types.insert(id, variable_type);
    }

    pub fn record_variable(&mut self, id: NodeId, variable: VariableReference) {
        self.info.variables.insert(id, variable);
    }

    pub fn record_definition(&mut self, id: NodeId, variable_type: VariableType) {
        self.info.definitions.insert(id, variable_type);
    }
}

enum Restore {
    Scope,
    Node(Option<String>),
}

/// Borrow of the validation context that undoes one scope or attribution change when dropped.
///
/// Dereferences to the context, so validation continues through the guard and guards nest naturally.
pub struct ContextGuard<'c, 'a> {
    context: &'c mut ValidationContext<'a>,
    restore: Restore,
}

impl<'a> Deref for ContextGuard<'_, 'a> {
    type Target = ValidationContext<'a>;

    fn deref(&self) -> &Self::Target {
        &*self.context
    }
}

impl DerefMut for ContextGuard<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.context
    }
}

impl Drop for ContextGuard<'_, '_> {
    fn drop(&mut self) {
        match &mut self.restore {
            Restore::Scope => self.context.variables.pop_scope(),
            Restore::Node(previous) => {
                self.context.logger.set_current_node(previous.take());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexy_syntax::ast::RootNodeList;
    use lexy_syntax::source::SourceFile;

    fn reference() -> SourceReference {
        SourceReference::new(SourceFile::new("context.lexy"), 1, 1)
    }

    #[test]
    fn test_scopes_are_popped_on_drop() {
        let nodes = RootNodeList::new();
        let rules = OperatorTypeRules::standard();
        let mut logger = ParserLogger::new();
        let mut context = ValidationContext::new(TypeSystem::new(&nodes, &rules), &rules, &mut logger);

        assert!(context.register_variable_and_verify_unique("A", VariableType::NUMBER, VariableSource::Code, &reference()));
        {
            let mut inner = context.scope();
            assert!(inner.register_variable_and_verify_unique(
                "B",
                VariableType::STRING,
                VariableSource::Code,
                &reference()
            ));
            assert!(inner.variables().contains("A"));
            assert_eq!(inner.variables().depth(), 2);
        }
        assert_eq!(context.variables().depth(), 1);
        assert!(!context.variables().contains("B"));
    }

    #[test]
    fn test_duplicate_registration_is_reported() {
        let nodes = RootNodeList::new();
        let rules = OperatorTypeRules::standard();
        let mut logger = ParserLogger::new();
        {
            let mut context = ValidationContext::new(TypeSystem::new(&nodes, &rules), &rules, &mut logger);
            let mut node = context.in_node("Calculate");
            node.register_variable_and_verify_unique("A", VariableType::NUMBER, VariableSource::Parameters, &reference());
            assert!(!node.register_variable_and_verify_unique(
                "A",
                VariableType::STRING,
                VariableSource::Code,
                &reference()
            ));
            let mut nested = node.scope();
            assert!(nested.register_variable_and_verify_unique(
                "A",
                VariableType::STRING,
                VariableSource::Code,
                &reference()
            ));
            assert_eq!(nested.variables().get("A").map(|v| &v.variable_type), Some(&VariableType::STRING));
        }
        assert_eq!(logger.error_node_messages("Calculate"), vec!["context.lexy(1, 1): Duplicated variable name: 'A'"]);
        assert_eq!(logger.current_node(), None);
    }

    #[test]
    fn test_variable_type_by_path_keeps_provenance() {
        let nodes = RootNodeList::new();
        let rules = OperatorTypeRules::standard();
        let mut logger = ParserLogger::new();
        let mut context = ValidationContext::new(TypeSystem::new(&nodes, &rules), &rules, &mut logger);
        context.register_variable_and_verify_unique("Income", VariableType::NUMBER, VariableSource::Parameters, &reference());

        let resolved = context.variable_type_by_path(&VariablePath::from_name("Income")).unwrap();
        assert_eq!(resolved.source, VariableSource::Parameters);
        assert_eq!(resolved.variable_type, VariableType::NUMBER);
        assert!(context.variable_type_by_path(&VariablePath::from_name("Missing")).is_none());
        assert!(context
            .variable_type_by_path(&VariablePath::new(vec!["Income".into(), "Value".into()]))
            .is_none());
    }
}
