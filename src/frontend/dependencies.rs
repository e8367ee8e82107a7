//! Dependency graph between root declarations.
//!
//! A declaration depends on every other root declaration it names: in type annotations, table headers, calls,
//! table function arguments, `new`/`fill` type arguments, the first segment of identifiers and member accesses,
//! and a scenario's function reference. References are collected syntactically, before validation, so the graph
//! can decide the order declarations are validated and generated in.
//!
//! ## Notes
//!
//! - Expansion is a depth-first walk with an explicit stack and an explicit lineage (the declarations on the
//!   current path). An edge back into the lineage is a circular reference: it is recorded, not followed.
//! - Each declaration is expanded once, keyed by name and kind, so shared dependencies are not re-walked.
//! - When two declarations share a name, references resolve to the first one in document order.

use indexmap::{IndexMap, IndexSet};
use lexy_syntax::ast::{
    Expression, ExpressionKind, FunctionCall, NodeKind, NodeRef, RootNode, RootNodeList, ScenarioFunction,
    TypeAnnotation, walk,
};
use lexy_syntax::diagnostics::{ParserLogger, errors};

/// One root declaration and the declarations it depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyNode {
    /// Position in the document's root node list.
    pub index: usize,
    pub name: String,
    pub kind: NodeKind,
    /// Direct dependencies (indices), in the order they were discovered. Edges that close a cycle are left out.
    pub dependencies: Vec<usize>,
}

/// The dependencies between the root declarations of one document.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: Vec<DependencyNode>,
    sorted: Vec<usize>,
    circular_references: Vec<String>,
    cycles: Vec<Vec<String>>,
}

/// Names referenced by a declaration, in discovery order, whether or not a declaration with that name exists.
pub fn referenced_names(node: &RootNode) -> Vec<String> {
    let mut names = IndexSet::new();
    walk(node.as_node(), &mut |child| match child {
        NodeRef::Variable(variable) => annotation_name(&variable.type_annotation, &mut names),
        NodeRef::Column(column) => annotation_name(&column.type_annotation, &mut names),
        NodeRef::FunctionName(ScenarioFunction::Reference { name, .. }) => {
            names.insert(name.clone());
        }
        NodeRef::Expression(expression) => expression_names(expression, &mut names),
        _ => {}
    });
    names.into_iter().collect()
}

fn annotation_name(annotation: &TypeAnnotation, names: &mut IndexSet<String>) {
    if let TypeAnnotation::Named(path) = annotation {
        names.insert(path.root().to_string());
    }
}

/// Names referenced by `expression` itself; the walk visits its children separately.
fn expression_names(expression: &Expression, names: &mut IndexSet<String>) {
    match &expression.kind {
        ExpressionKind::Identifier(name) => {
            names.insert(name.clone());
        }
        ExpressionKind::MemberAccess(path) => {
            names.insert(path.root().to_string());
        }
        ExpressionKind::VariableDeclaration(declaration) => annotation_name(&declaration.type_annotation, names),
        ExpressionKind::Bracketed(bracketed) => {
            names.insert(bracketed.target.clone());
        }
        ExpressionKind::FunctionCall(call) => match call {
            FunctionCall::New(argument) | FunctionCall::Fill(argument) => {
                names.insert(argument.path.root().to_string());
            }
            FunctionCall::Table(table) => {
                names.insert(table.table.clone());
            }
            FunctionCall::User(user) => {
                names.insert(user.name.clone());
            }
            FunctionCall::Extract(_) => {}
        },
        _ => {}
    }
}

impl DependencyGraph {
    /// Build the graph for `nodes` and order it dependencies-first.
    #[tracing::instrument(skip_all, fields(node_count = nodes.len()))]
    pub fn build(nodes: &RootNodeList) -> Self {
        let mut first_by_name: IndexMap<&str, usize> = IndexMap::new();
        for (index, node) in nodes.iter().enumerate() {
            first_by_name.entry(node.name()).or_insert(index);
        }
        let direct: Vec<Vec<usize>> = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| {
                referenced_names(node)
                    .iter()
                    .filter_map(|name| first_by_name.get(name.as_str()).copied())
                    // Direct recursion is not an edge: it needs no ordering and is not a cycle.
                    .filter(|&dependency| dependency != index)
                    .collect()
            })
            .collect();

        let mut graph = Self {
            nodes: nodes
                .iter()
                .enumerate()
                .map(|(index, node)| DependencyNode {
                    index,
                    name: node.name().to_string(),
                    kind: node.kind(),
                    dependencies: Vec::new(),
                })
                .collect(),
            ..Self::default()
        };

        let mut expanded: IndexSet<(String, NodeKind)> = IndexSet::new();
        for root in 0..graph.nodes.len() {
            graph.expand(root, &direct, &mut expanded);
        }
        graph.sorted = graph.flatten((0..graph.nodes.len()).collect());
        tracing::debug!(
            sorted = graph.sorted.len(),
            circular = graph.circular_references.len(),
            "dependency graph built"
        );
        graph
    }

    fn expand(&mut self, root: usize, direct: &[Vec<usize>], expanded: &mut IndexSet<(String, NodeKind)>) {
        let key = |node: &DependencyNode| (node.name.clone(), node.kind);
        if expanded.contains(&key(&self.nodes[root])) {
            return;
        }

        // (node, position of the next direct dependency to visit)
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        let mut lineage: Vec<usize> = vec![root];
        while let Some(frame) = stack.last_mut() {
            let (node, position) = *frame;
            let Some(&dependency) = direct[node].get(position) else {
                stack.pop();
                lineage.pop();
                expanded.insert(key(&self.nodes[node]));
                continue;
            };
            frame.1 += 1;

            if let Some(start) = lineage.iter().position(|&n| n == dependency) {
                let cycle: Vec<String> = lineage[start..].iter().map(|&n| self.nodes[n].name.clone()).collect();
                self.record_cycle(cycle);
                continue;
            }
            if !self.nodes[node].dependencies.contains(&dependency) {
                self.nodes[node].dependencies.push(dependency);
            }
            if !expanded.contains(&key(&self.nodes[dependency])) {
                stack.push((dependency, 0));
                lineage.push(dependency);
            }
        }
    }

    fn record_cycle(&mut self, cycle: Vec<String>) {
        tracing::debug!(?cycle, "circular reference");
        for name in &cycle {
            if !self.circular_references.contains(name) {
                self.circular_references.push(name.clone());
            }
        }
        self.cycles.push(cycle);
    }

    /// Post-order over the retained edges: every node after all of its dependencies, each node once.
    fn flatten(&self, roots: Vec<usize>) -> Vec<usize> {
        let mut emitted = vec![false; self.nodes.len()];
        let mut sorted = Vec::with_capacity(self.nodes.len());
        for root in roots {
            if emitted[root] {
                continue;
            }
            let mut on_stack = vec![false; self.nodes.len()];
            let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
            on_stack[root] = true;
            while let Some(frame) = stack.last_mut() {
                let (node, position) = *frame;
                match self.nodes[node].dependencies.get(position) {
                    Some(&dependency) => {
                        frame.1 += 1;
                        if !emitted[dependency] && !on_stack[dependency] {
                            on_stack[dependency] = true;
                            stack.push((dependency, 0));
                        }
                    }
                    None => {
                        stack.pop();
                        emitted[node] = true;
                        sorted.push(node);
                    }
                }
            }
        }
        sorted
    }

    pub fn nodes(&self) -> &[DependencyNode] {
        &self.nodes
    }

    /// First node with `name`.
    pub fn node(&self, name: &str) -> Option<&DependencyNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Names on a circular reference, each once, in the order they were found.
    pub fn circular_references(&self) -> &[String] {
        &self.circular_references
    }

    /// Every cycle found, as the chain of names that closes it.
    pub fn cycles(&self) -> &[Vec<String>] {
        &self.cycles
    }

    pub fn has_circular_references(&self) -> bool {
        !self.circular_references.is_empty()
    }

    /// Node indices ordered so that every declaration comes after the declarations it depends on.
    ///
    /// ## Errors
    /// Returns the names on circular references when there are any; no order is meaningful then.
    pub fn sorted_nodes(&self) -> Result<&[usize], &[String]> {
        if self.has_circular_references() {
            return Err(&self.circular_references);
        }
        Ok(&self.sorted)
    }

    /// Order to validate in: dependencies first, or document order when there are cycles.
    pub fn validation_order(&self) -> Vec<usize> {
        match self.sorted_nodes() {
            Ok(sorted) => sorted.to_vec(),
            Err(_) => (0..self.nodes.len()).collect(),
        }
    }

    /// `name` and everything it depends on, transitively, dependencies first.
    pub fn node_and_dependencies(&self, name: &str) -> Option<Vec<usize>> {
        let node = self.node(name)?;
        Some(self.flatten(vec![node.index]))
    }

    /// Log a circular reference error against every declaration on a cycle.
    pub fn report_circular_references(&self, nodes: &RootNodeList, logger: &mut ParserLogger) {
        for name in &self.circular_references {
            let Some(node) = nodes.get(name) else {
                continue;
            };
            let previous = logger.set_current_node(Some(name.clone()));
            logger.report(errors::circular_reference(&self.circular_references, node.reference().clone()));
            logger.set_current_node(previous);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexy_syntax::parser::expressions::ExpressionFactory;
    use lexy_syntax::parser::{DocumentOptions, DocumentParser};

    fn graph(source: &str) -> (RootNodeList, DependencyGraph) {
        let factory = ExpressionFactory::standard();
        let options = DocumentOptions::default();
        let lines: Vec<&str> = source.lines().collect();
        let document = DocumentParser::new(&factory, &options).parse_lines(&lines, "graph.lexy");
        assert!(!document.has_errors(), "{}", document.logger.format_entries());
        let graph = DependencyGraph::build(&document.nodes);
        (document.nodes, graph)
    }

    fn names(nodes: &RootNodeList, indices: &[usize]) -> Vec<String> {
        indices.iter().map(|&i| nodes.nodes[i].name().to_string()).collect()
    }

    #[test]
    fn test_dependencies_come_first() {
        let (nodes, graph) = graph(
            r#"function Outer
  results
    Inner.Results R
  code
    R = Inner()
function Inner
  parameters
    Marital Status
  results
    number Value
enum Marital
  Single"#,
        );
        assert_eq!(names(&nodes, graph.sorted_nodes().unwrap()), vec!["Marital", "Inner", "Outer"]);
        assert_eq!(
            names(&nodes, &graph.node_and_dependencies("Inner").unwrap()),
            vec!["Marital", "Inner"]
        );
        assert_eq!(graph.node("Outer").unwrap().dependencies, vec![1]);
    }

    #[test]
    fn test_unknown_names_are_not_dependencies() {
        let (_, graph) = graph("function A\n  code\n    number X = 1\n    X = abs(X)");
        assert!(graph.nodes()[0].dependencies.is_empty());
    }

    #[test]
    fn test_cycle_is_reported_once_per_name() {
        let (nodes, graph) = graph(
            "function A\n  code\n    B()\nfunction B\n  code\n    C()\nfunction C\n  code\n    A()\nfunction D\n  code\n    A()",
        );
        assert_eq!(graph.circular_references(), ["A", "B", "C"]);
        assert_eq!(graph.cycles().len(), 1);
        assert!(graph.sorted_nodes().is_err());
        assert_eq!(names(&nodes, &graph.validation_order()), vec!["A", "B", "C", "D"]);

        let mut logger = ParserLogger::new();
        graph.report_circular_references(&nodes, &mut logger);
        assert_eq!(
            logger.error_node_messages("B"),
            vec!["graph.lexy(4, 1): Circular reference detected in: 'A', 'B', 'C'"]
        );
        assert!(!logger.node_has_errors("D"));
    }
}
