//! Lexy type family and the type queries validation relies on.
//!
//! Types are nominal: two enum types are equal when they name the same enum, two generated types when they have
//! the same owner *and* the same source (a function's `Parameters` is never a function's `Results`). Object-like
//! types (declared types and generated types) are additionally compared structurally when checking
//! assignability: a value is accepted when it provides every member the target requires with an assignable type.
//!
//! Member lookup needs the declarations of the document, so it lives on [`TypeSystem`] rather than on
//! [`VariableType`] itself.

use std::fmt;

use lexy_core::lang::conventions::{COUNT_MEMBER, PARAMETERS_MEMBER, RESULTS_MEMBER, ROW_MEMBER};
use lexy_core::lang::functions;
use lexy_core::lang::types::{self, PrimitiveTypeId};
use lexy_syntax::ast::{
    Expression, ExpressionKind, Function, FunctionCall, RootNode, RootNodeList, TypeAnnotation, VariableDefinition,
    VariablePath,
};

use super::validation::OperatorTypeRules;

/// What a generated type is generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratedTypeSource {
    FunctionParameters,
    FunctionResults,
    TableRow,
}

impl GeneratedTypeSource {
    /// Member name that selects this type on its owner: `Parameters`, `Results` or `Row`.
    pub fn member(&self) -> &'static str {
        match self {
            GeneratedTypeSource::FunctionParameters => PARAMETERS_MEMBER,
            GeneratedTypeSource::FunctionResults => RESULTS_MEMBER,
            GeneratedTypeSource::TableRow => ROW_MEMBER,
        }
    }
}

/// Type derived from a declaration: `Calculate.Parameters`, `Calculate.Results`, `Rates.Row`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeneratedType {
    /// Name of the function or table the type belongs to.
    pub owner: String,
    pub source: GeneratedTypeSource,
}

impl GeneratedType {
    pub fn new(owner: impl Into<String>, source: GeneratedTypeSource) -> Self {
        Self {
            owner: owner.into(),
            source,
        }
    }
}

impl fmt::Display for GeneratedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner, self.source.member())
    }
}

/// The type of a variable, expression or member.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VariableType {
    Primitive(PrimitiveTypeId),
    Enum(String),
    /// A table referenced by name (`Rates`), not one of its rows.
    Table(String),
    /// A `type` declaration.
    Declared(String),
    Generated(GeneratedType),
    /// A function referenced by name (`Calculate`), used as the target of member access.
    Function(String),
    /// Statements have no value.
    Void,
}

impl VariableType {
    pub const NUMBER: VariableType = VariableType::Primitive(PrimitiveTypeId::Number);
    pub const STRING: VariableType = VariableType::Primitive(PrimitiveTypeId::String);
    pub const BOOLEAN: VariableType = VariableType::Primitive(PrimitiveTypeId::Boolean);
    pub const DATE: VariableType = VariableType::Primitive(PrimitiveTypeId::Date);

    pub fn primitive(&self) -> Option<PrimitiveTypeId> {
        match self {
            VariableType::Primitive(id) => Some(*id),
            _ => None,
        }
    }

    /// Declared and generated types have members that can be filled, extracted and compared structurally.
    pub fn is_object(&self) -> bool {
        matches!(self, VariableType::Declared(_) | VariableType::Generated(_))
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, VariableType::Enum(_))
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableType::Primitive(id) => f.write_str(types::as_str(*id)),
            VariableType::Enum(name)
            | VariableType::Table(name)
            | VariableType::Declared(name)
            | VariableType::Function(name) => f.write_str(name),
            VariableType::Generated(generated) => write!(f, "{generated}"),
            VariableType::Void => f.write_str("void"),
        }
    }
}

/// Type queries against the root declarations of one document.
#[derive(Debug, Clone, Copy)]
pub struct TypeSystem<'a> {
    nodes: &'a RootNodeList,
    rules: &'a OperatorTypeRules,
}

/// Object types whose members are being resolved further up the current lookup.
type Visiting = Vec<VariableType>;

impl<'a> TypeSystem<'a> {
    pub fn new(nodes: &'a RootNodeList, rules: &'a OperatorTypeRules) -> Self {
        Self { nodes, rules }
    }

    pub fn nodes(&self) -> &'a RootNodeList {
        self.nodes
    }

    pub fn rules(&self) -> &'a OperatorTypeRules {
        self.rules
    }

    /// Type of a root declaration referenced by name. Scenarios have no type.
    pub fn root_type(&self, name: &str) -> Option<VariableType> {
        match self.nodes.get(name)? {
            RootNode::Function(f) => Some(VariableType::Function(f.name.clone())),
            RootNode::Enum(e) => Some(VariableType::Enum(e.name.clone())),
            RootNode::Table(t) => Some(VariableType::Table(t.name.clone())),
            RootNode::Type(t) => Some(VariableType::Declared(t.name.clone())),
            RootNode::Scenario(_) => None,
        }
    }

    /// Resolve a written type annotation. `var` has no type of its own and resolves to `None`.
    pub fn resolve_annotation(&self, annotation: &TypeAnnotation) -> Option<VariableType> {
        match annotation {
            TypeAnnotation::Primitive(id) => Some(VariableType::Primitive(*id)),
            TypeAnnotation::Implicit => None,
            TypeAnnotation::Named(path) => self.resolve_type_path(path),
        }
    }

    /// Resolve a type name such as `Marital`, `Person`, `Calculate.Results` or `Rates.Row`.
    pub fn resolve_type_path(&self, path: &VariablePath) -> Option<VariableType> {
        match path.parts() {
            [name] => match types::from_str(name) {
                Some(id) => Some(VariableType::Primitive(id)),
                None => self
                    .root_type(name)
                    .filter(|t| matches!(t, VariableType::Enum(_) | VariableType::Declared(_))),
            },
            [owner, member] => {
                let owner = self.root_type(owner)?;
                match owner {
                    VariableType::Function(_) | VariableType::Table(_) => {
                        self.member_type(&owner, member).filter(VariableType::is_object)
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Type of the default value of a definition, derived without a variable scope.
    ///
    /// `visible` holds the definitions declared before it in the same block (and the parameters, for results).
    /// Names not found there resolve to root declarations, as they do during validation. Defaults that need
    /// code variables have no type here; validation reports them where they are declared.
    pub fn default_type(&self, expression: &Expression, visible: &[(String, VariableType)]) -> Option<VariableType> {
        self.default_type_in(expression, visible, &mut Visiting::new())
    }

    fn default_type_in(
        &self,
        expression: &Expression,
        visible: &[(String, VariableType)],
        visiting: &mut Visiting,
    ) -> Option<VariableType> {
        let lookup = |name: &str| {
            visible
                .iter()
                .rev()
                .find_map(|(candidate, t)| (candidate == name).then(|| t.clone()))
        };
        match &expression.kind {
            ExpressionKind::Literal(value) => Some(VariableType::Primitive(value.primitive_type())),
            ExpressionKind::Identifier(name) => lookup(name.as_str()),
            ExpressionKind::MemberAccess(path) => {
                let (first, rest) = path.parts().split_first()?;
                let mut current = lookup(first.as_str()).or_else(|| self.root_type(first))?;
                for member in rest {
                    current = self.member_type_in(&current, member, visiting)?;
                }
                Some(current)
            }
            ExpressionKind::Parenthesized(inner) => self.default_type_in(inner, visible, visiting),
            ExpressionKind::Binary(binary) => {
                let left = self.default_type_in(&binary.left, visible, visiting)?;
                let right = self.default_type_in(&binary.right, visible, visiting)?;
                self.rules.result_type(binary.operator, &left, &right)
            }
            ExpressionKind::FunctionCall(call) => match call {
                FunctionCall::New(argument) | FunctionCall::Fill(argument) => {
                    self.resolve_type_path(&argument.path).filter(VariableType::is_object)
                }
                FunctionCall::Table(table_call) => match &table_call.result_column {
                    Some(column) => {
                        let table = self.nodes.table(&table_call.table)?;
                        self.resolve_annotation(&table.column(&column.column)?.type_annotation)
                    }
                    None => Some(VariableType::Generated(GeneratedType::new(
                        table_call.table.clone(),
                        GeneratedTypeSource::TableRow,
                    ))),
                },
                FunctionCall::User(user_call) => {
                    if self.nodes.function(&user_call.name).is_some() {
                        Some(VariableType::Generated(GeneratedType::new(
                            user_call.name.clone(),
                            GeneratedTypeSource::FunctionResults,
                        )))
                    } else {
                        functions::library_function(&user_call.name).map(|f| VariableType::Primitive(f.result))
                    }
                }
                FunctionCall::Extract(_) => None,
            },
            _ => None,
        }
    }

    /// Name and type of each definition in order: its annotation, or the type of its default for `var`.
    /// Definitions without a resolvable type are skipped.
    fn definition_types(
        &self,
        outer: &[(String, VariableType)],
        definitions: &[VariableDefinition],
        visiting: &mut Visiting,
    ) -> Vec<(String, VariableType)> {
        let mut visible = outer.to_vec();
        let mut resolved = Vec::new();
        for definition in definitions {
            let definition_type = match &definition.type_annotation {
                TypeAnnotation::Implicit => definition
                    .default
                    .as_ref()
                    .and_then(|default| self.default_type_in(default, &visible, visiting)),
                annotation => self.resolve_annotation(annotation),
            };
            if let Some(definition_type) = definition_type {
                visible.push((definition.name.clone(), definition_type.clone()));
                resolved.push((definition.name.clone(), definition_type));
            }
        }
        resolved
    }

    /// Parameters or results of `function` with their types. Result defaults see the parameters.
    pub fn function_members(&self, function: &Function, source: GeneratedTypeSource) -> Vec<(String, VariableType)> {
        self.function_members_in(function, source, &mut Visiting::new())
    }

    fn function_members_in(
        &self,
        function: &Function,
        source: GeneratedTypeSource,
        visiting: &mut Visiting,
    ) -> Vec<(String, VariableType)> {
        let parameters = self.definition_types(&[], function.parameter_variables(), visiting);
        match source {
            GeneratedTypeSource::FunctionParameters => parameters,
            GeneratedTypeSource::FunctionResults => {
                self.definition_types(&parameters, function.result_variables(), visiting)
            }
            GeneratedTypeSource::TableRow => Vec::new(),
        }
    }

    /// Type of `member` on a value of type `owner`, if `owner` has such a member.
    pub fn member_type(&self, owner: &VariableType, member: &str) -> Option<VariableType> {
        self.member_type_in(owner, member, &mut Visiting::new())
    }

    fn member_type_in(&self, owner: &VariableType, member: &str, visiting: &mut Visiting) -> Option<VariableType> {
        match owner {
            VariableType::Enum(name) => self
                .nodes
                .enum_definition(name)
                .filter(|e| e.contains_member(member))
                .map(|_| owner.clone()),
            VariableType::Table(name) => {
                let table = self.nodes.table(name)?;
                if member == ROW_MEMBER {
                    return Some(VariableType::Generated(GeneratedType::new(
                        name.clone(),
                        GeneratedTypeSource::TableRow,
                    )));
                }
                if member == COUNT_MEMBER {
                    return Some(VariableType::NUMBER);
                }
                self.resolve_annotation(&table.column(member)?.type_annotation)
            }
            VariableType::Function(name) => {
                let source = if member == PARAMETERS_MEMBER {
                    GeneratedTypeSource::FunctionParameters
                } else if member == RESULTS_MEMBER {
                    GeneratedTypeSource::FunctionResults
                } else {
                    return None;
                };
                Some(VariableType::Generated(GeneratedType::new(name.clone(), source)))
            }
            VariableType::Declared(_) | VariableType::Generated(_) => self
                .members_in(owner, visiting)
                .into_iter()
                .find_map(|(name, member_type)| (name == member).then_some(member_type)),
            VariableType::Primitive(_) | VariableType::Void => None,
        }
    }

    /// Members of an object-like type in declaration order. Members whose type cannot be resolved are skipped;
    /// validation reports them where they are declared.
    pub fn members(&self, object: &VariableType) -> Vec<(String, VariableType)> {
        self.members_in(object, &mut Visiting::new())
    }

    fn members_in(&self, object: &VariableType, visiting: &mut Visiting) -> Vec<(String, VariableType)> {
        // `var` defaults can reach back into the type being resolved.
        if visiting.contains(object) {
            return Vec::new();
        }
        visiting.push(object.clone());
        let members = match object {
            VariableType::Declared(name) => match self.nodes.type_definition(name) {
                Some(definition) => self.definition_types(&[], &definition.members, visiting),
                None => Vec::new(),
            },
            VariableType::Generated(generated) => match generated.source {
                GeneratedTypeSource::TableRow => match self.nodes.table(&generated.owner) {
                    Some(table) => table
                        .columns()
                        .iter()
                        .filter_map(|c| Some((c.name.clone(), self.resolve_annotation(&c.type_annotation)?)))
                        .collect(),
                    None => Vec::new(),
                },
                source => match self.nodes.function(&generated.owner) {
                    Some(function) => self.function_members_in(function, source, visiting),
                    None => Vec::new(),
                },
            },
            _ => Vec::new(),
        };
        visiting.pop();
        members
    }

    /// Whether a value of type `value` can be stored in a variable of type `target`.
    ///
    /// Equal types are always assignable. Object-like types are assignable when `value` provides every member
    /// of `target` with an assignable type; extra members are ignored.
    pub fn is_assignable(&self, target: &VariableType, value: &VariableType) -> bool {
        self.assignable(target, value, &mut Vec::new())
    }

    fn assignable(
        &self,
        target: &VariableType,
        value: &VariableType,
        visiting: &mut Vec<(VariableType, VariableType)>,
    ) -> bool {
        if target == value {
            return true;
        }
        if !target.is_object() || !value.is_object() {
            return false;
        }
        // A pair already being compared further up holds unless something else fails.
        let pair = (target.clone(), value.clone());
        if visiting.contains(&pair) {
            return true;
        }
        visiting.push(pair);
        let provided = self.members(value);
        let accepted = self.members(target).iter().all(|(name, required)| {
            provided
                .iter()
                .any(|(candidate, provided_type)| candidate == name && self.assignable(required, provided_type, visiting))
        });
        visiting.pop();
        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexy_syntax::parser::expressions::ExpressionFactory;
    use lexy_syntax::parser::{DocumentOptions, DocumentParser};

    const SOURCE: &str = r#"
enum Marital
  Single
  Married

table Rates
  | Marital Status | number Factor |
  | Marital.Single | 1 |

type Person
  string Name
  number Age = 18

type Named
  string Name

function Calculate
  parameters
    Person Client
    var Year = 2024
    var Status = Marital.Single
    var Amount = 1 + 2
    var Next = Year + 1
  results
    number Tax
    var Factor = lookUp(Rates, Status, Rates.Status, Rates.Factor)
"#;

    fn parse(source: &str) -> RootNodeList {
        let factory = ExpressionFactory::standard();
        let options = DocumentOptions::default();
        let lines: Vec<&str> = source.lines().collect();
        let document = DocumentParser::new(&factory, &options).parse_lines(&lines, "types.lexy");
        assert!(!document.has_errors(), "{}", document.logger.format_entries());
        document.nodes
    }

    #[test]
    fn test_generated_type_equality_includes_source() {
        let parameters = VariableType::Generated(GeneratedType::new("Calculate", GeneratedTypeSource::FunctionParameters));
        let results = VariableType::Generated(GeneratedType::new("Calculate", GeneratedTypeSource::FunctionResults));
        assert_ne!(parameters, results);
        assert_eq!(parameters.to_string(), "Calculate.Parameters");
        assert_eq!(results.to_string(), "Calculate.Results");
        assert_ne!(VariableType::Enum("A".into()), VariableType::Declared("A".into()));
    }

    #[test]
    fn test_member_lookup() {
        let nodes = parse(SOURCE);
        let rules = OperatorTypeRules::standard();
        let types = TypeSystem::new(&nodes, &rules);

        let marital = VariableType::Enum("Marital".into());
        assert_eq!(types.member_type(&marital, "Single"), Some(marital.clone()));
        assert_eq!(types.member_type(&marital, "Divorced"), None);

        let rates = VariableType::Table("Rates".into());
        assert_eq!(types.member_type(&rates, "Factor"), Some(VariableType::NUMBER));
        assert_eq!(types.member_type(&rates, "Count"), Some(VariableType::NUMBER));
        assert_eq!(
            types.member_type(&rates, "Row").map(|t| t.to_string()).as_deref(),
            Some("Rates.Row")
        );

        let parameters = types.member_type(&VariableType::Function("Calculate".into()), "Parameters").unwrap();
        assert_eq!(types.member_type(&parameters, "Client"), Some(VariableType::Declared("Person".into())));
        assert_eq!(types.member_type(&parameters, "Year"), Some(VariableType::NUMBER));
        assert_eq!(
            types.member_type(&VariableType::Declared("Person".into()), "Age"),
            Some(VariableType::NUMBER)
        );
    }

    #[test]
    fn test_var_members_take_the_type_of_their_default() {
        let nodes = parse(SOURCE);
        let rules = OperatorTypeRules::standard();
        let types = TypeSystem::new(&nodes, &rules);
        let calculate = nodes.function("Calculate").unwrap();

        let parameters: Vec<(String, String)> = types
            .function_members(calculate, GeneratedTypeSource::FunctionParameters)
            .into_iter()
            .map(|(name, t)| (name, t.to_string()))
            .collect();
        let expected = [
            ("Client", "Person"),
            ("Year", "number"),
            ("Status", "Marital"),
            ("Amount", "number"),
            ("Next", "number"),
        ];
        assert_eq!(
            parameters,
            expected.map(|(n, t)| (n.to_string(), t.to_string())).to_vec()
        );

        let results = VariableType::Generated(GeneratedType::new("Calculate", GeneratedTypeSource::FunctionResults));
        assert_eq!(types.member_type(&results, "Factor"), Some(VariableType::NUMBER));
    }

    #[test]
    fn test_self_referencing_var_members_terminate() {
        let nodes = parse(
            r#"
type Left
  Right Other
  var Value = Other.Value

type Right
  Left Other
  var Value = Other.Value
"#,
        );
        let rules = OperatorTypeRules::standard();
        let types = TypeSystem::new(&nodes, &rules);
        let left = VariableType::Declared("Left".into());
        assert_eq!(types.member_type(&left, "Other"), Some(VariableType::Declared("Right".into())));
        assert_eq!(types.member_type(&left, "Value"), None);
    }

    #[test]
    fn test_resolve_type_paths() {
        let nodes = parse(SOURCE);
        let rules = OperatorTypeRules::standard();
        let types = TypeSystem::new(&nodes, &rules);
        let path = |text: &str| VariablePath::new(text.split('.').map(str::to_string).collect());

        assert_eq!(types.resolve_type_path(&path("Marital")), Some(VariableType::Enum("Marital".into())));
        assert_eq!(types.resolve_type_path(&path("number")), Some(VariableType::NUMBER));
        assert!(types.resolve_type_path(&path("Rates.Row")).is_some());
        assert!(types.resolve_type_path(&path("Calculate.Results")).is_some());
        assert_eq!(types.resolve_type_path(&path("Rates")), None);
        assert_eq!(types.resolve_type_path(&path("Rates.Factor")), None);
        assert_eq!(types.resolve_type_path(&path("Unknown")), None);
    }

    #[test]
    fn test_structural_width_assignability() {
        let nodes = parse(SOURCE);
        let rules = OperatorTypeRules::standard();
        let types = TypeSystem::new(&nodes, &rules);
        let person = VariableType::Declared("Person".into());
        let named = VariableType::Declared("Named".into());

        assert!(types.is_assignable(&named, &person));
        assert!(!types.is_assignable(&person, &named));
        assert!(types.is_assignable(&VariableType::NUMBER, &VariableType::NUMBER));
        assert!(!types.is_assignable(&VariableType::NUMBER, &VariableType::STRING));
        assert!(!types.is_assignable(&named, &VariableType::STRING));
    }
}
