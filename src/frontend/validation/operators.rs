//! Declarative whitelist of legal binary operator operand types.
//!
//! The expression factory accepts any operand on either side of an operator; legality is decided here at
//! validation time. A rule lists the operator, the accepted left and right operand types and the result type.
//! [`OperandType::AnyEnum`] matches every enum type, but both sides must then be the same enum.

use lexy_core::lang::operators::{self, OperatorId};
use lexy_core::lang::types::PrimitiveTypeId;

use crate::frontend::types::VariableType;

/// Operand pattern of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandType {
    Primitive(PrimitiveTypeId),
    AnyEnum,
}

impl OperandType {
    fn matches(&self, operand: &VariableType) -> bool {
        match self {
            OperandType::Primitive(id) => operand.primitive() == Some(*id),
            OperandType::AnyEnum => operand.is_enum(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorTypeRule {
    pub operator: OperatorId,
    pub left: OperandType,
    pub right: OperandType,
    pub result: PrimitiveTypeId,
}

impl OperatorTypeRule {
    pub const fn new(operator: OperatorId, left: OperandType, right: OperandType, result: PrimitiveTypeId) -> Self {
        Self {
            operator,
            left,
            right,
            result,
        }
    }

    fn accepts(&self, operator: OperatorId, left: &VariableType, right: &VariableType) -> bool {
        if self.operator != operator || !self.left.matches(left) || !self.right.matches(right) {
            return false;
        }
        match (self.left, self.right) {
            (OperandType::AnyEnum, _) | (_, OperandType::AnyEnum) => left == right,
            _ => true,
        }
    }
}

/// The set of operator rules validation checks binary expressions against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorTypeRules {
    rules: Vec<OperatorTypeRule>,
}

impl OperatorTypeRules {
    pub fn new(rules: Vec<OperatorTypeRule>) -> Self {
        Self { rules }
    }

    /// The rules of the Lexy language.
    pub fn standard() -> Self {
        use OperandType::{AnyEnum, Primitive};
        use OperatorId::*;
        use PrimitiveTypeId::{Boolean, Date, Number, String};

        let mut rules = Vec::new();
        for operator in [Addition, Subtraction, Multiplication, Division, Modulus] {
            rules.push(OperatorTypeRule::new(operator, Primitive(Number), Primitive(Number), Number));
        }
        rules.push(OperatorTypeRule::new(Addition, Primitive(String), Primitive(String), String));
        rules.push(OperatorTypeRule::new(Addition, Primitive(String), Primitive(Number), String));
        rules.push(OperatorTypeRule::new(Subtraction, Primitive(Date), Primitive(Date), Number));

        for operator in [GreaterThan, GreaterThanOrEqual, LessThan, LessThanOrEqual] {
            for operand in [Number, Date] {
                rules.push(OperatorTypeRule::new(operator, Primitive(operand), Primitive(operand), Boolean));
            }
        }
        for operator in [Equals, NotEqual] {
            for operand in [Number, String, Boolean, Date] {
                rules.push(OperatorTypeRule::new(operator, Primitive(operand), Primitive(operand), Boolean));
            }
            rules.push(OperatorTypeRule::new(operator, AnyEnum, AnyEnum, Boolean));
        }
        for operator in [And, Or] {
            rules.push(OperatorTypeRule::new(operator, Primitive(Boolean), Primitive(Boolean), Boolean));
        }
        Self::new(rules)
    }

    pub fn rules(&self) -> &[OperatorTypeRule] {
        &self.rules
    }

    /// Result type of `left operator right`, or `None` when no rule allows it.
    pub fn result_type(&self, operator: OperatorId, left: &VariableType, right: &VariableType) -> Option<VariableType> {
        let rule = self.rules.iter().find(|r| r.accepts(operator, left, right));
        tracing::trace!(operator = operators::as_str(operator), %left, %right, allowed = rule.is_some());
        rule.map(|r| VariableType::Primitive(r.result))
    }
}

impl Default for OperatorTypeRules {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marital() -> VariableType {
        VariableType::Enum("Marital".into())
    }

    #[test]
    fn test_arithmetic_and_concatenation() {
        let rules = OperatorTypeRules::standard();
        assert_eq!(
            rules.result_type(OperatorId::Multiplication, &VariableType::NUMBER, &VariableType::NUMBER),
            Some(VariableType::NUMBER)
        );
        assert_eq!(
            rules.result_type(OperatorId::Addition, &VariableType::STRING, &VariableType::NUMBER),
            Some(VariableType::STRING)
        );
        assert_eq!(
            rules.result_type(OperatorId::Addition, &VariableType::NUMBER, &VariableType::STRING),
            None
        );
        assert_eq!(
            rules.result_type(OperatorId::Subtraction, &VariableType::DATE, &VariableType::DATE),
            Some(VariableType::NUMBER)
        );
    }

    #[test]
    fn test_enum_comparison_requires_same_enum() {
        let rules = OperatorTypeRules::standard();
        assert_eq!(
            rules.result_type(OperatorId::Equals, &marital(), &marital()),
            Some(VariableType::BOOLEAN)
        );
        assert_eq!(
            rules.result_type(OperatorId::NotEqual, &marital(), &VariableType::Enum("Other".into())),
            None
        );
        assert_eq!(rules.result_type(OperatorId::LessThan, &marital(), &marital()), None);
    }

    #[test]
    fn test_logical_operators_need_booleans() {
        let rules = OperatorTypeRules::standard();
        assert_eq!(
            rules.result_type(OperatorId::And, &VariableType::BOOLEAN, &VariableType::BOOLEAN),
            Some(VariableType::BOOLEAN)
        );
        assert_eq!(
            rules.result_type(OperatorId::Or, &VariableType::NUMBER, &VariableType::BOOLEAN),
            None
        );
    }

    #[test]
    fn test_injected_rules_replace_standard() {
        let rules = OperatorTypeRules::new(vec![OperatorTypeRule::new(
            OperatorId::Addition,
            OperandType::Primitive(PrimitiveTypeId::Number),
            OperandType::Primitive(PrimitiveTypeId::Number),
            PrimitiveTypeId::Number,
        )]);
        assert_eq!(
            rules.result_type(OperatorId::Subtraction, &VariableType::NUMBER, &VariableType::NUMBER),
            None
        );
    }
}
