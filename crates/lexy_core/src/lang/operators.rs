//! Operator vocabulary.
//!
//! This module defines the canonical operator set: binary operators (`+`, `&&`, ...), the assignment operator,
//! and the structural tokens the tokenizer classifies as operators (parentheses, brackets, argument and table
//! separators, spread).
//!
//! ## Notes
//! - Lookup via [`from_str`] is exact; the tokenizer is responsible for longest-match scanning.
//! - `precedence` is only set for binary operators. A **lower** value binds **wider**: the expression factory
//!   splits an expression at the lowest tier present first.
//!
//! ## Examples
//! ```rust
//! use lexy_core::lang::operators::{self, OperatorId};
//!
//! assert_eq!(operators::from_str("<="), Some(OperatorId::LessThanOrEqual));
//! assert!(operators::info_for(OperatorId::Or).precedence < operators::info_for(OperatorId::Addition).precedence);
//! ```

/// Stable identifier for every operator token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorId {
    // Arithmetic
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Modulus,

    // Comparison
    Equals,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,

    // Logical
    And,
    Or,

    // Assignment
    Assignment,

    // Structure
    OpenParenthesis,
    CloseParenthesis,
    OpenBracket,
    CloseBracket,
    ArgumentSeparator,
    TableSeparator,
    Spread,
}

/// Classify what role an operator token plays in the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorClass {
    /// Infix operator that combines two operands.
    Binary,
    /// The `=` assignment operator.
    Assignment,
    /// Opening or closing group delimiter.
    Grouping,
    /// Argument (`,`) and table (`|`) separators.
    Separator,
    /// The `...` spread marker.
    Spread,
}

/// Metadata for an operator.
#[derive(Debug, Clone, Copy)]
pub struct OperatorInfo {
    pub id: OperatorId,
    pub spelling: &'static str,
    pub class: OperatorClass,
    /// Relative binding tier for binary operators; `0` for everything else.
    pub precedence: u8,
}

const fn op(id: OperatorId, spelling: &'static str, class: OperatorClass, precedence: u8) -> OperatorInfo {
    OperatorInfo {
        id,
        spelling,
        class,
        precedence,
    }
}

/// Registry of all operators.
///
/// Multi-character spellings are listed before their single-character prefixes so a longest-match scan over this
/// table is correct.
pub const OPERATORS: &[OperatorInfo] = &[
    op(OperatorId::Spread, "...", OperatorClass::Spread, 0),
    op(OperatorId::Or, "||", OperatorClass::Binary, 10),
    op(OperatorId::And, "&&", OperatorClass::Binary, 20),
    op(OperatorId::Equals, "==", OperatorClass::Binary, 30),
    op(OperatorId::NotEqual, "!=", OperatorClass::Binary, 30),
    op(OperatorId::GreaterThanOrEqual, ">=", OperatorClass::Binary, 40),
    op(OperatorId::LessThanOrEqual, "<=", OperatorClass::Binary, 40),
    op(OperatorId::GreaterThan, ">", OperatorClass::Binary, 40),
    op(OperatorId::LessThan, "<", OperatorClass::Binary, 40),
    op(OperatorId::Addition, "+", OperatorClass::Binary, 50),
    op(OperatorId::Subtraction, "-", OperatorClass::Binary, 50),
    op(OperatorId::Multiplication, "*", OperatorClass::Binary, 60),
    op(OperatorId::Division, "/", OperatorClass::Binary, 60),
    op(OperatorId::Modulus, "%", OperatorClass::Binary, 60),
    op(OperatorId::Assignment, "=", OperatorClass::Assignment, 0),
    op(OperatorId::OpenParenthesis, "(", OperatorClass::Grouping, 0),
    op(OperatorId::CloseParenthesis, ")", OperatorClass::Grouping, 0),
    op(OperatorId::OpenBracket, "[", OperatorClass::Grouping, 0),
    op(OperatorId::CloseBracket, "]", OperatorClass::Grouping, 0),
    op(OperatorId::ArgumentSeparator, ",", OperatorClass::Separator, 0),
    op(OperatorId::TableSeparator, "|", OperatorClass::Separator, 0),
];

/// Resolve an exact spelling to its operator id.
pub fn from_str(spelling: &str) -> Option<OperatorId> {
    OPERATORS.iter().find(|o| o.spelling == spelling).map(|o| o.id)
}

/// Canonical spelling of an operator.
pub fn as_str(id: OperatorId) -> &'static str {
    info_for(id).spelling
}

/// Registry metadata for an operator.
pub fn info_for(id: OperatorId) -> &'static OperatorInfo {
    OPERATORS
        .iter()
        .find(|o| o.id == id)
        .expect("INVARIANT: every OperatorId has a registry entry")
}

/// Find the longest operator spelling that starts `text`.
pub fn longest_prefix(text: &str) -> Option<&'static OperatorInfo> {
    OPERATORS
        .iter()
        .filter(|o| text.starts_with(o.spelling))
        .max_by_key(|o| o.spelling.len())
}

/// Return `true` if the operator combines two operands.
pub fn is_binary(id: OperatorId) -> bool {
    info_for(id).class == OperatorClass::Binary
}

/// Group binary operators into precedence tiers, ordered from the widest-binding (lowest) tier to the tightest.
pub fn binary_tiers() -> Vec<Vec<OperatorId>> {
    let mut levels: Vec<u8> = OPERATORS
        .iter()
        .filter(|o| o.class == OperatorClass::Binary)
        .map(|o| o.precedence)
        .collect();
    levels.sort_unstable();
    levels.dedup();

    levels
        .into_iter()
        .map(|level| {
            OPERATORS
                .iter()
                .filter(|o| o.class == OperatorClass::Binary && o.precedence == level)
                .map(|o| o.id)
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longest_prefix_prefers_multi_char() {
        assert_eq!(longest_prefix("<= 3").map(|o| o.id), Some(OperatorId::LessThanOrEqual));
        assert_eq!(longest_prefix("< 3").map(|o| o.id), Some(OperatorId::LessThan));
        assert_eq!(longest_prefix("== 3").map(|o| o.id), Some(OperatorId::Equals));
        assert_eq!(longest_prefix("= 3").map(|o| o.id), Some(OperatorId::Assignment));
        assert_eq!(longest_prefix("...").map(|o| o.id), Some(OperatorId::Spread));
        assert!(longest_prefix("abc").is_none());
    }

    #[test]
    fn test_binary_tiers_are_ordered_lowest_first() {
        let tiers = binary_tiers();
        assert_eq!(tiers.len(), 6);
        assert_eq!(tiers[0], vec![OperatorId::Or]);
        assert_eq!(tiers[1], vec![OperatorId::And]);
        assert!(tiers[4].contains(&OperatorId::Addition));
        assert!(tiers[5].contains(&OperatorId::Multiplication));
    }

    #[test]
    fn test_structure_tokens_are_not_binary() {
        assert!(!is_binary(OperatorId::Assignment));
        assert!(!is_binary(OperatorId::OpenParenthesis));
        assert!(is_binary(OperatorId::Modulus));
    }
}
