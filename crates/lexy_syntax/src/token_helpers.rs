//! Small helper APIs for working with `Token` / `TokenKind` and token slices.
//!
//! These helpers exist to reduce repetitive `matches!(...)` at call sites. The expression factory works on
//! sub-slices of a line, so most of the structural queries (depth-0 operators, matching brackets, argument
//! splitting) live on the [`TokenSlice`] extension trait.

use crate::lexer::{Token, TokenKind, keyword_id};
use lexy_core::lang::keywords::KeywordId;
use lexy_core::lang::operators::{self, OperatorId};

impl TokenKind {
    /// The word of a keyword token, reserved or not.
    pub fn word(&self) -> Option<&str> {
        match self {
            TokenKind::Keyword(word) => Some(word),
            _ => None,
        }
    }

    /// Return the reserved keyword id, if this is a reserved word.
    pub fn keyword_id(&self) -> Option<KeywordId> {
        self.word().and_then(keyword_id)
    }

    /// Return `true` if this is the given reserved keyword.
    pub fn is_keyword(&self, id: KeywordId) -> bool {
        self.keyword_id() == Some(id)
    }

    /// A word that is not reserved: usable as a name.
    pub fn name(&self) -> Option<&str> {
        self.word().filter(|w| keyword_id(w).is_none())
    }

    /// Return the operator id, if this is an operator token.
    pub fn operator_id(&self) -> Option<OperatorId> {
        match self {
            TokenKind::Operator(id) => Some(*id),
            _ => None,
        }
    }

    /// Return `true` if this is the given operator.
    pub fn is_operator(&self, id: OperatorId) -> bool {
        matches!(self, TokenKind::Operator(o) if *o == id)
    }

    pub fn member_access(&self) -> Option<&[String]> {
        match self {
            TokenKind::MemberAccess(parts) => Some(parts),
            _ => None,
        }
    }

    pub fn quoted(&self) -> Option<&str> {
        match self {
            TokenKind::QuotedLiteral(text) => Some(text),
            _ => None,
        }
    }
}

impl Token {
    pub fn word(&self) -> Option<&str> {
        self.kind.word()
    }

    pub fn keyword_id(&self) -> Option<KeywordId> {
        self.kind.keyword_id()
    }

    pub fn is_keyword(&self, id: KeywordId) -> bool {
        self.kind.is_keyword(id)
    }

    pub fn name(&self) -> Option<&str> {
        self.kind.name()
    }

    pub fn operator_id(&self) -> Option<OperatorId> {
        self.kind.operator_id()
    }

    pub fn is_operator(&self, id: OperatorId) -> bool {
        self.kind.is_operator(id)
    }
}

/// Structural queries over a run of tokens.
pub trait TokenSlice {
    /// Token at `index` is the reserved keyword `id`.
    fn is_keyword_at(&self, index: usize, id: KeywordId) -> bool;

    /// Token at `index` is operator `id`.
    fn is_operator_at(&self, index: usize, id: OperatorId) -> bool;

    /// Index of the bracket closing the one at `open`, if balanced.
    fn matching_close(&self, open: usize) -> Option<usize>;

    /// Indices of binary operators outside parentheses and brackets.
    ///
    /// Returns `None` when the brackets are unbalanced.
    fn depth_zero_binary_operators(&self) -> Option<Vec<(usize, OperatorId)>>;

    /// Split on `,` outside nested brackets.
    fn split_arguments(&self) -> Vec<&[Token]>;

    /// Tokens joined with single spaces, for diagnostics.
    fn describe(&self) -> String;
}

fn opens(kind: &TokenKind) -> bool {
    kind.is_operator(OperatorId::OpenParenthesis) || kind.is_operator(OperatorId::OpenBracket)
}

fn closes(kind: &TokenKind) -> bool {
    kind.is_operator(OperatorId::CloseParenthesis) || kind.is_operator(OperatorId::CloseBracket)
}

impl TokenSlice for [Token] {
    fn is_keyword_at(&self, index: usize, id: KeywordId) -> bool {
        self.get(index).is_some_and(|t| t.is_keyword(id))
    }

    fn is_operator_at(&self, index: usize, id: OperatorId) -> bool {
        self.get(index).is_some_and(|t| t.is_operator(id))
    }

    fn matching_close(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (index, token) in self.iter().enumerate().skip(open) {
            if opens(&token.kind) {
                depth += 1;
            } else if closes(&token.kind) {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(index);
                }
            }
        }
        None
    }

    fn depth_zero_binary_operators(&self) -> Option<Vec<(usize, OperatorId)>> {
        let mut depth = 0usize;
        let mut found = Vec::new();
        for (index, token) in self.iter().enumerate() {
            if opens(&token.kind) {
                depth += 1;
            } else if closes(&token.kind) {
                depth = depth.checked_sub(1)?;
            } else if depth == 0 {
                if let Some(id) = token.operator_id().filter(|id| operators::is_binary(*id)) {
                    found.push((index, id));
                }
            }
        }
        (depth == 0).then_some(found)
    }

    fn split_arguments(&self) -> Vec<&[Token]> {
        if self.is_empty() {
            return Vec::new();
        }
        let mut arguments = Vec::new();
        let mut depth = 0usize;
        let mut start = 0;
        for (index, token) in self.iter().enumerate() {
            if opens(&token.kind) {
                depth += 1;
            } else if closes(&token.kind) {
                depth = depth.saturating_sub(1);
            } else if depth == 0 && token.is_operator(OperatorId::ArgumentSeparator) {
                arguments.push(&self[start..index]);
                start = index + 1;
            }
        }
        arguments.push(&self[start..]);
        arguments
    }

    fn describe(&self) -> String {
        self.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    #[test]
    fn test_matching_close() {
        let tokens = tokenize("F((A + B), C[1])").unwrap();
        assert_eq!(tokens.matching_close(1), Some(tokens.len() - 1));
        assert_eq!(tokens.matching_close(2), Some(6));
    }

    #[test]
    fn test_depth_zero_operators_skip_nested() {
        let tokens = tokenize("(A + B) * C").unwrap();
        let found = tokens.depth_zero_binary_operators().unwrap();
        assert_eq!(found, vec![(5, OperatorId::Multiplication)]);
        assert!(tokenize("(A + B").unwrap().depth_zero_binary_operators().is_none());
    }

    #[test]
    fn test_split_arguments() {
        let tokens = tokenize("Table, F(A, B), Table.Column").unwrap();
        let arguments = tokens.split_arguments();
        assert_eq!(arguments.len(), 3);
        assert_eq!(arguments[1].describe(), "F ( A , B )");
    }

    #[test]
    fn test_reserved_words_are_not_names() {
        let tokens = tokenize("if Value").unwrap();
        assert!(tokens[0].is_keyword(KeywordId::If));
        assert_eq!(tokens[0].name(), None);
        assert_eq!(tokens[1].name(), Some("Value"));
    }
}
