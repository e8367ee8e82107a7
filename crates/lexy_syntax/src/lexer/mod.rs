//! Line tokenizer for the Lexy language.
//!
//! Lexy is line-oriented: every source line is tokenized on its own and indentation is measured separately by
//! [`crate::line::Line`]. The tokenizer recognizes:
//! - words (`Keyword`) and dotted member access (`Parameters.Value`)
//! - number, quoted, boolean and date literals
//! - operators, matched longest first against the `lexy_core` operator registry
//! - a trailing `//` comment
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (`TokenKind`, `Token`)
//! - `literals` - Date literal parsing and validation

pub mod literals;
pub mod tokens;

pub use literals::DateTimeLiteral;
pub use tokens::{Token, TokenKind, keyword_id};

use lexy_core::lang::conventions::{COMMENT_PREFIX, DATE_LITERAL_PREFIX, MEMBER_SEPARATOR};
use lexy_core::lang::operators::{self, OperatorId};
use thiserror::Error;

/// A tokenizer failure: the first invalid character sequence on a line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct LexError {
    pub message: String,
    /// 1-based column where the offending token starts.
    pub column: usize,
}

impl LexError {
    fn new(message: impl Into<String>, column: usize) -> Self {
        Self {
            message: message.into(),
            column,
        }
    }
}

/// Tokenizer for a single source line.
pub struct Lexer {
    chars: Vec<char>,
    position: usize,
    tokens: Vec<Token>,
}

impl Lexer {
    pub fn new(line: &str) -> Self {
        Self {
            chars: line.chars().collect(),
            position: 0,
            tokens: Vec::new(),
        }
    }

    /// Tokenize the whole line. Stops at the first invalid token.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.position += 1;
                continue;
            }
            if self.starts_with(COMMENT_PREFIX) {
                self.scan_comment();
                break;
            }
            self.scan_token(c)?;
        }
        Ok(self.tokens)
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.position + offset).copied()
    }

    fn starts_with(&self, text: &str) -> bool {
        text.chars().enumerate().all(|(i, c)| self.peek_at(i) == Some(c))
    }

    fn column(&self, position: usize) -> usize {
        position + 1
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        let column = self.column(start);
        self.tokens.push(Token::new(kind, column));
    }

    fn text(&self, start: usize, end: usize) -> String {
        self.chars[start..end].iter().collect()
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    fn scan_token(&mut self, c: char) -> Result<(), LexError> {
        let start = self.position;
        if c == '"' {
            return self.scan_quoted(start);
        }
        if c == DATE_LITERAL_PREFIX && self.peek_at(1) == Some('"') {
            return self.scan_date(start);
        }
        if c.is_ascii_digit() || (c == '-' && self.negative_number_allowed()) {
            return self.scan_number(start);
        }
        if is_word_start(c) {
            return self.scan_word(start);
        }

        let rest = self.text(start, self.chars.len());
        match operators::longest_prefix(&rest) {
            Some(info) => {
                self.position += info.spelling.chars().count();
                self.push(TokenKind::Operator(info.id), start);
                Ok(())
            }
            None => Err(LexError::new(
                format!("Invalid character at {}: '{c}'", self.column(start)),
                self.column(start),
            )),
        }
    }

    /// `-` starts a number literal only when it cannot be a binary minus.
    fn negative_number_allowed(&self) -> bool {
        if !self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            return false;
        }
        match self.tokens.last().map(|t| &t.kind) {
            None => true,
            Some(TokenKind::Operator(OperatorId::CloseParenthesis | OperatorId::CloseBracket)) => false,
            Some(TokenKind::Operator(_)) => true,
            Some(_) => false,
        }
    }

    fn scan_comment(&mut self) {
        let start = self.position;
        let text = self.text(start + COMMENT_PREFIX.len(), self.chars.len());
        self.position = self.chars.len();
        self.push(TokenKind::Comment(text.trim().to_string()), start);
    }

    fn scan_quoted(&mut self, start: usize) -> Result<(), LexError> {
        let content_start = start + 1;
        let end = (content_start..self.chars.len()).find(|&i| self.chars[i] == '"');
        match end {
            Some(end) => {
                let text = self.text(content_start, end);
                self.position = end + 1;
                self.push(TokenKind::QuotedLiteral(text), start);
                Ok(())
            }
            None => Err(LexError::new(
                format!("Closing quote expected for literal starting at {}", self.column(start)),
                self.column(start),
            )),
        }
    }

    fn scan_date(&mut self, start: usize) -> Result<(), LexError> {
        let content_start = start + 2;
        let end = (content_start..self.chars.len()).find(|&i| self.chars[i] == '"');
        let Some(end) = end else {
            return Err(LexError::new(
                format!("Closing quote expected for date literal starting at {}", self.column(start)),
                self.column(start),
            ));
        };
        let text = self.text(content_start, end);
        let date = DateTimeLiteral::parse(&text).map_err(|message| LexError::new(message, self.column(start)))?;
        self.position = end + 1;
        self.push(TokenKind::DateTime(date), start);
        Ok(())
    }

    fn scan_number(&mut self, start: usize) -> Result<(), LexError> {
        if self.peek() == Some('-') {
            self.position += 1;
        }
        let mut seen_decimal_point = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.position += 1;
            } else if c == '.' && !seen_decimal_point && self.peek_at(1).is_some_and(|n| n.is_ascii_digit()) {
                seen_decimal_point = true;
                self.position += 1;
            } else {
                break;
            }
        }

        if self.peek().is_some_and(|c| is_word_part(c) || c == '.') {
            let end = self.word_end(self.position);
            return Err(LexError::new(
                format!("Invalid number token '{}'", self.text(start, end)),
                self.column(start),
            ));
        }

        let text = self.text(start, self.position);
        let value = text
            .parse::<f64>()
            .map_err(|_| LexError::new(format!("Invalid number token '{text}'"), self.column(start)))?;
        self.push(TokenKind::Number(value), start);
        Ok(())
    }

    fn scan_word(&mut self, start: usize) -> Result<(), LexError> {
        let end = self.word_end(start);
        let text = self.text(start, end);
        self.position = end;

        if text.contains(MEMBER_SEPARATOR) {
            let parts: Vec<String> = text.split(MEMBER_SEPARATOR).map(str::to_string).collect();
            if parts.iter().any(|p| p.is_empty() || !p.starts_with(is_word_start)) {
                return Err(LexError::new(format!("Invalid member access token '{text}'"), self.column(start)));
            }
            self.push(TokenKind::MemberAccess(parts), start);
            return Ok(());
        }

        let kind = match text.as_str() {
            "true" => TokenKind::Boolean(true),
            "false" => TokenKind::Boolean(false),
            _ => TokenKind::Keyword(text),
        };
        self.push(kind, start);
        Ok(())
    }

    /// End of a word starting at `start`, member separators included.
    fn word_end(&self, start: usize) -> usize {
        let mut end = start;
        while end < self.chars.len() {
            let c = self.chars[end];
            // A `...` after a word is a spread operator, not a member separator.
            if c == MEMBER_SEPARATOR && self.chars.get(end + 1) == Some(&MEMBER_SEPARATOR) {
                break;
            }
            if is_word_part(c) || c == MEMBER_SEPARATOR {
                end += 1;
            } else {
                break;
            }
        }
        end
    }
}

fn is_word_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_word_part(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Convenience function to tokenize a single line.
pub fn tokenize(line: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(line).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(line: &str) -> Vec<TokenKind> {
        tokenize(line).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_operator_registry_parity() {
        for info in operators::OPERATORS {
            let tokens = kinds(&format!("A {} B", info.spelling));
            assert_eq!(tokens[1], TokenKind::Operator(info.id), "operator '{}'", info.spelling);
        }
    }

    #[test]
    fn test_words_and_member_access() {
        assert_eq!(
            kinds("number Result = Parameters.Value"),
            vec![
                TokenKind::Keyword("number".into()),
                TokenKind::Keyword("Result".into()),
                TokenKind::Operator(OperatorId::Assignment),
                TokenKind::MemberAccess(vec!["Parameters".into(), "Value".into()]),
            ]
        );
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            kinds(r#"12 3.5 "text" true false d"2024-01-31""#),
            vec![
                TokenKind::Number(12.0),
                TokenKind::Number(3.5),
                TokenKind::QuotedLiteral("text".into()),
                TokenKind::Boolean(true),
                TokenKind::Boolean(false),
                TokenKind::DateTime(DateTimeLiteral::parse("2024-01-31").unwrap()),
            ]
        );
    }

    #[test]
    fn test_negative_numbers() {
        assert_eq!(kinds("-5"), vec![TokenKind::Number(-5.0)]);
        assert_eq!(
            kinds("A - 5"),
            vec![
                TokenKind::Keyword("A".into()),
                TokenKind::Operator(OperatorId::Subtraction),
                TokenKind::Number(5.0),
            ]
        );
        assert_eq!(
            kinds("A = -5"),
            vec![
                TokenKind::Keyword("A".into()),
                TokenKind::Operator(OperatorId::Assignment),
                TokenKind::Number(-5.0),
            ]
        );
    }

    #[test]
    fn test_columns_are_one_based() {
        let tokens = tokenize("  if A > 5").unwrap();
        let columns: Vec<usize> = tokens.iter().map(|t| t.column).collect();
        assert_eq!(columns, vec![3, 6, 8, 10]);
    }

    #[test]
    fn test_trailing_comment() {
        assert_eq!(
            kinds("A = 1 // set A"),
            vec![
                TokenKind::Keyword("A".into()),
                TokenKind::Operator(OperatorId::Assignment),
                TokenKind::Number(1.0),
                TokenKind::Comment("set A".into()),
            ]
        );
    }

    #[test]
    fn test_spread_after_word() {
        assert_eq!(
            kinds("Calculate(...)"),
            vec![
                TokenKind::Keyword("Calculate".into()),
                TokenKind::Operator(OperatorId::OpenParenthesis),
                TokenKind::Operator(OperatorId::Spread),
                TokenKind::Operator(OperatorId::CloseParenthesis),
            ]
        );
    }

    #[test]
    fn test_invalid_tokens() {
        assert_eq!(tokenize("A = \"open").unwrap_err().column, 5);
        assert!(tokenize("12a").unwrap_err().message.contains("Invalid number token '12a'"));
        assert!(tokenize("A..B").is_err());
        assert!(tokenize("A = #").unwrap_err().message.contains("Invalid character"));
        assert!(tokenize(r#"d"2023-02-30""#).is_err());
    }
}
