//! A single source line: raw text, indentation, tokens and trailing comment.

use crate::diagnostics::{CompileError, errors};
use crate::lexer::{self, Token, TokenKind};
use crate::source::{SourceFile, SourceReference};

/// One tokenized source line.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// 0-based index in the file.
    pub index: usize,
    pub text: String,
    pub file: SourceFile,
    /// Tokens without the trailing comment.
    pub tokens: Vec<Token>,
    pub comment: Option<Token>,
}

impl Line {
    /// Tokenize `text`; a tokenizer failure becomes a lexical error at the offending column.
    pub fn tokenize(index: usize, text: &str, file: &SourceFile) -> Result<Self, CompileError> {
        let mut tokens = lexer::tokenize(text).map_err(|error| {
            CompileError::lexical(error.message, SourceReference::new(file.clone(), index + 1, error.column))
        })?;
        let comment = match tokens.last() {
            Some(Token {
                kind: TokenKind::Comment(_),
                ..
            }) => tokens.pop(),
            _ => None,
        };
        Ok(Self {
            index,
            text: text.to_string(),
            file: file.clone(),
            tokens,
            comment,
        })
    }

    /// 1-based line number.
    pub fn number(&self) -> usize {
        self.index + 1
    }

    /// No tokens and no comment.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.comment.is_none()
    }

    /// Only a comment.
    pub fn is_comment(&self) -> bool {
        self.tokens.is_empty() && self.comment.is_some()
    }

    /// Indentation depth. A tab is one level, `width` spaces are one level.
    ///
    /// ## Errors
    /// Returns an indentation error when the leading spaces are not a multiple of `width`.
    pub fn indent(&self, width: usize) -> Result<usize, CompileError> {
        let mut tabs = 0;
        let mut spaces = 0;
        for c in self.text.chars() {
            match c {
                '\t' => tabs += 1,
                ' ' => spaces += 1,
                _ => break,
            }
        }
        let width = width.max(1);
        if spaces % width != 0 {
            return Err(errors::invalid_indentation(
                &format!("{spaces} spaces is not a multiple of {width}."),
                self.reference(1),
            ));
        }
        Ok(tabs + spaces / width)
    }

    pub fn reference(&self, column: usize) -> SourceReference {
        SourceReference::new(self.file.clone(), self.number(), column)
    }

    /// Reference at the first token, or column 1 for an empty line.
    pub fn start_reference(&self) -> SourceReference {
        let column = self
            .tokens
            .first()
            .or(self.comment.as_ref())
            .map(|t| t.column)
            .unwrap_or(1);
        self.reference(column)
    }

    pub fn token_reference(&self, token: &Token) -> SourceReference {
        self.reference(token.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str) -> Line {
        Line::tokenize(0, text, &SourceFile::new("test.lexy")).unwrap()
    }

    #[test]
    fn test_indentation_levels() {
        assert_eq!(line("function A").indent(2).unwrap(), 0);
        assert_eq!(line("  parameters").indent(2).unwrap(), 1);
        assert_eq!(line("\t\tnumber A").indent(2).unwrap(), 2);
        assert_eq!(line("    A = 1").indent(4).unwrap(), 1);
    }

    #[test]
    fn test_invalid_indentation() {
        let error = line("   A = 1").indent(2).unwrap_err();
        assert_eq!(error.message, "Invalid indentation: 3 spaces is not a multiple of 2.");
        assert_eq!(error.reference.to_string(), "test.lexy(1, 1)");
    }

    #[test]
    fn test_comment_is_split_off() {
        let commented = line("  // explanation");
        assert!(commented.is_comment());
        let trailing = line("A = 1 // explanation");
        assert_eq!(trailing.tokens.len(), 3);
        assert!(trailing.comment.is_some());
        assert!(line("   ").is_empty());
    }

    #[test]
    fn test_lexical_error_reference() {
        let error = Line::tokenize(4, "  A = \"open", &SourceFile::new("x.lexy")).unwrap_err();
        assert_eq!(error.reference.to_string(), "x.lexy(5, 7)");
    }
}
