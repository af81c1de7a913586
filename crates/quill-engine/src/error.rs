//! Error types for lexing, parsing and evaluation.

use crate::lexer::TokenKind;
use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a `parse` or `evaluate` call.
///
/// None of these are recoverable inside the language itself; they all
/// propagate to the embedder.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// No lexical rule matches at `offset`.
    #[error("SyntaxError: invalid token at offset {offset}")]
    InvalidToken {
        /// Byte offset of the offending character
        offset: usize,
    },

    /// The parser needed something other than the token it found.
    #[error("SyntaxError: unexpected {found} at offset {offset}, expected {expected}")]
    ParseError {
        /// The token that was found
        found: TokenKind,
        /// Byte offset where the token starts
        offset: usize,
        /// Description of what would have been accepted
        expected: String,
    },

    /// The callee of a call expression is not a function.
    #[error("TypeError: {0} is not a function")]
    NotCallable(String),

    /// An evaluator invariant was violated.
    #[error("InternalError: {0}")]
    Internal(String),
}

impl Error {
    /// Builds a parse error for `found` at `offset`.
    pub fn unexpected(found: TokenKind, offset: usize, expected: impl Into<String>) -> Self {
        Self::ParseError {
            found,
            offset,
            expected: expected.into(),
        }
    }

    /// Returns true for errors raised before evaluation started.
    pub fn is_syntax_error(&self) -> bool {
        matches!(self, Error::InvalidToken { .. } | Error::ParseError { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_token_display() {
        let err = Error::InvalidToken { offset: 3 };
        assert_eq!(err.to_string(), "SyntaxError: invalid token at offset 3");
        assert!(err.is_syntax_error());
    }

    #[test]
    fn test_parse_error_display() {
        let err = Error::unexpected(TokenKind::RightParen, 4, "expression");
        assert_eq!(
            err.to_string(),
            "SyntaxError: unexpected `)` at offset 4, expected expression"
        );
    }

    #[test]
    fn test_runtime_errors_are_not_syntax_errors() {
        assert!(!Error::NotCallable("1".into()).is_syntax_error());
        assert!(!Error::Internal("oops".into()).is_syntax_error());
    }
}
