//! Error types for the source parser.
//!
//! Errors are split into two stages:
//!
//! - [`LexerError`]: failures during tokenization (unterminated strings and comments).
//! - [`ParseError`]: failures during parsing (unexpected tokens, unclosed blocks).
//!
//! Both carry a [`Position`] so that error messages can
//! point to the exact line and column in the source.

use crate::ast::Position;
use std::fmt;
use thiserror::Error;

/// An error that occurs during tokenization (lexing).
#[derive(Debug, Clone, Error)]
pub enum LexerError {
    /// A string literal was opened but never closed.
    #[error("Unterminated string starting at line {}, column {}", .position.line, .position.column)]
    UnterminatedString { position: Position },

    /// A backticked identifier was opened but never closed on the same line.
    #[error("Unterminated identifier starting at line {}, column {}", .position.line, .position.column)]
    UnterminatedIdentifier { position: Position },

    /// A `/*` comment was never closed before end-of-file.
    #[error("Unterminated comment starting at line {}, column {}", .position.line, .position.column)]
    UnterminatedComment { position: Position },
}

impl LexerError {
    /// Returns the source position where this error occurred.
    pub fn position(&self) -> Position {
        match self {
            LexerError::UnterminatedString { position } => *position,
            LexerError::UnterminatedIdentifier { position } => *position,
            LexerError::UnterminatedComment { position } => *position,
        }
    }
}

/// An error that occurs during parsing.
///
/// Includes both parse-level errors and forwarded [`LexerError`]s.
#[derive(Debug, Clone, Error)]
pub enum ParseError {
    /// A tokenization error propagated from the lexer.
    #[error("{0}")]
    Lexer(#[from] LexerError),

    /// The parser found a different token than expected.
    #[error("Expected {expected} but found '{found}' at line {}, column {}", .position.line, .position.column)]
    UnexpectedToken {
        expected: String,
        found: String,
        position: Position,
    },

    /// A `(`, `[` or `{` was opened but never closed before end-of-file.
    #[error("Unclosed '{delimiter}' starting at line {}, column {}", .position.line, .position.column)]
    UnclosedDelimiter { delimiter: char, position: Position },

    /// A `}` was found without a matching `{`.
    #[error("Unmatched closing brace at line {}, column {}", .position.line, .position.column)]
    UnmatchedCloseBrace { position: Position },

    /// A file could not be read from disk.
    #[error("Failed to read file: {0}")]
    IoError(String),
}

impl ParseError {
    /// Returns the source position where this error occurred, if available.
    ///
    /// Returns `None` only for [`IoError`](ParseError::IoError) which has no
    /// source position.
    pub fn position(&self) -> Option<Position> {
        match self {
            ParseError::Lexer(e) => Some(e.position()),
            ParseError::UnexpectedToken { position, .. } => Some(*position),
            ParseError::UnclosedDelimiter { position, .. } => Some(*position),
            ParseError::UnmatchedCloseBrace { position } => Some(*position),
            ParseError::IoError(_) => None,
        }
    }
}

/// Result type alias for parser operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Display implementation for user-friendly error messages
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
