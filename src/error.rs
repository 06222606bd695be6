//! Error types and Result alias for sqltree

use thiserror::Error;

/// Errors produced while tokenizing or parsing a query.
///
/// Lexical errors are recoverable: the tokenizer collects them and keeps
/// going, so a best-effort token stream is still produced. Numeric
/// overflow and syntax errors are fatal for the operation that raised
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An unrecognized character in the input. The tokenizer skips
    /// exactly one character and resumes; surrounding tokens are
    /// unaffected.
    #[error("illegal character '{ch}' at line {line}, column {column}")]
    Lexical { ch: char, line: u32, column: u32 },

    /// A numeric literal outside the representable range. Rejected
    /// outright rather than saturated or silently replaced.
    #[error("numeric literal '{text}' out of range at line {line}, column {column}")]
    NumericOverflow {
        text: String,
        line: u32,
        column: u32,
    },

    /// The token stream does not match any grammar production at the
    /// current position. Aborts the whole parse; no partial tree is
    /// produced.
    #[error("{message}, found '{found}' at line {line}, column {column}")]
    Syntax {
        message: String,
        found: String,
        line: u32,
        column: u32,
    },
}

impl Error {
    /// Source position (1-based line and column) the error points at.
    pub fn position(&self) -> (u32, u32) {
        match *self {
            Error::Lexical { line, column, .. }
            | Error::NumericOverflow { line, column, .. }
            | Error::Syntax { line, column, .. } => (line, column),
        }
    }
}

/// Result type alias for sqltree operations
pub type Result<T> = std::result::Result<T, Error>;
