use std::io;
use thiserror::Error;

use crate::config::settings::ConfigError;

/// Errors that can occur while interpreting git output
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A structural marker (diff header, hunk header, commit line) did not match
    #[error("Malformed header at line {line_number}: {line:?}")]
    MalformedHeader { line_number: usize, line: String },

    /// An identity header lacked the `<email>` portion
    #[error("Malformed author line at line {line_number}: {line:?}")]
    MalformedAuthorLine { line_number: usize, line: String },

    #[error("Malformed input: {0}")]
    MalformedInput(String),
}

impl ParseError {
    pub(crate) fn header(line_number: usize, line: &str) -> Self {
        ParseError::MalformedHeader {
            line_number,
            line: line.to_string(),
        }
    }

    pub(crate) fn author_line(line_number: usize, line: &str) -> Self {
        ParseError::MalformedAuthorLine {
            line_number,
            line: line.to_string(),
        }
    }

    /// The offending raw line, if the error points at one
    pub fn raw_line(&self) -> Option<&str> {
        match self {
            ParseError::MalformedHeader { line, .. }
            | ParseError::MalformedAuthorLine { line, .. } => Some(line),
            ParseError::MalformedInput(_) => None,
        }
    }

    /// 1-based position of the offending line in the input
    pub fn line_number(&self) -> Option<usize> {
        match self {
            ParseError::MalformedHeader { line_number, .. }
            | ParseError::MalformedAuthorLine { line_number, .. } => Some(*line_number),
            ParseError::MalformedInput(_) => None,
        }
    }
}

/// Top-level error used by the command-line front end
///
/// Wraps the parser and configuration errors so `main` can report every failure through
/// a single type. All module errors convert to AppError via the `From` trait.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("could not interpret version-control output: {0}")]
    Parse(#[from] ParseError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Unknown output kind: {0}")]
    UnknownOutputKind(String),

    #[error("Failed to encode output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for parser operations
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Result type for application-level operations
pub type AppResult<T> = std::result::Result<T, AppError>;
