//! Error types for the QIF reader.

use crate::amount::Amount;
use thiserror::Error;

/// Result type alias for reader operations
pub type Result<T> = std::result::Result<T, QifError>;

/// Errors that can occur while reading a QIF document.
///
/// Every parse-time variant carries the 1-based line number it was raised at.
/// None of them are recoverable: the first one aborts the whole read.
#[derive(Error, Debug)]
pub enum QifError {
    /// Failed to open or read the input
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to write the CSV summary
    #[error("CSV output error: {0}")]
    Csv(#[from] csv::Error),

    /// A line that is not valid where it appears
    #[error("Invalid token at line {line}: {text}")]
    InvalidToken { line: usize, text: String },

    /// A recognized section kind that is not implemented
    #[error("Unsupported token at line {line}: {text}")]
    Unsupported { line: usize, text: String },

    /// A numeric field that could not be parsed
    #[error("Invalid amount at line {line}: {text}")]
    InvalidAmount {
        line: usize,
        text: String,
        #[source]
        source: rust_decimal::Error,
    },

    /// A sum of amounts too large to represent
    #[error("Amount overflow at line {line}: {text}")]
    AmountOverflow { line: usize, text: String },

    /// A date field that could not be parsed
    #[error("Invalid date at line {line}: {text}")]
    InvalidDate { line: usize, text: String },

    /// Split amounts that do not add up to their transaction's amount
    #[error("Split total {splits} does not match transaction amount {amount} at line {line}")]
    SplitMismatch {
        line: usize,
        amount: Amount,
        splits: Amount,
    },

    /// The caller requested cancellation
    #[error("Reading cancelled at line {line}")]
    Cancelled { line: usize },

    /// Missing input file argument
    #[error("Missing input file argument. Usage: qif-reader <input.qif>")]
    MissingArgument,
}

impl QifError {
    /// Returns the line number the error was raised at, if it came from parsing.
    pub fn line(&self) -> Option<usize> {
        match self {
            QifError::InvalidToken { line, .. }
            | QifError::Unsupported { line, .. }
            | QifError::InvalidAmount { line, .. }
            | QifError::AmountOverflow { line, .. }
            | QifError::InvalidDate { line, .. }
            | QifError::SplitMismatch { line, .. }
            | QifError::Cancelled { line } => Some(*line),
            QifError::Io(_) | QifError::Csv(_) | QifError::MissingArgument => None,
        }
    }
}
