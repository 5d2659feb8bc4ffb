/*!
 * Error types for the captionsync library.
 *
 * Caption problems are described by `CaptionError`. Most of them never
 * reach a caller: tolerant parsing logs and skips them, and only strict
 * parsing or the explicit `try_` functions return them.
 */

use thiserror::Error;

/// Errors that can occur while decoding caption tracks
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CaptionError {
    /// Numeric components of a timestamp could not be decoded
    #[error("Malformed timestamp: {0}")]
    MalformedTimestamp(String),

    /// A line that is neither a timing line, text inside a cue, nor skippable
    #[error("Unrecognized line {line_number}: {content}")]
    UnrecognizedLine {
        /// 1-based line number in the source text
        line_number: usize,
        /// Trimmed line content
        content: String,
    },

    /// Timing line whose end precedes its start
    #[error("Invalid time range at line {line_number}: end {end} < start {start}")]
    InvertedInterval {
        /// 1-based line number of the timing line
        line_number: usize,
        /// Decoded start in seconds
        start: f64,
        /// Decoded end in seconds
        end: f64,
    },

    /// Timing line matched the pattern but decoded to an unusable value
    #[error("Unusable timestamp at line {line_number}")]
    UnusableTimestamp {
        /// 1-based line number of the timing line
        line_number: usize,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid or unreadable configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Error from caption processing
    #[error("Caption error: {0}")]
    Caption(#[from] CaptionError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
