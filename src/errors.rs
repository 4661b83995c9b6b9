/*!
 * Error types for the subtypo library and command-line front end.
 *
 * Structural failures (an unknown format, an unsupported time pattern, a time
 * string that cannot be parsed) are reported through [`SubtitleError`] and
 * abort the operation. Content problems inside a recognized document are not
 * errors at all: they travel as [`crate::diagnostics::Diagnostic`] values on
 * the parse result.
 */

use thiserror::Error;

/// Errors raised by the subtitle core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubtitleError {
    /// No registered format matches the extension, or detection found no
    /// format that parses the text without errors
    #[error("The `{0}` format is not supported")]
    UnknownFormat(String),

    /// The time pattern string is not one of the supported patterns
    #[error("Unsupported time pattern: {0}")]
    UnsupportedTimePattern(String),

    /// The time string does not have a parseable shape
    #[error("Invalid time format: {0}")]
    InvalidTimeFormat(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the subtitle core
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The parsed document carries error diagnostics and strict mode is on
    #[error("{count} error diagnostic(s) in {file}")]
    Diagnostics {
        /// File the diagnostics belong to
        file: String,
        /// Number of error-kind diagnostics
        count: usize,
    },

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
