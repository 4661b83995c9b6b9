/*!
 * Parse-quality reports.
 *
 * Diagnostics never stop a parse: every format returns whatever cues it could
 * read together with the list of problems it met on the way.
 */

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    Info,
    Warning,
    Error,
    Other,
}

impl DiagnosticKind {
    /// Error and Other are the kinds that make a parse count as failed
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error | Self::Other)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single problem found while parsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,

    /// The offending source line, when there is one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,

    /// 1-based line number of `line`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<usize>,

    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            line: None,
            line_number: None,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Error, message)
    }

    /// Attach the source line and its 1-based number
    pub fn at(mut self, line_number: usize, line: &str) -> Self {
        self.line_number = Some(line_number);
        self.line = Some(line.to_string());
        self
    }

    /// Attach only a line number
    pub fn at_line(mut self, line_number: usize) -> Self {
        self.line_number = Some(line_number);
        self
    }

    pub fn is_error(&self) -> bool {
        self.kind.is_error()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line_number {
            Some(number) => write!(f, "{} at line {}: {}", self.kind, number, self.message)?,
            None => write!(f, "{}: {}", self.kind, self.message)?,
        }
        if let Some(line) = &self.line {
            write!(f, " [{}]", line)?;
        }
        Ok(())
    }
}

/// True if any diagnostic has the kind Error or Other
pub fn contains_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}

/// Number of Error/Other diagnostics
pub fn error_count(diagnostics: &[Diagnostic]) -> usize {
    diagnostics.iter().filter(|d| d.is_error()).count()
}
