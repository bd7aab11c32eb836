//! Property maps and normalized error values.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Structured properties attached to events, identities, and exceptions.
pub type Properties = HashMap<String, serde_json::Value>;

/// Source location of an error, when one is available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Normalized error representation handed to the underlying client.
///
/// Anything error-like (an `Error` impl, a panic payload, a plain message)
/// is flattened into this shape before capture.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub message: String,
    /// Classification tag, e.g. `"panic"` or `"task_failure"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceLocation>,
}

impl ErrorInfo {
    /// Create an error value from a bare message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: None,
            source: None,
        }
    }

    /// Create an error value from any [`std::error::Error`].
    pub fn from_error(error: &(dyn std::error::Error + 'static)) -> Self {
        Self::new(error.to_string())
    }

    /// Set the classification tag.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Set the source location.
    pub fn with_source(mut self, file: impl Into<String>, line: u32, column: u32) -> Self {
        self.source = Some(SourceLocation {
            file: file.into(),
            line,
            column,
        });
        self
    }
}

impl From<&str> for ErrorInfo {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for ErrorInfo {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(loc) => write!(f, "{} ({})", self.message, loc),
            None => write!(f, "{}", self.message),
        }
    }
}
