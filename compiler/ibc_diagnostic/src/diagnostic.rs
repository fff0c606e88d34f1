//! Core diagnostic types for structured issue reporting.
//!
//! Defines [`Diagnostic`], [`Severity`], and [`Suggestion`], the building
//! blocks every phase uses to report errors and warnings.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ErrorCode;

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A "did you mean" candidate, with its description when one is known.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct Suggestion {
    pub candidate: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Suggestion {
    pub fn new(candidate: impl Into<String>) -> Self {
        Suggestion {
            candidate: candidate.into(),
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: Option<impl Into<String>>) -> Self {
        self.description = description.map(Into::into);
        self
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.description {
            Some(desc) => write!(f, "`{}` ({})", self.candidate, desc),
            None => write!(f, "`{}`", self.candidate),
        }
    }
}

/// One recorded issue.
///
/// Carries the three fields every issue sink receives (message, line
/// number, line content) plus a code, a severity and optional suggestions.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[must_use = "diagnostics should be recorded or returned, not silently dropped"]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    /// 1-based source line; 0 when the issue has no single line.
    pub line_num: u32,
    pub line_content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Suggestion>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl Diagnostic {
    fn new_with_severity(code: ErrorCode, severity: Severity) -> Self {
        Diagnostic {
            code,
            severity,
            message: String::new(),
            line_num: 0,
            line_content: String::new(),
            suggestions: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Create a new error diagnostic.
    #[cold]
    pub fn error(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Error)
    }

    /// Create a new warning diagnostic.
    #[cold]
    pub fn warning(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Warning)
    }

    /// Set the main message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Set the source line this issue points at.
    pub fn at_line(mut self, line_num: u32, line_content: impl Into<String>) -> Self {
        self.line_num = line_num;
        self.line_content = line_content.into();
        self
    }

    /// Add a note providing additional context.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Attach ranked suggestions.
    pub fn with_suggestions(mut self, suggestions: Vec<Suggestion>) -> Self {
        self.suggestions = suggestions;
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }

    /// Message followed by the suggestion list, the form handed to
    /// string-only consumers.
    pub fn full_message(&self) -> String {
        if self.suggestions.is_empty() {
            return self.message.clone();
        }
        let list: Vec<String> = self.suggestions.iter().map(ToString::to_string).collect();
        format!("{}; did you mean: {}?", self.message, list.join(", "))
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} [{}]: {}", self.severity, self.code, self.message)?;
        if self.line_num > 0 {
            writeln!(f, "  --> line {}", self.line_num)?;
            if !self.line_content.is_empty() {
                writeln!(f, "   | {}", self.line_content)?;
            }
        }
        for note in &self.notes {
            writeln!(f, "   = note: {note}")?;
        }
        if !self.suggestions.is_empty() {
            let list: Vec<String> = self.suggestions.iter().map(ToString::to_string).collect();
            writeln!(f, "   = help: did you mean {}?", list.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
