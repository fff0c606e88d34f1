//! Lexer errors and warnings.
//!
//! Errors abort the whole file: once indentation or `$` pairing is broken the
//! token stream cannot be trusted downstream. Warnings are returned beside a
//! successful token list.

use ibc_diagnostic::{Diagnostic, ErrorCode};

/// A fatal lexer error with its source line.
#[derive(Clone, Debug, Eq, PartialEq, Hash, thiserror::Error)]
#[error("line {line}: {kind}")]
pub struct LexError {
    pub kind: LexErrorKind,
    /// 1-based physical line.
    pub line: u32,
    /// Text of the offending physical line.
    pub line_content: String,
}

/// What went wrong.
#[derive(Clone, Debug, Eq, PartialEq, Hash, thiserror::Error)]
pub enum LexErrorKind {
    #[error("tab used in indentation")]
    TabIndentation,
    #[error("indentation of {width} columns is not a multiple of {unit}")]
    IndentNotMultiple { width: usize, unit: usize },
    #[error("indentation jumped from level {from} to level {to}")]
    IndentJump { from: usize, to: usize },
    #[error("dedent to {width} columns does not match any enclosing block")]
    InconsistentDedent { width: usize },
    #[error("unpaired `$`: found {count} delimiters")]
    UnpairedDollar { count: usize },
    #[error("backslash continuation line cannot end with colon")]
    BackslashColon,
    #[error("backslash continuation at end of file")]
    BackslashAtEof,
}

impl LexErrorKind {
    pub fn code(&self) -> ErrorCode {
        match self {
            LexErrorKind::TabIndentation => ErrorCode::E0001,
            LexErrorKind::IndentNotMultiple { .. } => ErrorCode::E0002,
            LexErrorKind::IndentJump { .. } => ErrorCode::E0003,
            LexErrorKind::InconsistentDedent { .. } => ErrorCode::E0004,
            LexErrorKind::UnpairedDollar { .. } => ErrorCode::E0005,
            LexErrorKind::BackslashColon => ErrorCode::E0006,
            LexErrorKind::BackslashAtEof => ErrorCode::E0008,
        }
    }
}

impl LexError {
    pub(crate) fn new(kind: LexErrorKind, line: u32, line_content: &str) -> Self {
        LexError {
            kind,
            line,
            line_content: line_content.to_string(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.kind.code()
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code())
            .with_message(self.kind.to_string())
            .at_line(self.line, self.line_content.clone())
    }
}

/// A non-fatal lexer finding.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct LexWarning {
    pub code: ErrorCode,
    pub message: String,
    pub line: u32,
    pub line_content: String,
}

impl LexWarning {
    pub(crate) fn empty_reference(line: u32, line_content: &str) -> Self {
        LexWarning {
            code: ErrorCode::E0007,
            message: "empty `$$` reference ignored".to_string(),
            line,
            line_content: line_content.to_string(),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::warning(self.code)
            .with_message(self.message.clone())
            .at_line(self.line, self.line_content.clone())
    }
}
