//! Parse errors and structural diagnostics.
//!
//! Only a corrupted token stream is fatal ([`ParseError`]). Every other
//! problem is a per-line [`Diagnostic`]: the offending line is dropped (or
//! kept, for duplicate names and empty blocks) and parsing continues.

use ibc_diagnostic::{Diagnostic, ErrorCode};
use ibc_ir::{NodeType, NodeTypeSet};

/// Fatal parser error.
#[derive(Clone, Debug, Eq, PartialEq, Hash, thiserror::Error)]
pub enum ParseError {
    #[error("token stream does not end with EOF")]
    MissingEof,
    #[error("line {line}: corrupted token stream: {detail}")]
    Corrupted { line: u32, detail: &'static str },
}

impl ParseError {
    pub fn code(&self) -> ErrorCode {
        ErrorCode::E1008
    }

    pub fn line(&self) -> u32 {
        match self {
            ParseError::MissingEof => 0,
            ParseError::Corrupted { line, .. } => *line,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code())
            .with_message(self.to_string())
            .at_line(self.line(), "")
    }
}

/// Which annotation a line carried.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum AnnotationKind {
    Description,
    Intent,
}

impl AnnotationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AnnotationKind::Description => "description",
            AnnotationKind::Intent => "intent comment",
        }
    }
}

fn scope_phrase(scope: NodeType) -> String {
    match scope {
        NodeType::Root => "at top level".to_string(),
        other => format!("inside a {other}"),
    }
}

#[cold]
pub(crate) fn not_allowed(
    found: NodeType,
    scope: NodeType,
    allowed: NodeTypeSet,
    line: u32,
    content: String,
) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1001)
        .with_message(format!(
            "{found} not allowed {}; expected {}",
            scope_phrase(scope),
            allowed.describe()
        ))
        .at_line(line, content)
}

#[cold]
pub(crate) fn module_after_declarations(line: u32, content: String) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1002)
        .with_message("module import after other declarations")
        .at_line(line, content)
        .with_note("all `module` lines must come before the first class, func or var")
}

#[cold]
pub(crate) fn malformed(message: String, line: u32, content: String) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1003)
        .with_message(message)
        .at_line(line, content)
}

#[cold]
pub(crate) fn unexpected_indent(line: u32, content: String) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1004)
        .with_message("unexpected indentation; the previous line does not open a block")
        .at_line(line, content)
        .with_note("the indented block was skipped")
}

#[cold]
pub(crate) fn expected_block(line: u32, content: String) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1005)
        .with_message("expected an indented block after `:`")
        .at_line(line, content)
}

#[cold]
pub(crate) fn detached_annotation(kind: AnnotationKind, line: u32, content: String) -> Diagnostic {
    Diagnostic::warning(ErrorCode::E1006)
        .with_message(format!(
            "{} is not attached to any declaration",
            kind.as_str()
        ))
        .at_line(line, content)
}

#[cold]
pub(crate) fn duplicate_name(what: &str, name: &str, line: u32, content: String) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1007)
        .with_message(format!("duplicate {what} `{name}`; the first one is kept"))
        .at_line(line, content)
}

/// Both declarations stay in the tree; later symbol metadata wins.
#[cold]
pub(crate) fn duplicate_declaration(
    what: &str,
    name: &str,
    line: u32,
    content: String,
) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1007)
        .with_message(format!("{what} `{name}` is already declared in this scope"))
        .at_line(line, content)
}
