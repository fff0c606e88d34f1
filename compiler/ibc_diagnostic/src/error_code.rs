//! Error codes for all front-end diagnostics.
//!
//! Each error code is a unique identifier (e.g., `E1001`) with the first digit
//! indicating the phase that produced it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error codes for all front-end diagnostics.
///
/// Format: E#### where first digit indicates phase:
/// - E0xxx: Lexer errors
/// - E1xxx: Parser (structural) errors
/// - E2xxx: Reference resolution and semantic errors
/// - E9xxx: Internal errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum ErrorCode {
    // Lexer Errors (E0xxx)
    /// Tab used in indentation
    E0001,
    /// Indentation is not a multiple of the indent unit
    E0002,
    /// Indentation jumped more than one level
    E0003,
    /// Dedent does not land on an enclosing level
    E0004,
    /// Odd number of `$` delimiters
    E0005,
    /// Backslash continuation line ends with a colon
    E0006,
    /// Empty `$$` reference (warning)
    E0007,
    /// Backslash continuation at end of file
    E0008,

    // Parser Errors (E1xxx)
    /// Node type not allowed at this position
    E1001,
    /// Module import after other declarations
    E1002,
    /// Malformed declaration line
    E1003,
    /// Unexpected indentation
    E1004,
    /// Expected an indented block
    E1005,
    /// Description or intent comment with nothing to attach to (warning)
    E1006,
    /// Duplicate parameter or base name
    E1007,
    /// Corrupted token stream
    E1008,

    // Resolution Errors (E2xxx)
    /// Reference has a single segment
    E2001,
    /// `self` reference outside a class
    E2002,
    /// `self` member not declared on the enclosing class
    E2003,
    /// Unknown module alias
    E2004,
    /// Symbol not found in module
    E2005,
    /// Class declares both constructor forms
    E2006,

    // Internal Errors (E9xxx)
    /// Internal front-end error
    E9001,
}

impl ErrorCode {
    /// Get the string representation (e.g., "E1001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            ErrorCode::E0005 => "E0005",
            ErrorCode::E0006 => "E0006",
            ErrorCode::E0007 => "E0007",
            ErrorCode::E0008 => "E0008",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E1007 => "E1007",
            ErrorCode::E1008 => "E1008",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E9001 => "E9001",
        }
    }

    /// Short description of the error class.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "tab used in indentation",
            ErrorCode::E0002 => "indentation is not a multiple of the indent unit",
            ErrorCode::E0003 => "indentation jumped more than one level",
            ErrorCode::E0004 => "inconsistent dedent",
            ErrorCode::E0005 => "unpaired `$` delimiter",
            ErrorCode::E0006 => "backslash continuation line cannot end with colon",
            ErrorCode::E0007 => "empty `$$` reference",
            ErrorCode::E0008 => "backslash continuation at end of file",
            ErrorCode::E1001 => "node not allowed here",
            ErrorCode::E1002 => "module import after declarations",
            ErrorCode::E1003 => "malformed declaration",
            ErrorCode::E1004 => "unexpected indentation",
            ErrorCode::E1005 => "expected an indented block",
            ErrorCode::E1006 => "detached description or intent comment",
            ErrorCode::E1007 => "duplicate name",
            ErrorCode::E1008 => "corrupted token stream",
            ErrorCode::E2001 => "single-segment reference",
            ErrorCode::E2002 => "`self` used outside a class",
            ErrorCode::E2003 => "unknown member of enclosing class",
            ErrorCode::E2004 => "unknown module",
            ErrorCode::E2005 => "symbol not found in module",
            ErrorCode::E2006 => "duplicate constructor",
            ErrorCode::E9001 => "internal error",
        }
    }

    pub fn is_lexer_error(&self) -> bool {
        self.as_str().starts_with("E0")
    }

    pub fn is_parser_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }

    pub fn is_resolve_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
