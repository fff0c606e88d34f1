//! Parser for IBC.
//!
//! Consumes the lexer's line-oriented token stream and builds an
//! [`AstTable`]. Structural problems (a node kind not allowed in its scope,
//! malformed declarations, indentation that disagrees with the grammar) are
//! reported as diagnostics and the offending line is dropped; parsing always
//! continues to EOF. Only a token stream that breaks the lexer's layout
//! guarantees is fatal.

mod cursor;
mod error;
pub mod grammar;
mod parser;

pub use cursor::Cursor;
pub use error::{AnnotationKind, ParseError};

use ibc_diagnostic::Diagnostic;
use ibc_ir::{AstTable, TokenKind, TokenList};

/// Parser output: the AST plus structural diagnostics in source order.
#[derive(Clone, Debug)]
pub struct ParseOutput {
    pub ast: AstTable,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutput {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Parse a token stream into an AST.
#[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
pub fn parse(tokens: &TokenList) -> Result<ParseOutput, ParseError> {
    let slice = tokens.as_slice();
    if slice.last().map(|t| t.kind) != Some(TokenKind::Eof) {
        return Err(ParseError::MissingEof);
    }

    let (ast, diagnostics) = parser::Parser::new(slice).run()?;
    tracing::debug!(
        nodes = ast.len(),
        diagnostics = diagnostics.len(),
        "parsed"
    );
    Ok(ParseOutput { ast, diagnostics })
}

#[cfg(test)]
mod tests;
