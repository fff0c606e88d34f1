//! Lexer for IBC source.
//!
//! Produces a [`TokenList`] with explicit layout tokens:
//!
//! ```text
//! class Ball:            KEYWORD IDENT COLON NEWLINE
//!     var x: 横坐标       INDENT KEYWORD IDENT COLON IDENT NEWLINE
//! func main              DEDENT KEYWORD IDENT NEWLINE
//!                        EOF
//! ```
//!
//! Lexing runs in two passes. [`line::logical_lines`] folds continuations and
//! drops blank/comment lines; then each logical line is checked against the
//! indentation stack and its content tokenized.

mod content;
mod lex_error;
pub mod line;

use ibc_ir::{Token, TokenKind, TokenList};

pub use content::KEYWORDS;
pub use lex_error::{LexError, LexErrorKind, LexWarning};
pub use line::{LogicalLine, COMMENT_MARKER};

/// Columns per indentation level.
pub const INDENT_UNIT: usize = 4;

/// Successful lexer output.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LexOutput {
    pub tokens: TokenList,
    pub warnings: Vec<LexWarning>,
}

/// Stack of open indentation widths, always starting at column 0.
struct IndentStack {
    widths: Vec<usize>,
}

impl IndentStack {
    fn new() -> Self {
        IndentStack { widths: vec![0] }
    }

    fn top(&self) -> usize {
        self.widths.last().copied().unwrap_or(0)
    }

    fn depth(&self) -> usize {
        self.widths.len() - 1
    }

    /// Move to `width`, pushing the needed layout tokens.
    fn adjust(&mut self, logical: &LogicalLine, out: &mut Vec<Token>) -> Result<(), LexError> {
        let width = logical.indent;
        let top = self.top();

        if width > top {
            if width % INDENT_UNIT != 0 {
                return Err(LexError::new(
                    LexErrorKind::IndentNotMultiple {
                        width,
                        unit: INDENT_UNIT,
                    },
                    logical.line,
                    &logical.raw,
                ));
            }
            if width - top != INDENT_UNIT {
                return Err(LexError::new(
                    LexErrorKind::IndentJump {
                        from: top / INDENT_UNIT,
                        to: width / INDENT_UNIT,
                    },
                    logical.line,
                    &logical.raw,
                ));
            }
            self.widths.push(width);
            out.push(Token::bare(TokenKind::Indent, logical.line));
        } else {
            while self.top() > width {
                self.widths.pop();
                out.push(Token::bare(TokenKind::Dedent, logical.line));
            }
            if self.top() != width {
                return Err(LexError::new(
                    LexErrorKind::InconsistentDedent { width },
                    logical.line,
                    &logical.raw,
                ));
            }
        }
        Ok(())
    }
}

/// Lex IBC source into tokens.
///
/// Never panics on malformed input; broken indentation, unpaired `$` and
/// illegal continuations come back as [`LexError`].
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn tokenize(source: &str) -> Result<LexOutput, LexError> {
    let lines = line::logical_lines(source)?;
    let mut stack = IndentStack::new();
    let mut tokens = Vec::new();
    let mut warnings = Vec::new();

    for logical in &lines {
        stack.adjust(logical, &mut tokens)?;
        tracing::trace!(
            line = logical.line,
            depth = stack.depth(),
            text = %logical.text,
            "logical line"
        );
        content::tokenize_content(
            &logical.text,
            logical.line,
            &logical.raw,
            &mut tokens,
            &mut warnings,
        )?;
        tokens.push(Token::bare(TokenKind::Newline, logical.line));
    }

    let end_line = u32::try_from(source.lines().count()).unwrap_or(u32::MAX);
    for _ in 0..stack.depth() {
        tokens.push(Token::bare(TokenKind::Dedent, end_line));
    }
    tokens.push(Token::bare(TokenKind::Eof, end_line));

    tracing::debug!(
        tokens = tokens.len(),
        warnings = warnings.len(),
        "lexed"
    );
    Ok(LexOutput {
        tokens: TokenList::from(tokens),
        warnings,
    })
}
