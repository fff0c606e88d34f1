//! Tokens produced by the lexer.
//!
//! IBC tokens are line-oriented: every logical line becomes a run of content
//! tokens terminated by [`TokenKind::Newline`], optionally preceded by
//! [`TokenKind::Indent`] or one or more [`TokenKind::Dedent`] tokens. The
//! stream always ends with [`TokenKind::Eof`].

use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

/// Token kinds.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum TokenKind {
    /// Leading `module`, `func`, `class`, `var` or `description`.
    Keyword,
    /// A maximal run of text not containing `(`, `)`, `,`, `:`.
    Identifier,
    /// Text between a pair of `$`.
    RefIdentifier,
    /// Whole-line `@` comment.
    IntentComment,
    LParen,
    RParen,
    Comma,
    Colon,
    Indent,
    Dedent,
    Newline,
    Eof,
}

impl TokenKind {
    /// Fixed source text of punctuation tokens.
    pub fn punct_text(self) -> Option<&'static str> {
        match self {
            TokenKind::LParen => Some("("),
            TokenKind::RParen => Some(")"),
            TokenKind::Comma => Some(","),
            TokenKind::Colon => Some(":"),
            _ => None,
        }
    }

    /// Layout tokens carry no source text.
    pub fn is_layout(self) -> bool {
        matches!(
            self,
            TokenKind::Indent | TokenKind::Dedent | TokenKind::Newline | TokenKind::Eof
        )
    }

    /// Human-readable name used in diagnostics.
    pub fn display_name(self) -> &'static str {
        match self {
            TokenKind::Keyword => "keyword",
            TokenKind::Identifier => "identifier",
            TokenKind::RefIdentifier => "`$` reference",
            TokenKind::IntentComment => "intent comment",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::Comma => "`,`",
            TokenKind::Colon => "`:`",
            TokenKind::Indent => "indent",
            TokenKind::Dedent => "dedent",
            TokenKind::Newline => "newline",
            TokenKind::Eof => "end of file",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A token with its text and 1-based source line.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line_number: u32,
}

impl Token {
    /// Create a token carrying text.
    pub fn new(kind: TokenKind, text: impl Into<String>, line_number: u32) -> Self {
        Token {
            kind,
            text: text.into(),
            line_number,
        }
    }

    /// Create a punctuation or layout token; its text is fixed by the kind.
    pub fn bare(kind: TokenKind, line_number: u32) -> Self {
        Token {
            kind,
            text: kind.punct_text().unwrap_or_default().to_string(),
            line_number,
        }
    }

    /// Identifiers, references and keywords read as words when rendered.
    fn is_word_like(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Identifier
                | TokenKind::RefIdentifier
                | TokenKind::Keyword
                | TokenKind::IntentComment
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::RefIdentifier => write!(f, "${}$", self.text),
            TokenKind::IntentComment => write!(f, "@ {}", self.text),
            _ => f.write_str(&self.text),
        }
    }
}

/// Render content tokens back to canonical text.
///
/// Spacing is normalized: nothing before `(`, `)`, `,`, `:`; nothing after
/// `(`; a single space everywhere else between two tokens. Lexing the result
/// again yields the same tokens, so the rendering is a fixed point.
pub fn render_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();
    let mut prev: Option<TokenKind> = None;

    for token in tokens.iter().filter(|t| !t.kind.is_layout()) {
        if let Some(prev_kind) = prev {
            if token.is_word_like() && prev_kind != TokenKind::LParen {
                out.push(' ');
            }
        }
        out.push_str(&token.to_string());
        prev = Some(token.kind);
    }

    out
}

/// Token stream for one file.
#[derive(Clone, Default, Eq, PartialEq, Debug)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Token kinds only; convenient for assertions.
    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|t| t.kind).collect()
    }

    pub fn into_vec(self) -> Vec<Token> {
        self.tokens
    }
}

impl Index<usize> for TokenList {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

impl From<Vec<Token>> for TokenList {
    fn from(tokens: Vec<Token>) -> Self {
        TokenList { tokens }
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
