//! Token cursor for line-oriented navigation.

use ibc_ir::{Token, TokenKind};

/// Cursor over a token slice that ends with EOF.
pub struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Callers must ensure the last token is EOF.
    pub fn new(tokens: &'a [Token]) -> Self {
        Cursor { tokens, pos: 0 }
    }

    /// Invariant: `pos` never passes the trailing EOF.
    #[inline]
    pub fn current(&self) -> &'a Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    #[inline]
    pub fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.current_kind() == TokenKind::Eof
    }

    /// Consume the current token. Stays put at EOF.
    pub fn advance(&mut self) -> &'a Token {
        let token = self.current();
        if !self.is_at_end() {
            self.pos += 1;
        }
        token
    }

    /// Content tokens up to the next NEWLINE, without consuming them.
    pub fn peek_line(&self) -> &'a [Token] {
        let rest = &self.tokens[self.pos.min(self.tokens.len())..];
        let start = rest
            .iter()
            .position(|t| !matches!(t.kind, TokenKind::Indent | TokenKind::Dedent))
            .unwrap_or(rest.len());
        let rest = &rest[start..];
        let end = rest
            .iter()
            .position(|t| t.kind.is_layout())
            .unwrap_or(rest.len());
        &rest[..end]
    }

    /// Consume content tokens through the NEWLINE that ends the line.
    ///
    /// Returns the content tokens, or `None` if a layout token other than
    /// NEWLINE interrupts the line.
    pub fn take_line(&mut self) -> Option<&'a [Token]> {
        let start = self.pos;
        while !self.current_kind().is_layout() {
            self.pos += 1;
        }
        let line = &self.tokens[start..self.pos];
        match self.current_kind() {
            TokenKind::Newline => {
                self.pos += 1;
                Some(line)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(kind: TokenKind, text: &str) -> Token {
        Token::new(kind, text, 1)
    }

    #[test]
    fn test_take_line_consumes_newline() {
        let tokens = vec![
            tok(TokenKind::Identifier, "a"),
            tok(TokenKind::Colon, ":"),
            tok(TokenKind::Newline, ""),
            tok(TokenKind::Eof, ""),
        ];
        let mut cursor = Cursor::new(&tokens);
        let line = cursor.take_line();
        assert_eq!(line.map(<[Token]>::len), Some(2));
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_take_line_rejects_layout_mid_line() {
        let tokens = vec![
            tok(TokenKind::Identifier, "a"),
            tok(TokenKind::Indent, ""),
            tok(TokenKind::Eof, ""),
        ];
        let mut cursor = Cursor::new(&tokens);
        assert!(cursor.take_line().is_none());
    }

    #[test]
    fn test_peek_line_skips_leading_layout() {
        let tokens = vec![
            tok(TokenKind::Indent, ""),
            tok(TokenKind::Identifier, "b"),
            tok(TokenKind::Newline, ""),
            tok(TokenKind::Eof, ""),
        ];
        let cursor = Cursor::new(&tokens);
        assert_eq!(cursor.peek_line().len(), 1);
        assert_eq!(cursor.peek_line()[0].text, "b");
    }

    #[test]
    fn test_advance_stops_at_eof() {
        let tokens = vec![tok(TokenKind::Eof, "")];
        let mut cursor = Cursor::new(&tokens);
        cursor.advance();
        cursor.advance();
        assert!(cursor.is_at_end());
    }
}
