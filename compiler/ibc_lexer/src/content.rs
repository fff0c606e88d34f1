//! Tokenization of one logical line's content.

use ibc_ir::{Token, TokenKind};
use logos::Logos;

use crate::{LexError, LexErrorKind, LexWarning};

/// Words recognized as a leading keyword.
pub const KEYWORDS: [&str; 5] = ["module", "func", "class", "var", "description"];

/// Delimiter around symbol references.
pub const REF_DELIMITER: u8 = b'$';

/// Raw token from logos for the text between references.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
enum RawToken {
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[regex(r"[^(),:]+")]
    Text,
}

/// Split a leading keyword off `text`.
///
/// The keyword must be followed by whitespace, a colon, or nothing.
fn split_keyword(text: &str) -> Option<(&'static str, &str)> {
    KEYWORDS.iter().find_map(|&kw| {
        let rest = text.strip_prefix(kw)?;
        let delimited = rest.is_empty()
            || rest.starts_with(':')
            || rest.chars().next().is_some_and(char::is_whitespace);
        delimited.then_some((kw, rest))
    })
}

/// Tokenize a span outside `$` pairs.
fn push_plain(span: &str, line: u32, out: &mut Vec<Token>) {
    let mut lexer = RawToken::lexer(span);
    while let Some(result) = lexer.next() {
        let slice = lexer.slice();
        let kind = match result {
            Ok(RawToken::LParen) => TokenKind::LParen,
            Ok(RawToken::RParen) => TokenKind::RParen,
            Ok(RawToken::Comma) => TokenKind::Comma,
            Ok(RawToken::Colon) => TokenKind::Colon,
            Ok(RawToken::Text) | Err(()) => {
                let trimmed = slice.trim();
                if !trimmed.is_empty() {
                    out.push(Token::new(TokenKind::Identifier, trimmed, line));
                }
                continue;
            }
        };
        out.push(Token::bare(kind, line));
    }
}

/// Tokenize a logical line's content into `out`.
///
/// Returns an error for an odd number of `$` delimiters. Blank references
/// are dropped with a warning.
pub fn tokenize_content(
    text: &str,
    line: u32,
    raw: &str,
    out: &mut Vec<Token>,
    warnings: &mut Vec<LexWarning>,
) -> Result<(), LexError> {
    if let Some(comment) = text.strip_prefix('@') {
        out.push(Token::new(TokenKind::IntentComment, comment.trim(), line));
        return Ok(());
    }

    let mut rest = text;
    if let Some((keyword, after)) = split_keyword(text) {
        out.push(Token::new(TokenKind::Keyword, keyword, line));
        rest = after;
    }

    let count = memchr::memchr_iter(REF_DELIMITER, rest.as_bytes()).count();
    if count % 2 != 0 {
        return Err(LexError::new(
            LexErrorKind::UnpairedDollar { count },
            line,
            raw,
        ));
    }

    for (index, span) in rest.split(char::from(REF_DELIMITER)).enumerate() {
        if index % 2 == 0 {
            push_plain(span, line, out);
            continue;
        }
        let reference = span.trim();
        if reference.is_empty() {
            warnings.push(LexWarning::empty_reference(line, raw));
        } else {
            out.push(Token::new(TokenKind::RefIdentifier, reference, line));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

    use super::*;
    use pretty_assertions::assert_eq;

    fn lex(text: &str) -> Vec<(TokenKind, String)> {
        let mut out = Vec::new();
        let mut warnings = Vec::new();
        tokenize_content(text, 1, text, &mut out, &mut warnings).unwrap();
        out.into_iter().map(|t| (t.kind, t.text)).collect()
    }

    fn kw(s: &str) -> (TokenKind, String) {
        (TokenKind::Keyword, s.to_string())
    }

    fn id(s: &str) -> (TokenKind, String) {
        (TokenKind::Identifier, s.to_string())
    }

    fn rf(s: &str) -> (TokenKind, String) {
        (TokenKind::RefIdentifier, s.to_string())
    }

    fn p(kind: TokenKind) -> (TokenKind, String) {
        (kind, kind.punct_text().unwrap_or_default().to_string())
    }

    #[test]
    fn test_keyword_with_whitespace() {
        assert_eq!(lex("class Ball:"), vec![kw("class"), id("Ball"), p(TokenKind::Colon)]);
    }

    #[test]
    fn test_keyword_followed_by_colon() {
        assert_eq!(
            lex("description: 一个小球"),
            vec![kw("description"), p(TokenKind::Colon), id("一个小球")]
        );
    }

    #[test]
    fn test_keyword_prefix_is_plain_text() {
        assert_eq!(lex("variable x"), vec![id("variable x")]);
        assert_eq!(lex("classify items"), vec![id("classify items")]);
    }

    #[test]
    fn test_keyword_not_leading_is_text() {
        assert_eq!(lex("返回 class 对象"), vec![id("返回 class 对象")]);
    }

    #[test]
    fn test_function_signature() {
        assert_eq!(
            lex("func move(dx: 横向位移, dy)"),
            vec![
                kw("func"),
                id("move"),
                p(TokenKind::LParen),
                id("dx"),
                p(TokenKind::Colon),
                id("横向位移"),
                p(TokenKind::Comma),
                id("dy"),
                p(TokenKind::RParen),
            ]
        );
    }

    #[test]
    fn test_references_split_out() {
        assert_eq!(
            lex("调用 $ball.Ball.move$ 更新位置"),
            vec![id("调用"), rf("ball.Ball.move"), id("更新位置")]
        );
    }

    #[test]
    fn test_reference_keeps_punctuation() {
        assert_eq!(lex("$numpy.array(x, y)$"), vec![rf("numpy.array(x, y)")]);
    }

    #[test]
    fn test_intent_comment_verbatim() {
        assert_eq!(
            lex("@ 注意: $x$ (不解析)"),
            vec![(TokenKind::IntentComment, "注意: $x$ (不解析)".to_string())]
        );
    }

    #[test]
    fn test_unpaired_dollar_is_error() {
        let mut out = Vec::new();
        let mut warnings = Vec::new();
        let err = tokenize_content("a $b$ $c", 3, "a $b$ $c", &mut out, &mut warnings)
            .unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnpairedDollar { count: 3 });
        assert_eq!(err.line, 3);
    }

    #[test]
    fn test_blank_reference_warns_and_drops() {
        let mut out = Vec::new();
        let mut warnings = Vec::new();
        tokenize_content("a $ $ b", 1, "a $ $ b", &mut out, &mut warnings).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(warnings.len(), 1);
    }
}
