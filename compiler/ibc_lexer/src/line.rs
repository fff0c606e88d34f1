//! Logical line assembly.
//!
//! Physical lines are folded into logical lines before any tokenization:
//! - blank lines and `//` comment lines are dropped
//! - a trailing `\` joins the next physical line
//! - a trailing `,` keeps joining lines until one does not end in `,`; a
//!   comma still dangling at end of input is dropped
//!
//! Joined text is separated by a single space. Only the first physical line
//! of a logical line contributes indentation and the line number.

use crate::{LexError, LexErrorKind};

/// Comment marker at the start of a line (after indentation).
pub const COMMENT_MARKER: &str = "//";

/// One logical line ready for indentation tracking and tokenization.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LogicalLine {
    /// 1-based number of the first physical line.
    pub line: u32,
    /// Leading indentation in columns.
    pub indent: usize,
    /// Content with indentation removed and continuations joined.
    pub text: String,
    /// The first physical line, verbatim.
    pub raw: String,
}

fn is_skipped(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with(COMMENT_MARKER)
}

fn line_number(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}

fn join(text: &mut String, next: &str) {
    if !text.is_empty() && !next.is_empty() {
        text.push(' ');
    }
    text.push_str(next);
}

/// Fold `source` into logical lines.
pub fn logical_lines(source: &str) -> Result<Vec<LogicalLine>, LexError> {
    let physical: Vec<&str> = source.lines().collect();
    let mut out = Vec::new();
    let mut i = 0;

    while i < physical.len() {
        let raw = physical[i];
        let line = line_number(i);
        i += 1;

        if is_skipped(raw) {
            continue;
        }

        let body = raw.trim_start_matches(' ');
        if body.starts_with('\t') {
            return Err(LexError::new(LexErrorKind::TabIndentation, line, raw));
        }
        let indent = raw.len() - body.len();
        let mut text = body.trim_end().to_string();

        // `@` lines are taken verbatim
        if !text.starts_with('@') {
            loop {
                if let Some(stripped) = text.strip_suffix('\\') {
                    text = stripped.trim_end().to_string();
                    let Some(next_raw) = physical.get(i) else {
                        return Err(LexError::new(LexErrorKind::BackslashAtEof, line, raw));
                    };
                    let next = next_raw.trim();
                    if next.ends_with(':') {
                        return Err(LexError::new(
                            LexErrorKind::BackslashColon,
                            line_number(i),
                            next_raw,
                        ));
                    }
                    i += 1;
                    join(&mut text, next);
                } else if text.ends_with(',') {
                    while physical.get(i).is_some_and(|l| is_skipped(l)) {
                        i += 1;
                    }
                    let Some(next_raw) = physical.get(i) else {
                        text.truncate(text.trim_end_matches([',', ' ']).len());
                        break;
                    };
                    i += 1;
                    join(&mut text, next_raw.trim());
                } else {
                    break;
                }
            }
        }

        if text.is_empty() {
            continue;
        }
        out.push(LogicalLine {
            line,
            indent,
            text,
            raw: raw.to_string(),
        });
    }

    Ok(out)
}
