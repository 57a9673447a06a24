use alloc::{borrow::Cow, string::String};

use thiserror::Error;

/// A parse failure as produced by a [`Parser`](crate::Parser).
///
/// Holds raw offsets only, so that speculative failures inside
/// [`maybe`](crate::parsec::maybe) stay cheap. Call [`ParseFailure::render`]
/// with the parsed text to obtain a human readable [`ParseError`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} (at offset {mark})")]
pub struct ParseFailure {
    mark: usize,
    index: usize,
    message: Cow<'static, str>,
}

impl ParseFailure {
    pub(crate) fn new(mark: usize, index: usize, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            mark,
            index,
            message: message.into(),
        }
    }

    /// Byte offset the failure is anchored at.
    #[must_use]
    pub fn mark(&self) -> usize {
        self.mark
    }

    /// Byte offset the cursor had reached when the failure was raised.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Recomputes line, column and context for this failure against `text`.
    ///
    /// A mark sitting on a line break or at end-of-text is moved back one
    /// character (two for `\r\n`), so the caret stays on the line the reader
    /// was looking at.
    #[must_use]
    pub fn render(&self, text: &str) -> ParseError {
        let mark = self.mark.min(text.len());
        let at_break = mark == text.len() || text.as_bytes()[mark] == b'\n';
        let mut adjusted = mark;
        if at_break {
            let mut before = text[..mark].char_indices().rev().map(|(i, _)| i);
            adjusted = before.next().unwrap_or(0);
            // on the `\n` of a `\r\n`, step over the `\r` as well
            if mark < text.len() && text.as_bytes()[adjusted] == b'\r' {
                adjusted = before.next().unwrap_or(0);
            }
        }

        let mut line = 1;
        let mut column = 1;
        let mut line_start = 0;
        for (i, ch) in text[..adjusted].char_indices() {
            if ch == '\n' {
                line += 1;
                column = 1;
                line_start = i + 1;
            } else if !ends_line(text, i, ch) {
                column += 1;
            }
        }

        let mut line_end = text.len();
        let mut end_column = column;
        for (i, ch) in text[adjusted..].char_indices() {
            let at = adjusted + i;
            if ch == '\n' {
                line_end = at;
                break;
            }
            if at < self.index && !ends_line(text, at, ch) {
                end_column += 1;
            }
        }

        ParseError {
            line,
            column,
            end_column,
            context: String::from(text[line_start..line_end].trim_end_matches('\r')),
            message: String::from(self.message()),
        }
    }
}

/// A rendered parse diagnostic.
///
/// The `Display` form is stable and looks like:
///
/// ```text
/// Parse error at line 1, column 1: Expected to find 'string':
/// stri...not
/// ^--^
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "Parse error at line {line}, column {column}: {message}:\n{context}\n{}\n",
    caret_line(.column, .end_column)
)]
pub struct ParseError {
    /// 1-based line of the error anchor.
    pub line: usize,
    /// 1-based column (in characters) of the error anchor.
    pub column: usize,
    /// Column one past the last character covered by the error span.
    pub end_column: usize,
    /// The full text of the line containing the anchor.
    pub context: String,
    pub message: String,
}

/// A `\r` directly before `\n` belongs to the line break, not to the line.
fn ends_line(text: &str, at: usize, ch: char) -> bool {
    ch == '\r' && text.as_bytes().get(at + 1) == Some(&b'\n')
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn caret_line(column: &usize, end_column: &usize) -> String {
    let (column, end_column) = (*column, *end_column);
    let mut out = " ".repeat(column.saturating_sub(1));
    out.push('^');
    out.push_str(&"-".repeat(end_column.saturating_sub(column + 2)));
    if end_column > column {
        out.push('^');
    }
    out
}
