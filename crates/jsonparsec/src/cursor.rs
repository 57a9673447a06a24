//! Position tracking over the text being parsed.
//!
//! A [`Cursor`] borrows the input and carries a single byte offset. Parsers
//! move it forward with [`Cursor::advance`] and friends; only backtracking
//! combinators move it back, and only to a [`Mark`] they captured themselves.
//!
//! Offsets always sit on `char` boundaries. End-of-stream is reported by
//! [`Cursor::current`] returning `None`, which no input character can produce.

use alloc::borrow::Cow;

use crate::error::ParseFailure;

/// A mutable view over the input of one parse invocation.
#[derive(Debug, Clone)]
pub struct Cursor<'src> {
    text: &'src str,
    offset: usize,
}

/// A saved cursor offset, used for slicing, rewinding and anchoring errors.
///
/// Marks can only be produced by [`Cursor::mark`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Mark(usize);

impl Mark {
    /// Byte offset captured by this mark.
    #[must_use]
    pub fn offset(self) -> usize {
        self.0
    }
}

/// The four whitespace characters JSON allows between tokens.
#[inline]
#[must_use]
pub fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}

impl<'src> Cursor<'src> {
    #[must_use]
    pub fn new(text: &'src str) -> Self {
        Self { text, offset: 0 }
    }

    /// The full input text.
    #[must_use]
    pub fn text(&self) -> &'src str {
        self.text
    }

    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the character under the cursor, or `None` at end-of-stream.
    #[inline]
    #[must_use]
    pub fn current(&self) -> Option<char> {
        self.text[self.offset..].chars().next()
    }

    /// Moves forward one character and returns the new current character.
    ///
    /// Advancing at end-of-stream is a no-op.
    #[inline]
    pub fn advance(&mut self) -> Option<char> {
        if let Some(ch) = self.current() {
            self.offset += ch.len_utf8();
        }
        self.current()
    }

    #[inline]
    #[must_use]
    pub fn is_end_of_stream(&self) -> bool {
        self.offset == self.text.len()
    }

    /// Advances past a run of JSON whitespace of any length.
    pub fn skip_whitespace(&mut self) {
        let rest = &self.text[self.offset..];
        let trimmed = rest.trim_start_matches(is_whitespace);
        self.offset += rest.len() - trimmed.len();
    }

    #[inline]
    #[must_use]
    pub fn mark(&self) -> Mark {
        Mark(self.offset)
    }

    /// Resets the cursor to a previously captured mark.
    #[inline]
    pub fn rewind(&mut self, mark: Mark) {
        debug_assert!(mark.0 <= self.text.len());
        self.offset = mark.0;
    }

    /// Text between `from` and the current offset (exclusive of the current
    /// character).
    #[must_use]
    pub fn slice(&self, from: Mark) -> &'src str {
        &self.text[from.0..self.offset]
    }

    /// The unconsumed remainder of the input.
    #[must_use]
    pub fn rest(&self) -> &'src str {
        &self.text[self.offset..]
    }

    /// Builds a failure anchored at `from` and spanning to the current offset.
    pub fn fail(&self, from: Mark, message: impl Into<Cow<'static, str>>) -> ParseFailure {
        ParseFailure::new(from.0, self.offset, message)
    }

    /// Builds a failure anchored (and ending) at the current offset.
    pub fn fail_here(&self, message: impl Into<Cow<'static, str>>) -> ParseFailure {
        ParseFailure::new(self.offset, self.offset, message)
    }
}
