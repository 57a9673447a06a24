//! The combinator algebra.
//!
//! A [`Parser`] turns the text under a [`Cursor`] into a value, consuming
//! input as it goes. Combinators never rewind on their own: on failure the
//! cursor is left wherever the failing parser stopped. [`maybe`] is the one
//! backtracking primitive, and everything that needs to try an alternative is
//! built from it.

use alloc::{borrow::Cow, boxed::Box, format, sync::Arc};
use core::marker::PhantomData;

use crate::{
    cursor::Cursor,
    error::{ParseError, ParseFailure},
};

/// Something that parses a `T` from a [`Cursor`].
///
/// Implementations must not keep any cursor state between calls, which makes
/// a parser safe to reuse across inputs and threads.
pub trait Parser<T> {
    fn parse(&self, cursor: &mut Cursor<'_>) -> Result<T, ParseFailure>;

    /// Runs the parser over `text` from its first character and renders any
    /// failure against that text.
    ///
    /// Input remaining after a successful parse is not an error; wrap the
    /// parser in [`complete`](crate::grammar::complete) to require that.
    fn parse_str(&self, text: &str) -> Result<T, ParseError> {
        let mut cursor = Cursor::new(text);
        self.parse(&mut cursor).map_err(|failure| failure.render(text))
    }

    fn map<U, F>(self, f: F) -> Map<Self, F, T>
    where
        Self: Sized,
        F: Fn(T) -> U,
    {
        map(self, f)
    }

    fn and_then<U, F, M>(self, f: F) -> AndThen<Self, F, T>
    where
        Self: Sized,
        F: Fn(T) -> Result<U, M>,
        M: Into<Cow<'static, str>>,
    {
        and_then(self, f)
    }

    fn maybe(self) -> Maybe<Self>
    where
        Self: Sized,
    {
        maybe(self)
    }

    fn or<Q>(self, other: Q) -> Or<Self, Q>
    where
        Self: Sized,
        Q: Parser<T>,
    {
        or(self, other)
    }

    fn boxed<'a>(self) -> BoxedParser<'a, T>
    where
        Self: Sized + Send + Sync + 'a,
    {
        Box::new(self)
    }
}

/// A type-erased parser, as stored in field dispatch tables.
pub type BoxedParser<'a, T> = Box<dyn Parser<T> + Send + Sync + 'a>;

impl<T, P: Parser<T> + ?Sized> Parser<T> for &P {
    #[inline]
    fn parse(&self, cursor: &mut Cursor<'_>) -> Result<T, ParseFailure> {
        (**self).parse(cursor)
    }
}

impl<T, P: Parser<T> + ?Sized> Parser<T> for Box<P> {
    #[inline]
    fn parse(&self, cursor: &mut Cursor<'_>) -> Result<T, ParseFailure> {
        (**self).parse(cursor)
    }
}

impl<T, P: Parser<T> + ?Sized> Parser<T> for Arc<P> {
    #[inline]
    fn parse(&self, cursor: &mut Cursor<'_>) -> Result<T, ParseFailure> {
        (**self).parse(cursor)
    }
}

/// A parser backed by a plain function or closure.
#[derive(Clone, Copy)]
pub struct FromFn<F>(F);

/// Lifts a function over a cursor into a [`Parser`].
pub fn from_fn<T, F>(f: F) -> FromFn<F>
where
    F: Fn(&mut Cursor<'_>) -> Result<T, ParseFailure>,
{
    FromFn(f)
}

impl<T, F> Parser<T> for FromFn<F>
where
    F: Fn(&mut Cursor<'_>) -> Result<T, ParseFailure>,
{
    #[inline]
    fn parse(&self, cursor: &mut Cursor<'_>) -> Result<T, ParseFailure> {
        (self.0)(cursor)
    }
}

/// See [`maybe`].
#[derive(Clone, Copy, Debug)]
pub struct Maybe<P>(P);

/// Runs `parser`, rewinding to where it started if it fails.
///
/// The failure itself is still returned; no partial consumption survives it.
pub fn maybe<P>(parser: P) -> Maybe<P> {
    Maybe(parser)
}

impl<T, P: Parser<T>> Parser<T> for Maybe<P> {
    fn parse(&self, cursor: &mut Cursor<'_>) -> Result<T, ParseFailure> {
        let start = cursor.mark();
        let result = self.0.parse(cursor);
        if result.is_err() {
            tracing::trace!(offset = start.offset(), "rewinding after failed attempt");
            cursor.rewind(start);
        }
        result
    }
}

/// See [`or`].
#[derive(Clone, Copy, Debug)]
pub struct Or<P, Q>(Maybe<P>, Q);

/// Tries `first`; when it fails, rewinds and runs `second` from the same
/// position.
pub fn or<P, Q>(first: P, second: Q) -> Or<P, Q> {
    Or(maybe(first), second)
}

impl<T, P: Parser<T>, Q: Parser<T>> Parser<T> for Or<P, Q> {
    fn parse(&self, cursor: &mut Cursor<'_>) -> Result<T, ParseFailure> {
        self.0.parse(cursor).or_else(|_| self.1.parse(cursor))
    }
}

/// Skips whitespace, then runs `parser`.
pub fn whitespace<T, P: Parser<T>>(parser: P) -> impl Parser<T> {
    from_fn(move |cursor| {
        cursor.skip_whitespace();
        parser.parse(cursor)
    })
}

/// Runs `prefix` and discards its value, then runs `parser`.
pub fn preceded<A, T, P, Q>(prefix: P, parser: Q) -> impl Parser<T>
where
    P: Parser<A>,
    Q: Parser<T>,
{
    from_fn(move |cursor| {
        prefix.parse(cursor)?;
        parser.parse(cursor)
    })
}

/// Skips whitespace and consumes `expected`.
pub fn expect_char(expected: char) -> impl Parser<char> {
    from_fn(move |cursor| {
        cursor.skip_whitespace();
        if cursor.current() == Some(expected) {
            cursor.advance();
            Ok(expected)
        } else {
            Err(cursor.fail_here(format!("Expected to find '{expected}'")))
        }
    })
}

/// Consumes the literal `expected`, character by character, from the current
/// position.
pub fn expect(expected: &'static str) -> impl Parser<&'static str> {
    from_fn(move |cursor| {
        let start = cursor.mark();
        for ch in expected.chars() {
            match cursor.current() {
                None => return Err(cursor.fail(start, "Unexpectedly reached end of stream.")),
                Some(found) if found != ch => {
                    return Err(cursor.fail(start, format!("Expected to find '{expected}'")));
                }
                Some(_) => {
                    cursor.advance();
                }
            }
        }
        Ok(expected)
    })
}

/// Parses `inner` between `start` and `end`.
///
/// When `end` directly follows `start`, `inner` is never run and `default`
/// supplies the value instead, so `inner` need not accept an empty body.
pub fn between<A, B, T, S, P, E, D>(start: S, inner: P, end: E, default: D) -> impl Parser<T>
where
    S: Parser<A>,
    P: Parser<T>,
    E: Parser<B>,
    D: Fn() -> T,
{
    from_fn(move |cursor| {
        start.parse(cursor)?;
        if maybe(&end).parse(cursor).is_ok() {
            return Ok(default());
        }
        let value = inner.parse(cursor)?;
        end.parse(cursor)?;
        Ok(value)
    })
}

/// See [`map`].
pub struct Map<P, F, T> {
    parser: P,
    f: F,
    _input: PhantomData<fn() -> T>,
}

/// Transforms a successful result through `f`; failures pass through.
pub fn map<T, U, P, F>(parser: P, f: F) -> Map<P, F, T>
where
    P: Parser<T>,
    F: Fn(T) -> U,
{
    Map {
        parser,
        f,
        _input: PhantomData,
    }
}

impl<T, U, P, F> Parser<U> for Map<P, F, T>
where
    P: Parser<T>,
    F: Fn(T) -> U,
{
    #[inline]
    fn parse(&self, cursor: &mut Cursor<'_>) -> Result<U, ParseFailure> {
        self.parser.parse(cursor).map(&self.f)
    }
}

/// See [`and_then`].
pub struct AndThen<P, F, T> {
    parser: P,
    f: F,
    _input: PhantomData<fn() -> T>,
}

/// Transforms a successful result through the fallible `f`.
///
/// An error from `f` becomes a failure spanning everything `parser` consumed.
pub fn and_then<T, U, M, P, F>(parser: P, f: F) -> AndThen<P, F, T>
where
    P: Parser<T>,
    F: Fn(T) -> Result<U, M>,
    M: Into<Cow<'static, str>>,
{
    AndThen {
        parser,
        f,
        _input: PhantomData,
    }
}

impl<T, U, M, P, F> Parser<U> for AndThen<P, F, T>
where
    P: Parser<T>,
    F: Fn(T) -> Result<U, M>,
    M: Into<Cow<'static, str>>,
{
    fn parse(&self, cursor: &mut Cursor<'_>) -> Result<U, ParseFailure> {
        let start = cursor.mark();
        let value = self.parser.parse(cursor)?;
        (self.f)(value).map_err(|message| cursor.fail(start, message))
    }
}

/// A parser that consumes nothing and always fails with `message`.
pub fn fail<T>(message: impl Into<Cow<'static, str>>) -> impl Parser<T> {
    let message: Cow<'static, str> = message.into();
    from_fn::<T, _>(move |cursor| Err(cursor.fail_here(message.clone())))
}
