//! Objects with heterogeneous members.
//!
//! Each member value is parsed by a parser chosen from its key, boxed as a
//! [`FieldValue`], and collected into [`Fields`]. A constructor function then
//! takes the typed values back out:
//!
//! ```
//! use jsonparsec::{grammar, grammar::FieldTable, Parser};
//!
//! #[derive(Debug, PartialEq)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//!     label: Option<String>,
//! }
//!
//! let fields = FieldTable::new()
//!     .field("x", grammar::i32())
//!     .field("y", grammar::i32())
//!     .field("label", grammar::string())
//!     .reject_unknown();
//! let parser = grammar::object(fields, |mut fields| {
//!     Ok::<_, String>(Point {
//!         x: fields.require("x")?,
//!         y: fields.require("y")?,
//!         label: fields.take("label"),
//!     })
//! });
//!
//! let point = parser.parse_str(r#"{"y": 2, "x": 1}"#).unwrap();
//! assert_eq!(point, Point { x: 1, y: 2, label: None });
//!
//! let err = parser.parse_str(r#"{"x": 1, "z": 3}"#).unwrap_err();
//! assert_eq!(err.message, "Unknown field 'z'");
//! ```

use alloc::{borrow::Cow, boxed::Box, format, string::String, vec::Vec};
use core::{any::Any, fmt};

use indexmap::IndexMap;

use super::{any, parse_entries, unknown_field};
use crate::{
    cursor::Cursor,
    error::ParseFailure,
    parsec::{BoxedParser, Parser, between, expect_char, from_fn},
};

/// A decoded member value of any type.
pub type FieldValue = Box<dyn Any + Send>;

/// Wraps `parser` so its results can be stored in [`Fields`].
pub fn field<T, P>(parser: P) -> impl Parser<FieldValue>
where
    T: Any + Send,
    P: Parser<T>,
{
    parser.map(|value| Box::new(value) as FieldValue)
}

/// The members of one parsed object, in input order.
///
/// A repeated key keeps its first position and its last value.
#[derive(Default)]
pub struct Fields {
    values: IndexMap<String, FieldValue>,
}

impl Fields {
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn insert<T: Any + Send>(&mut self, name: impl Into<String>, value: T) {
        self.values.insert(name.into(), Box::new(value));
    }

    /// Borrows the value of `name` if it is present and a `T`.
    #[must_use]
    pub fn get<T: Any>(&self, name: &str) -> Option<&T> {
        self.values.get(name)?.downcast_ref()
    }

    /// Removes and returns the value of `name` if it is present and a `T`.
    ///
    /// A value of another type is left in place.
    pub fn take<T: Any>(&mut self, name: &str) -> Option<T> {
        if !self.values.get(name)?.is::<T>() {
            return None;
        }
        let value = self.values.shift_remove(name)?;
        value.downcast().ok().map(|value| *value)
    }

    /// Like [`take`](Self::take), but a missing or mistyped member is an
    /// error message suitable for returning from an object constructor.
    pub fn require<T: Any>(&mut self, name: &str) -> Result<T, String> {
        if !self.contains(name) {
            return Err(format!("Missing field '{name}'"));
        }
        self.take(name)
            .ok_or_else(|| format!("Field '{name}' has an unexpected type"))
    }
}

impl fmt::Debug for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

/// Chooses how to parse the value of each object member.
///
/// Implemented by [`FieldTable`] and by closures from the member name to a
/// parser:
///
/// ```
/// use jsonparsec::{grammar, grammar::field, Parser};
///
/// let parser = grammar::object_as_map(|name: &str| match name {
///     "id" => field(grammar::i64()).boxed(),
///     _ => field(grammar::any()).boxed(),
/// });
/// let mut fields = parser.parse_str(r#"{"id": 7, "tags": []}"#).unwrap();
/// assert_eq!(fields.take::<i64>("id"), Some(7));
/// ```
pub trait FieldDispatch {
    fn parse_field(&self, name: &str, cursor: &mut Cursor<'_>) -> Result<FieldValue, ParseFailure>;
}

impl<F, P> FieldDispatch for F
where
    F: Fn(&str) -> P,
    P: Parser<FieldValue>,
{
    fn parse_field(&self, name: &str, cursor: &mut Cursor<'_>) -> Result<FieldValue, ParseFailure> {
        self(name).parse(cursor)
    }
}

/// What a [`FieldTable`] does with a member it has no entry for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownFields {
    /// Parse the value with [`any`] and keep it as a
    /// [`Value`](crate::Value), which the constructor is free to ignore.
    #[default]
    Ignore,
    /// Fail with `Unknown field '<name>'`.
    Reject,
}

/// An ordered table of member parsers.
#[derive(Default)]
pub struct FieldTable {
    fields: Vec<(&'static str, BoxedParser<'static, FieldValue>)>,
    unknown: UnknownFields,
}

impl FieldTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a member. A name added twice uses its first parser.
    #[must_use]
    pub fn field<T, P>(mut self, name: &'static str, parser: P) -> Self
    where
        T: Any + Send,
        P: Parser<T> + Send + Sync + 'static,
    {
        self.fields.push((name, field(parser).boxed()));
        self
    }

    #[must_use]
    pub fn unknown_fields(mut self, policy: UnknownFields) -> Self {
        self.unknown = policy;
        self
    }

    /// Shorthand for `unknown_fields(UnknownFields::Reject)`.
    #[must_use]
    pub fn reject_unknown(self) -> Self {
        self.unknown_fields(UnknownFields::Reject)
    }
}

impl FieldDispatch for FieldTable {
    fn parse_field(&self, name: &str, cursor: &mut Cursor<'_>) -> Result<FieldValue, ParseFailure> {
        match self.fields.iter().find(|(known, _)| *known == name) {
            Some((_, parser)) => parser.parse(cursor),
            None => match self.unknown {
                UnknownFields::Ignore => field(any()).parse(cursor),
                UnknownFields::Reject => unknown_field(name).parse(cursor),
            },
        }
    }
}

/// Lets one table, typically held in a static, serve many parsers.
impl FieldDispatch for &FieldTable {
    fn parse_field(&self, name: &str, cursor: &mut Cursor<'_>) -> Result<FieldValue, ParseFailure> {
        (**self).parse_field(name, cursor)
    }
}

impl fmt::Debug for FieldTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldTable")
            .field("fields", &self.fields.iter().map(|(name, _)| name).collect::<Vec<_>>())
            .field("unknown", &self.unknown)
            .finish()
    }
}

/// Parses an object, choosing each member's parser through `dispatch`, and
/// returns the collected [`Fields`].
pub fn object_as_map<D: FieldDispatch>(dispatch: D) -> impl Parser<Fields> {
    let entries = from_fn(move |cursor| {
        let mut fields = Fields::default();
        parse_entries(
            cursor,
            &|name: String| Ok::<_, Cow<'static, str>>(name),
            |cursor, name| {
                let value = dispatch.parse_field(&name, cursor)?;
                fields.values.insert(name, value);
                Ok(())
            },
        )?;
        Ok(fields)
    });
    between(expect_char('{'), entries, expect_char('}'), Fields::default)
}

/// Parses an object like [`object_as_map`] and hands the fields to `build`.
///
/// An error from `build` is reported at the opening brace and spans the
/// object up to the end of its first line.
pub fn object<T, D, B, E>(dispatch: D, build: B) -> impl Parser<T>
where
    D: FieldDispatch,
    B: Fn(Fields) -> Result<T, E>,
    E: Into<Cow<'static, str>>,
{
    let fields = object_as_map(dispatch);
    from_fn(move |cursor| {
        cursor.skip_whitespace();
        let start = cursor.mark();
        let parsed = fields.parse(cursor)?;
        build(parsed).map_err(|message| cursor.fail(start, message))
    })
}
