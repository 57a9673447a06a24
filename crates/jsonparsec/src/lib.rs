//! JSON parsing and serialization built from small composable pieces.
//!
//! Parsing goes through [`Parser`]s: functions over a [`Cursor`] that are
//! combined in [`parsec`] and assembled into the JSON grammar in [`grammar`].
//! Serialization is the mirror image, a set of functions in [`ser`] that each
//! produce [`JsonText`] and take the serializers of their elements as
//! arguments. Failures carry the line, column and source line they happened
//! on:
//!
//! ```rust
//! use jsonparsec::{grammar, Parser};
//!
//! let parser = grammar::list(grammar::i32());
//! assert_eq!(parser.parse_str("[1, 2, 3]"), Ok(vec![1, 2, 3]));
//!
//! let err = parser.parse_str("[1, 2.5]").unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     "Parse error at line 1, column 5: Cannot parse integer from value:\n[1, 2.5]\n    ^-^\n"
//! );
//! ```
//!
//! For types that implement [`JsonDecode`] and [`JsonEncode`], [`from_str`]
//! and [`to_string`] pick the parser and serializer by type. Untyped input
//! can be read into a [`Value`] with [`grammar::any`], or from bytes with the
//! faster [`reader::read_any`].

extern crate alloc;

mod cursor;
mod error;
mod json_text;
mod options;
mod value;

pub mod grammar;
pub mod parsec;
pub mod reader;
pub mod registry;
pub mod ser;
pub mod strings;


pub use cursor::{Cursor, Mark, is_whitespace};
pub use error::{ParseError, ParseFailure};
pub use json_text::JsonText;
pub use options::{DEFAULT_MAX_DEPTH, ParserOptions, ReaderOptions};
pub use parsec::{BoxedParser, Parser};
pub use reader::ReadError;
pub use registry::{JsonDecode, JsonEncode, JsonKey, from_str, to_string};
pub use value::{Array, Map, Value};
