//! Parsers and serializers chosen by type.
//!
//! [`JsonDecode`] and [`JsonEncode`] connect Rust types to the grammar and
//! serializer functions, so nested shapes like `Vec<Option<BTreeMap<i32, String>>>`
//! need no hand-written combinators. Record types implement the traits
//! themselves, usually with [`grammar::object`] and [`ser::object`].
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! let text = r#"[{"1": "one"}, null, {}]"#;
//! let parsed: Vec<Option<BTreeMap<i32, String>>> = jsonparsec::from_str(text).unwrap();
//! assert_eq!(parsed[0].as_ref().unwrap()[&1], "one");
//! assert_eq!(jsonparsec::to_string(&parsed), r#"[{"1":"one"},null,{}]"#);
//! ```

use alloc::{
    boxed::Box,
    collections::{BTreeMap, BTreeSet, VecDeque},
    format,
    string::{String, ToString},
    vec::Vec,
};
use core::hash::{BuildHasher, Hash};
use std::collections::{HashMap, HashSet};

use indexmap::{IndexMap, IndexSet};

use crate::{
    cursor::Cursor,
    error::{ParseError, ParseFailure},
    grammar,
    json_text::JsonText,
    parsec::{Parser, from_fn},
    ser,
    value::Value,
};

/// A type that can be parsed from JSON.
pub trait JsonDecode: Sized {
    fn decode(cursor: &mut Cursor<'_>) -> Result<Self, ParseFailure>;
}

/// A type that can be serialized to JSON.
pub trait JsonEncode {
    fn to_json(&self) -> JsonText;
}

/// A map key type. JSON keys are always strings, so other key types are
/// converted through their string form.
pub trait JsonKey: Sized {
    /// Converts a decoded key. The error becomes the parse error message.
    fn from_key(key: String) -> Result<Self, String>;

    fn to_key(&self) -> JsonText;
}

/// The [`Parser`] for `T`.
pub fn parser<T: JsonDecode>() -> impl Parser<T> + Copy + Send + Sync {
    from_fn(T::decode)
}

/// Parses a complete document as a `T`. Surrounding whitespace is allowed,
/// anything else after the value is an error.
pub fn from_str<T: JsonDecode>(text: &str) -> Result<T, ParseError> {
    grammar::complete(parser::<T>()).parse_str(text)
}

/// Serializes `value` to a string.
pub fn to_string<T: JsonEncode + ?Sized>(value: &T) -> String {
    value.to_json().into_string()
}

macro_rules! decode_with {
    ($($ty:ty => $parser:expr),* $(,)?) => {
        $(
            impl JsonDecode for $ty {
                fn decode(cursor: &mut Cursor<'_>) -> Result<Self, ParseFailure> {
                    $parser.parse(cursor)
                }
            }
        )*
    };
}

decode_with! {
    String => grammar::string(),
    char => grammar::char_parser(),
    bool => grammar::boolean(),
    () => grammar::null(),
    i8 => grammar::i8(),
    i16 => grammar::i16(),
    i32 => grammar::i32(),
    i64 => grammar::i64(),
    u8 => grammar::u8(),
    u16 => grammar::u16(),
    u32 => grammar::u32(),
    u64 => grammar::u64(),
    f32 => grammar::f32(),
    f64 => grammar::f64(),
    Value => grammar::any(),
}

impl<T: JsonDecode> JsonDecode for Option<T> {
    fn decode(cursor: &mut Cursor<'_>) -> Result<Self, ParseFailure> {
        grammar::optional(parser::<T>()).parse(cursor)
    }
}

impl<T: JsonDecode> JsonDecode for Box<T> {
    fn decode(cursor: &mut Cursor<'_>) -> Result<Self, ParseFailure> {
        T::decode(cursor).map(Box::new)
    }
}

macro_rules! decode_collection {
    ($($ty:ident<T $(: $($bound:path),+)?> $(with $s:ident)?),* $(,)?) => {
        $(
            impl<T $(, $s)?> JsonDecode for $ty<T $(, $s)?>
            where
                T: JsonDecode $($(+ $bound)+)?,
                $($s: BuildHasher + Default,)?
            {
                fn decode(cursor: &mut Cursor<'_>) -> Result<Self, ParseFailure> {
                    grammar::collection(parser::<T>()).parse(cursor)
                }
            }
        )*
    };
}

decode_collection! {
    Vec<T>,
    VecDeque<T>,
    BTreeSet<T: Ord>,
    HashSet<T: Eq, Hash> with S,
    IndexSet<T: Eq, Hash> with S,
}

macro_rules! decode_map {
    ($($ty:ident<K $(: $($bound:path),+)?> $(with $s:ident)?),* $(,)?) => {
        $(
            impl<K, V $(, $s)?> JsonDecode for $ty<K, V $(, $s)?>
            where
                K: JsonKey $($(+ $bound)+)?,
                V: JsonDecode,
                $($s: BuildHasher + Default,)?
            {
                fn decode(cursor: &mut Cursor<'_>) -> Result<Self, ParseFailure> {
                    grammar::try_map(K::from_key, parser::<V>()).parse(cursor)
                }
            }
        )*
    };
}

decode_map! {
    BTreeMap<K: Ord>,
    HashMap<K: Eq, Hash> with S,
    IndexMap<K: Eq, Hash> with S,
}

impl JsonKey for String {
    fn from_key(key: String) -> Result<Self, String> {
        Ok(key)
    }

    fn to_key(&self) -> JsonText {
        ser::string(self)
    }
}

macro_rules! integer_keys {
    ($($ty:ident => $kind:literal),* $(,)?) => {
        $(
            impl JsonKey for $ty {
                fn from_key(key: String) -> Result<Self, String> {
                    key.parse()
                        .map_err(|_| format!(concat!("Cannot parse ", $kind, " from key '{}'"), key))
                }

                fn to_key(&self) -> JsonText {
                    ser::string(&self.to_string())
                }
            }
        )*
    };
}

integer_keys! {
    i8 => "byte",
    i16 => "short",
    i32 => "integer",
    i64 => "long",
    u8 => "unsigned byte",
    u16 => "unsigned short",
    u32 => "unsigned integer",
    u64 => "unsigned long",
}

macro_rules! encode_with {
    ($($ty:ty => $serializer:expr),* $(,)?) => {
        $(
            impl JsonEncode for $ty {
                fn to_json(&self) -> JsonText {
                    $serializer(*self)
                }
            }
        )*
    };
}

encode_with! {
    bool => ser::boolean,
    char => ser::char,
    i8 => ser::i8,
    i16 => ser::i16,
    i32 => ser::i32,
    i64 => ser::i64,
    u8 => ser::u8,
    u16 => ser::u16,
    u32 => ser::u32,
    u64 => ser::u64,
    f32 => ser::f32,
    f64 => ser::f64,
}

impl JsonEncode for () {
    fn to_json(&self) -> JsonText {
        ser::null()
    }
}

impl JsonEncode for str {
    fn to_json(&self) -> JsonText {
        ser::string(self)
    }
}

impl JsonEncode for String {
    fn to_json(&self) -> JsonText {
        ser::string(self)
    }
}

impl JsonEncode for Value {
    fn to_json(&self) -> JsonText {
        ser::value(self)
    }
}

/// `None` is `null`. Record types that omit absent members serialize them
/// with [`ser::optional`] instead.
impl<T: JsonEncode> JsonEncode for Option<T> {
    fn to_json(&self) -> JsonText {
        ser::nullable(self.as_ref(), T::to_json)
    }
}

impl<T: JsonEncode + ?Sized> JsonEncode for &T {
    fn to_json(&self) -> JsonText {
        (**self).to_json()
    }
}

impl<T: JsonEncode + ?Sized> JsonEncode for Box<T> {
    fn to_json(&self) -> JsonText {
        (**self).to_json()
    }
}

impl<T: JsonEncode> JsonEncode for [T] {
    fn to_json(&self) -> JsonText {
        ser::collection(self, T::to_json)
    }
}

macro_rules! encode_collection {
    ($($ty:ident $(with $s:ident)?),* $(,)?) => {
        $(
            impl<T: JsonEncode $(, $s)?> JsonEncode for $ty<T $(, $s)?> {
                fn to_json(&self) -> JsonText {
                    ser::collection(self, T::to_json)
                }
            }
        )*
    };
}

encode_collection!(Vec, VecDeque, BTreeSet, HashSet with S, IndexSet with S);

macro_rules! encode_map {
    ($($ty:ident $(with $s:ident)?),* $(,)?) => {
        $(
            impl<K: JsonKey, V: JsonEncode $(, $s)?> JsonEncode for $ty<K, V $(, $s)?> {
                fn to_json(&self) -> JsonText {
                    ser::map(self, K::to_key, V::to_json)
                }
            }
        )*
    };
}

encode_map!(BTreeMap, HashMap with S, IndexMap with S);
