//! Typed serializers.
//!
//! Every function turns one value into [`JsonText`]. The composite ones take
//! the element serializers as arguments, so nesting such as
//! `Vec<Option<BTreeMap<i32, String>>>` is expressed by passing closures
//! down, without this module knowing the element types:
//!
//! ```
//! use jsonparsec::ser;
//!
//! let rows = vec![vec!["a", "b"], vec![]];
//! let text = ser::collection(&rows, |row| ser::collection(row, |s| ser::string(s)));
//! assert_eq!(text, r#"[["a","b"],[]]"#);
//! ```

use alloc::{format, string::String};
use core::fmt::Write;

use crate::{json_text::JsonText, strings::write_escaped, value::Value};

macro_rules! integer_serializers {
    ($($ty:ident),* $(,)?) => {
        $(
            #[doc = concat!("Serializes an `", stringify!($ty), "` in decimal.")]
            #[must_use]
            pub fn $ty(value: $ty) -> JsonText {
                JsonText::from_trusted(format!("{value}"))
            }
        )*
    };
}

integer_serializers!(i8, i16, i32, i64, u8, u16, u32, u64);

#[must_use]
pub fn boolean(value: bool) -> JsonText {
    if value { JsonText::TRUE } else { JsonText::FALSE }
}

#[must_use]
pub fn null() -> JsonText {
    JsonText::NULL
}

/// Serializes a double as the shortest text that parses back to the same
/// value, always with a fractional part or exponent (`1.0`, `1e20`).
///
/// Non-finite values render as `NaN`, `Infinity` and `-Infinity`. These are
/// not JSON, but [`grammar::f64`](crate::grammar::f64) accepts them back.
#[must_use]
pub fn f64(value: f64) -> JsonText {
    JsonText::from_trusted(if value.is_nan() {
        String::from("NaN")
    } else if value.is_infinite() {
        String::from(if value > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        format!("{value:?}")
    })
}

/// Single precision variant of [`f64`](fn@f64).
#[must_use]
pub fn f32(value: f32) -> JsonText {
    JsonText::from_trusted(if value.is_nan() {
        String::from("NaN")
    } else if value.is_infinite() {
        String::from(if value > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        format!("{value:?}")
    })
}

/// Serializes a string as a quoted, escaped JSON string.
#[must_use]
pub fn string(value: &str) -> JsonText {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    // writing into a String cannot fail
    let _ = write_escaped(value, &mut out);
    out.push('"');
    JsonText::from_trusted(out)
}

/// Serializes a character as a one-character string.
#[must_use]
pub fn char(value: char) -> JsonText {
    string(value.encode_utf8(&mut [0; 4]))
}

/// Serializes an instant as an RFC 3339 date-time string, such as
/// `"2024-01-02T03:04:05Z"`.
///
/// Fails for instants RFC 3339 cannot represent: years outside
/// `0..=9999`, or an offset with a seconds component.
#[cfg(feature = "time")]
pub fn date_time(value: time::OffsetDateTime) -> Result<JsonText, time::error::Format> {
    date_time_with(value, &time::format_description::well_known::Rfc3339)
}

/// Serializes an instant as a string using `format`.
///
/// ```
/// use jsonparsec::ser;
/// use time::macros::{datetime, format_description};
///
/// let text = ser::date_time_with(
///     datetime!(2024-01-02 03:04:05 +00:00),
///     format_description!("[hour]:[minute] on [day]/[month]"),
/// );
/// assert_eq!(text.unwrap(), r#""03:04 on 02\/01""#);
/// ```
#[cfg(feature = "time")]
pub fn date_time_with(
    value: time::OffsetDateTime,
    format: &(impl time::formatting::Formattable + ?Sized),
) -> Result<JsonText, time::error::Format> {
    value.format(format).map(|text| string(&text))
}

/// Serializes a calendar date as an ISO 8601 `"YYYY-MM-DD"` string.
#[cfg(feature = "time")]
pub fn date(value: time::Date) -> Result<JsonText, time::error::Format> {
    date_with(value, time::macros::format_description!("[year]-[month]-[day]"))
}

/// Serializes a calendar date as a string using `format`. Formats that ask
/// for time-of-day or offset components fail.
#[cfg(feature = "time")]
pub fn date_with(
    value: time::Date,
    format: &(impl time::formatting::Formattable + ?Sized),
) -> Result<JsonText, time::error::Format> {
    value.format(format).map(|text| string(&text))
}

/// Serializes a present value with `serializer`; an absent one becomes the
/// empty fragment, which [`object`] drops.
pub fn optional<T, F>(value: Option<T>, serializer: F) -> JsonText
where
    F: FnOnce(T) -> JsonText,
{
    value.map_or(JsonText::EMPTY, serializer)
}

/// Like [`optional`], but an absent value becomes `null`.
///
/// Use this for options nested inside collections and maps, where an empty
/// fragment would produce invalid JSON.
pub fn nullable<T, F>(value: Option<T>, serializer: F) -> JsonText
where
    F: FnOnce(T) -> JsonText,
{
    value.map_or(JsonText::NULL, serializer)
}

/// Serializes each item with `serializer` into a JSON array.
pub fn collection<I, F>(items: I, mut serializer: F) -> JsonText
where
    I: IntoIterator,
    F: FnMut(I::Item) -> JsonText,
{
    let mut out = String::from("[");
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&serializer(item));
    }
    out.push(']');
    JsonText::from_trusted(out)
}

/// Serializes entries into a JSON object.
///
/// `key_serializer` must produce a valid JSON object key, normally a quoted
/// string.
pub fn map<I, K, V, KF, VF>(entries: I, mut key_serializer: KF, mut value_serializer: VF) -> JsonText
where
    I: IntoIterator<Item = (K, V)>,
    KF: FnMut(K) -> JsonText,
    VF: FnMut(V) -> JsonText,
{
    let mut out = String::from("{");
    for (i, (key, value)) in entries.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&key_serializer(key));
        out.push(':');
        out.push_str(&value_serializer(value));
    }
    out.push('}');
    JsonText::from_trusted(out)
}

/// Joins already serialized fields into a JSON object, in the given order.
///
/// Fields whose text is empty (see [`optional`]) are left out.
///
/// ```
/// use jsonparsec::ser;
///
/// let text = ser::object([
///     ("name", ser::string("x")),
///     ("nickname", ser::optional(None::<&str>, ser::string)),
///     ("age", ser::i32(3)),
/// ]);
/// assert_eq!(text, r#"{"name":"x","age":3}"#);
/// ```
pub fn object<'a, I>(fields: I) -> JsonText
where
    I: IntoIterator<Item = (&'a str, JsonText)>,
{
    let mut out = String::from("{");
    let mut first = true;
    for (name, text) in fields {
        if text.is_empty() {
            continue;
        }
        if !first {
            out.push(',');
        }
        first = false;
        let _ = write!(out, "{}:{}", string(name), text);
    }
    out.push('}');
    JsonText::from_trusted(out)
}

/// Serializes a dynamic [`Value`] tree.
#[must_use]
pub fn value(value: &Value) -> JsonText {
    match value {
        Value::Null => JsonText::NULL,
        Value::Bool(b) => boolean(*b),
        Value::Number(n) => f64(*n),
        Value::String(s) => string(s),
        Value::Array(items) => collection(items, self::value),
        Value::Object(entries) => map(entries, |k| string(k), self::value),
    }
}
