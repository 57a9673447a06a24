//! Parsers for the JSON grammar, built from the combinators in
//! [`parsec`](crate::parsec).
//!
//! Leaf parsers are plain functions returning small `Copy` parsers, and the
//! composite ones take their element parsers as arguments:
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use jsonparsec::{grammar, Parser};
//!
//! let parser = grammar::map(|key| key, grammar::list(grammar::optional(grammar::i32())));
//! let parsed: BTreeMap<String, Vec<Option<i32>>> =
//!     parser.parse_str(r#"{"a": [1, null], "b": []}"#).unwrap();
//! assert_eq!(parsed["a"], [Some(1), None]);
//! assert!(parsed["b"].is_empty());
//! ```
//!
//! Parsers do not skip whitespace in front of their own value unless noted;
//! the container parsers skip it around elements, and [`complete`] skips it
//! around the whole document.

mod numbers;
mod object;

use alloc::{borrow::Cow, format, string::String, vec::Vec};
use core::hash::Hash;

use indexmap::IndexSet;

pub use self::{
    numbers::{f32, f64, i8, i16, i32, i64, is_value_boundary, u8, u16, u32, u64},
    object::{FieldDispatch, FieldTable, FieldValue, Fields, UnknownFields, field, object, object_as_map},
};
pub(crate) use self::numbers::float_from_token;
use crate::{
    cursor::Cursor,
    error::ParseFailure,
    options::ParserOptions,
    parsec::{Parser, between, expect, expect_char, fail, from_fn},
    strings,
    value::Value,
};

/// Parses a quoted string and decodes its escapes.
///
/// Fails when the current character is not `"`, or when the input ends
/// before the closing quote.
pub fn string() -> impl Parser<String> + Copy + Send + Sync {
    from_fn(parse_string)
}

fn parse_string(cursor: &mut Cursor<'_>) -> Result<String, ParseFailure> {
    if cursor.current() != Some('"') {
        return Err(cursor.fail_here("Expected a quoted string and did not find a quote"));
    }
    let mut current = cursor.advance();
    let start = cursor.mark();
    let mut escaped = false;
    while let Some(ch) = current {
        if escaped {
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch == '"' {
            break;
        }
        current = cursor.advance();
    }
    if current.is_none() {
        return Err(cursor.fail(start, "Reached end of stream looking for terminal quote"));
    }
    let value = strings::unescape(cursor.slice(start)).into_owned();
    cursor.advance();
    Ok(value)
}

/// Parses a string holding exactly one character.
pub fn char_parser() -> impl Parser<char> + Copy + Send + Sync {
    from_fn(|cursor| {
        let start = cursor.mark();
        let value = parse_string(cursor)?;
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Ok(ch),
            _ => Err(cursor.fail(start, "Expected a single character")),
        }
    })
}

/// Parses `true` or `false`.
pub fn boolean() -> impl Parser<bool> + Copy + Send + Sync {
    from_fn(|cursor| match cursor.current() {
        Some('t') => expect("true").parse(cursor).map(|_| true),
        Some('f') => expect("false").parse(cursor).map(|_| false),
        _ => Err(cursor.fail_here("Expected value 'true' or 'false'")),
    })
}

/// Parses the literal `null`.
pub fn null() -> impl Parser<()> + Copy + Send + Sync {
    from_fn(|cursor| expect("null").parse(cursor).map(|_| ()))
}

/// Parses `null` as `None`, and anything else with `inner`.
///
/// The decision is made on the current character alone, so a value starting
/// with `n` that is not `null` is an error rather than being handed to
/// `inner`.
pub fn optional<T, P: Parser<T>>(inner: P) -> impl Parser<Option<T>> {
    from_fn(move |cursor| {
        if cursor.current() == Some('n') {
            null().parse(cursor).map(|()| None)
        } else {
            inner.parse(cursor).map(Some)
        }
    })
}

/// Skips whitespace, a `:` and more whitespace.
pub fn key_value_separator() -> impl Parser<()> + Copy + Send + Sync {
    from_fn(|cursor| {
        cursor.skip_whitespace();
        expect_char(':').parse(cursor)?;
        cursor.skip_whitespace();
        Ok(())
    })
}

/// Parses a JSON array into any collection that can be extended item by
/// item.
///
/// A trailing comma is an error reported by `item`, since it finds `]`
/// where an element should be.
pub fn collection<T, C, P>(item: P) -> impl Parser<C>
where
    P: Parser<T>,
    C: Default + Extend<T>,
{
    let items = from_fn(move |cursor| {
        let mut collection = C::default();
        while !cursor.is_end_of_stream() {
            cursor.skip_whitespace();
            let value = item.parse(cursor)?;
            collection.extend(Some(value));
            cursor.skip_whitespace();
            if cursor.current() == Some(',') {
                cursor.advance();
            } else {
                break;
            }
        }
        Ok(collection)
    });
    between(expect_char('['), items, expect_char(']'), C::default)
}

/// [`collection`] into a `Vec`.
pub fn list<T, P: Parser<T>>(item: P) -> impl Parser<Vec<T>> {
    collection(item)
}

/// [`collection`] into an insertion ordered set; duplicates keep their first
/// position.
pub fn set<T, P>(item: P) -> impl Parser<IndexSet<T>>
where
    T: Eq + Hash,
    P: Parser<T>,
{
    collection(item)
}

/// Parses the members of an object body, up to but excluding the closing
/// brace, handing each decoded key to `entry` to parse the value.
///
/// Key errors from `key` are anchored at the opening quote of the key.
fn parse_entries<K, KF, EF>(cursor: &mut Cursor<'_>, key: &KF, mut entry: EF) -> Result<(), ParseFailure>
where
    KF: Fn(String) -> Result<K, Cow<'static, str>>,
    EF: FnMut(&mut Cursor<'_>, K) -> Result<(), ParseFailure>,
{
    while !cursor.is_end_of_stream() {
        cursor.skip_whitespace();
        let start = cursor.mark();
        let raw = parse_string(cursor)?;
        let decoded = key(raw).map_err(|message| cursor.fail(start, message))?;
        key_value_separator().parse(cursor)?;
        entry(cursor, decoded)?;
        cursor.skip_whitespace();
        if cursor.current() == Some(',') {
            cursor.advance();
        } else {
            break;
        }
    }
    Ok(())
}

/// Parses a JSON object with uniform values into any map type.
///
/// Each raw key goes through `key`; a repeated key replaces the earlier
/// value.
pub fn map<K, V, M, KF, P>(key: KF, value: P) -> impl Parser<M>
where
    KF: Fn(String) -> K,
    P: Parser<V>,
    M: Default + Extend<(K, V)>,
{
    try_map(move |raw| Ok::<_, Cow<'static, str>>(key(raw)), value)
}

/// Like [`map`], with a key conversion that can fail. The error message is
/// reported at the offending key.
///
/// ```
/// use std::collections::HashMap;
///
/// use jsonparsec::{grammar, Parser};
///
/// let parser = grammar::try_map(
///     |key: String| key.parse::<u8>().map_err(|_| "Expected a numeric key"),
///     grammar::boolean(),
/// );
/// let parsed: HashMap<u8, bool> = parser.parse_str(r#"{"1": true}"#).unwrap();
/// assert_eq!(parsed[&1], true);
///
/// let err = parser.parse_str(r#"{"1": true, "x": false}"#).unwrap_err();
/// assert_eq!((err.column, err.message.as_str()), (13, "Expected a numeric key"));
/// ```
pub fn try_map<K, V, M, E, KF, P>(key: KF, value: P) -> impl Parser<M>
where
    KF: Fn(String) -> Result<K, E>,
    E: Into<Cow<'static, str>>,
    P: Parser<V>,
    M: Default + Extend<(K, V)>,
{
    let key = move |raw: String| -> Result<K, Cow<'static, str>> { key(raw).map_err(Into::into) };
    let entries = from_fn(move |cursor| {
        let mut map = M::default();
        parse_entries(cursor, &key, |cursor, key| {
            let parsed = value.parse(cursor)?;
            map.extend(Some((key, parsed)));
            Ok(())
        })?;
        Ok(map)
    });
    between(expect_char('{'), entries, expect_char('}'), M::default)
}

/// A parser that always fails with `Unknown field '<name>'`, for objects
/// that reject members they do not recognise.
pub fn unknown_field<T>(name: &str) -> impl Parser<T> {
    fail(format!("Unknown field '{name}'"))
}

/// See [`any`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Any {
    options: ParserOptions,
}

/// Parses any JSON value into a [`Value`], with default options.
///
/// Objects keep their keys in input order. Numbers are read as `f64`.
pub fn any() -> Any {
    Any::default()
}

/// [`any`] with explicit options.
pub fn any_with(options: ParserOptions) -> Any {
    Any { options }
}

impl Any {
    fn parse_at(&self, cursor: &mut Cursor<'_>, depth: usize) -> Result<Value, ParseFailure> {
        cursor.skip_whitespace();
        match cursor.current() {
            Some(open @ ('{' | '[')) => {
                if depth >= self.options.max_depth {
                    tracing::debug!(
                        offset = cursor.offset(),
                        max_depth = self.options.max_depth,
                        "nesting limit reached"
                    );
                    return Err(cursor.fail_here(format!(
                        "Exceeded maximum nesting depth of {}",
                        self.options.max_depth
                    )));
                }
                let nested = from_fn(|cursor| self.parse_at(cursor, depth + 1));
                if open == '{' {
                    map(|key| key, nested).parse(cursor).map(Value::Object)
                } else {
                    list(nested).parse(cursor).map(Value::Array)
                }
            }
            Some('"') => parse_string(cursor).map(Value::String),
            Some('n') => null().parse(cursor).map(|()| Value::Null),
            Some('t' | 'f') => boolean().parse(cursor).map(Value::Bool),
            _ => f64().parse(cursor).map(Value::Number),
        }
    }
}

impl Parser<Value> for Any {
    fn parse(&self, cursor: &mut Cursor<'_>) -> Result<Value, ParseFailure> {
        self.parse_at(cursor, 0)
    }
}

/// Parses a whole document with `parser`: leading and trailing whitespace
/// is skipped, and anything else left over is an error.
pub fn complete<T, P: Parser<T>>(parser: P) -> impl Parser<T> {
    from_fn(move |cursor| {
        cursor.skip_whitespace();
        let value = parser.parse(cursor)?;
        cursor.skip_whitespace();
        if cursor.is_end_of_stream() {
            Ok(value)
        } else {
            Err(cursor.fail_here("Unexpected trailing characters"))
        }
    })
}

#[cfg(test)]
mod tests {
    use alloc::{collections::BTreeSet, string::ToString, vec};

    use indexmap::IndexMap;
    use rstest::rstest;

    use super::*;

    fn error<T: core::fmt::Debug>(parser: impl Parser<T>, input: &str) -> String {
        parser.parse_str(input).unwrap_err().to_string()
    }

    #[rstest]
    #[case(r#""""#, "")]
    #[case(r#""test""#, "test")]
    #[case(r#""a\"b""#, "a\"b")]
    #[case(r#""line\nbreak""#, "line\nbreak")]
    #[case(r#""\u00e9""#, "é")]
    #[case(r#""ends with \\""#, "ends with \\")]
    fn strings(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(string().parse_str(input).as_deref(), Ok(expected));
    }

    #[test]
    fn string_leaves_cursor_after_closing_quote() {
        let mut cursor = Cursor::new(r#""a" ,"#);
        assert_eq!(string().parse(&mut cursor).as_deref(), Ok("a"));
        assert_eq!(cursor.rest(), " ,");
    }

    #[test]
    fn string_without_quote() {
        assert_eq!(
            error(string(), "test"),
            "Parse error at line 1, column 1: Expected a quoted string and did not find a quote:\ntest\n^\n"
        );
    }

    #[test]
    fn unterminated_string_is_anchored_after_the_quote() {
        assert_eq!(
            error(string(), "\"abc"),
            "Parse error at line 1, column 2: Reached end of stream looking for terminal quote:\n\"abc\n ^-^\n"
        );
        assert_eq!(
            error(string(), "\"abc\\\""),
            "Parse error at line 1, column 2: Reached end of stream looking for terminal quote:\n\"abc\\\"\n ^---^\n"
        );
    }

    #[test]
    fn chars() {
        assert_eq!(char_parser().parse_str("\"x\""), Ok('x'));
        assert_eq!(char_parser().parse_str("\"\\n\""), Ok('\n'));
        assert_eq!(
            error(char_parser(), "\"\""),
            "Parse error at line 1, column 1: Expected a single character:\n\"\"\n^^\n"
        );
        assert_eq!(
            error(char_parser(), "\"ab\""),
            "Parse error at line 1, column 1: Expected a single character:\n\"ab\"\n^--^\n"
        );
    }

    #[test]
    fn booleans() {
        assert_eq!(boolean().parse_str("true"), Ok(true));
        assert_eq!(boolean().parse_str("false"), Ok(false));
        assert_eq!(
            error(boolean(), "null"),
            "Parse error at line 1, column 1: Expected value 'true' or 'false':\nnull\n^\n"
        );
        assert_eq!(
            error(boolean(), "\"true\""),
            "Parse error at line 1, column 1: Expected value 'true' or 'false':\n\"true\"\n^\n"
        );
        assert_eq!(boolean().parse_str("fals").unwrap_err().message, "Unexpectedly reached end of stream.");
        assert_eq!(boolean().parse_str("trust").unwrap_err().message, "Expected to find 'true'");
    }

    #[test]
    fn optionals() {
        assert_eq!(optional(string()).parse_str("null"), Ok(None));
        assert_eq!(optional(string()).parse_str("\"x\"").as_ref().map(Option::as_deref), Ok(Some("x")));
        assert_eq!(optional(i32()).parse_str("3"), Ok(Some(3)));
        assert!(optional(i32()).parse_str("nope").is_err());
    }

    #[rstest]
    #[case(":")]
    #[case(" : ")]
    #[case("\n:\t")]
    fn separators(#[case] input: &str) {
        assert_eq!(key_value_separator().parse_str(input), Ok(()));
    }

    #[rstest]
    #[case("x", "x\n^")]
    #[case("", "\n^")]
    #[case(" ", " \n^^")]
    fn separator_errors(#[case] input: &str, #[case] diagnostic: &str) {
        assert_eq!(
            error(key_value_separator(), input),
            format!("Parse error at line 1, column 1: Expected to find ':':\n{diagnostic}\n")
        );
    }

    #[test]
    fn separator_consumes_trailing_whitespace() {
        let mut cursor = Cursor::new(" :  x");
        assert_eq!(key_value_separator().parse(&mut cursor), Ok(()));
        assert_eq!(cursor.current(), Some('x'));
    }

    #[rstest]
    #[case("[]", vec![])]
    #[case("[ ]", vec![])]
    #[case(r#"["a"]"#, vec!["a"])]
    #[case(r#"[ "a" , "b" ]"#, vec!["a", "b"])]
    #[case("[\n  \"a\",\n  \"b\"\n]", vec!["a", "b"])]
    fn collections(#[case] input: &str, #[case] expected: Vec<&str>) {
        assert_eq!(list(string()).parse_str(input), Ok(expected.into_iter().map(String::from).collect()));
    }

    #[rstest]
    #[case("[", 1, "Expected to find ']'", "[\n^^")]
    #[case("[\"a", 3, "Reached end of stream looking for terminal quote", "[\"a\n  ^^")]
    #[case("[\"a\"", 4, "Expected to find ']'", "[\"a\"\n   ^^")]
    #[case("[\"a\",", 5, "Expected to find ']'", "[\"a\",\n    ^^")]
    #[case("[\"a\", \"b", 8, "Reached end of stream looking for terminal quote", "[\"a\", \"b\n       ^^")]
    #[case("[\"a\", \"b\"", 9, "Expected to find ']'", "[\"a\", \"b\"\n        ^^")]
    #[case("[\"a\",]", 6, "Expected a quoted string and did not find a quote", "[\"a\",]\n     ^")]
    #[case("\"a\"", 1, "Expected to find '['", "\"a\"\n^")]
    fn collection_errors(#[case] input: &str, #[case] column: usize, #[case] message: &str, #[case] diagnostic: &str) {
        assert_eq!(
            error(list(string()), input),
            format!("Parse error at line 1, column {column}: {message}:\n{diagnostic}\n")
        );
    }

    #[test]
    fn collections_fill_any_extendable_type() {
        let parsed: BTreeSet<i32> = collection(i32()).parse_str("[3, 1, 3, 2]").unwrap();
        assert_eq!(parsed.into_iter().collect::<Vec<_>>(), [1, 2, 3]);

        let parsed = set(i32()).parse_str("[3, 1, 3, 2]").unwrap();
        assert_eq!(parsed.into_iter().collect::<Vec<_>>(), [3, 1, 2]);
    }

    #[test]
    fn crlf_input_reports_the_same_position_as_lf() {
        assert_eq!(error(list(i32()), "[1\r\n"), error(list(i32()), "[1\n"));
        assert_eq!(error(list(i32()), "[\r\n  1,\r\n  x]"), error(list(i32()), "[\n  1,\n  x]"));
    }

    #[test]
    fn lists_and_sets_keep_input_order() {
        let input = r#"["a", "b", "c"]"#;
        assert_eq!(list(string()).parse_str(input), Ok(vec!["a".to_string(), "b".to_string(), "c".to_string()]));
        let parsed = set(string()).parse_str(input).unwrap();
        assert_eq!(parsed.iter().map(String::as_str).collect::<Vec<_>>(), ["a", "b", "c"]);
    }

    #[test]
    fn nested_collections() {
        let parsed = list(list(optional(f64()))).parse_str("[[1.5, null], [], [2]]");
        assert_eq!(parsed, Ok(vec![vec![Some(1.5), None], vec![], vec![Some(2.0)]]));
    }

    #[test]
    fn maps() {
        let parsed: IndexMap<String, String> = map(|k| k, string())
            .parse_str(r#"{ "b" : "1", "a":"2" }"#)
            .unwrap();
        assert_eq!(parsed.keys().collect::<Vec<_>>(), ["b", "a"]);
        assert_eq!(parsed["a"], "2");

        let empty: IndexMap<String, String> = map(|k| k, string()).parse_str("{ }").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn map_keys_are_unescaped_before_conversion() {
        let parsed: IndexMap<String, bool> = map(|k| k, boolean()).parse_str(r#"{"a\"b": true}"#).unwrap();
        assert_eq!(parsed["a\"b"], true);
    }

    #[test]
    fn repeated_map_key_keeps_last_value() {
        let parsed: IndexMap<String, i32> = map(|k| k, i32()).parse_str(r#"{"a": 1, "a": 2}"#).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed["a"], 2);
    }

    #[rstest]
    #[case("{", 1, "Expected to find '}'", "{\n^^")]
    #[case("", 1, "Expected to find '{'", "\n^")]
    #[case("{a", 2, "Expected a quoted string and did not find a quote", "{a\n ^")]
    #[case("{\"a", 3, "Reached end of stream looking for terminal quote", "{\"a\n  ^^")]
    #[case("{\"a\"", 4, "Expected to find ':'", "{\"a\"\n   ^^")]
    #[case("{\"a\":", 5, "Expected a quoted string and did not find a quote", "{\"a\":\n    ^^")]
    #[case("{\"a\":\"", 6, "Reached end of stream looking for terminal quote", "{\"a\":\"\n     ^^")]
    #[case("{\"a\":\"\"", 7, "Expected to find '}'", "{\"a\":\"\"\n      ^^")]
    #[case("{\"a\":\"\",", 8, "Expected to find '}'", "{\"a\":\"\",\n       ^^")]
    #[case("{\"a\":\"\",}", 9, "Expected a quoted string and did not find a quote", "{\"a\":\"\",}\n        ^")]
    fn map_errors(#[case] input: &str, #[case] column: usize, #[case] message: &str, #[case] diagnostic: &str) {
        let parser = map::<_, _, IndexMap<String, String>, _, _>(|k| k, string());
        assert_eq!(
            error(parser, input),
            format!("Parse error at line 1, column {column}: {message}:\n{diagnostic}\n")
        );
    }

    #[test]
    fn try_map_reports_key_errors_at_the_key() {
        let parser = try_map(
            |key: String| key.parse::<i32>().map_err(|_| format!("Invalid key '{key}'")),
            boolean(),
        );
        let parsed: IndexMap<i32, bool> = parser.parse_str(r#"{"1": true, "-2": false}"#).unwrap();
        assert_eq!(parsed[&-2], false);

        let err = parser.parse_str(r#"{"1": true, "two": false}"#).map(|_: IndexMap<i32, bool>| ()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parse error at line 1, column 13: Invalid key 'two':\n{\"1\": true, \"two\": false}\n            ^---^\n"
        );
    }

    #[test]
    fn unknown_fields_fail_without_consuming() {
        let mut cursor = Cursor::new("1");
        let failure = unknown_field::<()>("x").parse(&mut cursor).unwrap_err();
        assert_eq!(failure.message(), "Unknown field 'x'");
        assert_eq!(cursor.offset(), 0);
    }

    #[test]
    fn any_values() {
        let parsed = any()
            .parse_str(r#" {"a": [1, "two", null, true, false, {}], "b": {"c": -0.5}} "#)
            .unwrap();
        assert_eq!(
            parsed.to_string(),
            r#"{"a":[1.0,"two",null,true,false,{}],"b":{"c":-0.5}}"#
        );
        assert_eq!(any().parse_str("[]"), Ok(Value::Array(vec![])));
        assert_eq!(any().parse_str("\"\""), Ok(Value::String(String::new())));
    }

    #[test]
    fn any_objects_keep_input_order() {
        let parsed = any().parse_str(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        let keys: Vec<_> = parsed.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn any_rejects_deep_nesting() {
        let options = ParserOptions { max_depth: 3 };
        assert!(any_with(options).parse_str("[[[1]]]").is_ok());
        assert!(any_with(options).parse_str(r#"{"a": [{"b": 1}]}"#).is_ok());

        let err = any_with(options).parse_str("[[[[1]]]]").unwrap_err();
        assert_eq!(err.message, "Exceeded maximum nesting depth of 3");
        assert_eq!(err.column, 4);
    }

    #[test]
    fn any_survives_default_depth() {
        let depth = ParserOptions::default().max_depth;
        let ok = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
        assert!(any().parse_str(&ok).is_ok());
        let too_deep = format!("{}{}", "[".repeat(depth + 1), "]".repeat(depth + 1));
        assert!(any().parse_str(&too_deep).is_err());
    }

    #[test]
    fn complete_rejects_trailing_input() {
        assert_eq!(complete(i32()).parse_str("  12 \n"), Ok(12));
        assert_eq!(
            error(complete(any()), "[1] x"),
            "Parse error at line 1, column 5: Unexpected trailing characters:\n[1] x\n    ^\n"
        );
    }

    #[test]
    fn parse_str_ignores_trailing_input() {
        assert_eq!(any().parse_str("[1] x"), Ok(Value::Array(vec![Value::Number(1.0)])));
    }
}
