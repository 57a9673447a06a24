//! JSON value types.
//!
//! This module defines the [`Value`] enum, the untyped tree produced by
//! [`grammar::any`](crate::grammar::any) and [`reader::read_any`](crate::reader::read_any).
//!
use alloc::{string::String, vec::Vec};

use indexmap::IndexMap;

/// An object in input order. Re-inserting a key keeps its first position and
/// replaces the value.
pub type Map = IndexMap<String, Value>;
pub type Array = Vec<Value>;

/// A JSON value as defined by [RFC 8259].
///
/// Numbers are always `f64`, and `null` is its own variant rather than an
/// absent value.
///
/// # Examples
///
/// ```
/// use jsonparsec::{Map, Value};
///
/// let mut map = Map::new();
/// map.insert("key".to_string(), Value::String("value".into()));
/// map.insert("n".to_string(), Value::Number(1.0));
/// let v = Value::Object(map);
/// assert_eq!(v.to_string(), r#"{"key":"value","n":1.0}"#);
/// ```
///
/// [RFC 8259]: https://datatracker.ietf.org/doc/html/rfc8259
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Array),
    Object(Map),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.into())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Self::Object(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl Value {
    /// Returns `true` if the value is [`Null`].
    ///
    /// [`Null`]: Value::Null
    ///
    /// # Examples
    ///
    /// ```
    /// use jsonparsec::Value;
    ///
    /// assert!(Value::Null.is_null());
    /// assert!(!Value::Bool(false).is_null());
    /// ```
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Self::Object(m) => Some(m),
            _ => None,
        }
    }

    /// Looks up `key` when the value is an object.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsonparsec::{grammar, Parser, Value};
    ///
    /// let v = grammar::any().parse_str(r#"{"a": [true]}"#).unwrap();
    /// assert_eq!(v.get("a"), Some(&Value::Array(vec![Value::Bool(true)])));
    /// assert_eq!(v.get("b"), None);
    /// ```
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|m| m.get(key))
    }
}

impl core::fmt::Display for Value {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&crate::ser::value(self))
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::ToString, vec};

    use super::*;

    #[test]
    fn display_renders_json() {
        let mut map = Map::new();
        map.insert("b".into(), Value::Array(vec![Value::Null, Value::Bool(true)]));
        map.insert("a".into(), Value::Number(-1.5));
        map.insert("s".into(), Value::from("x/y"));
        assert_eq!(
            Value::Object(map).to_string(),
            r#"{"b":[null,true],"a":-1.5,"s":"x\/y"}"#
        );
    }

    #[test]
    fn option_converts_to_null() {
        assert_eq!(Value::from(None::<bool>), Value::Null);
        assert_eq!(Value::from(Some(2.0)), Value::Number(2.0));
    }

    #[test]
    fn reinserting_a_key_keeps_first_position() {
        let mut map = Map::new();
        map.insert("x".into(), Value::Null);
        map.insert("y".into(), Value::Null);
        map.insert("x".into(), Value::Bool(false));
        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["x", "y"]);
        assert_eq!(map["x"], Value::Bool(false));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_untagged_representation() {
        let value = Value::Array(vec![Value::Null, Value::from("s"), Value::Number(2.5)]);
        let text = serde_json::to_string(&value).unwrap();
        assert_eq!(text, r#"[null,"s",2.5]"#);
        let parsed: Value = serde_json::from_str(r#"{"k": [true]}"#).unwrap();
        assert_eq!(parsed.get("k"), Some(&Value::Array(vec![Value::Bool(true)])));
    }
}
