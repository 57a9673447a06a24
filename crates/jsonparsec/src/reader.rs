//! A fast path for reading untyped values from bytes.
//!
//! [`read_any`] produces the same [`Value`] tree as
//! [`grammar::any`](crate::grammar::any) for every input the grammar accepts,
//! but indexes the buffer directly instead of going through combinators, and
//! reports failures as a compact [`ReadError`] without rendered context.

use alloc::string::String;

use bstr::ByteSlice;
use thiserror::Error;

use crate::{
    grammar::float_from_token,
    options::ReaderOptions,
    strings,
    value::{Array, Map, Value},
};

/// Why [`read_any`] rejected its input. Offsets are byte offsets.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unexpected byte {byte:#04x} at offset {offset}")]
    UnexpectedByte { byte: u8, offset: usize },
    #[error("invalid number at offset {offset}")]
    InvalidNumber { offset: usize },
    #[error("invalid UTF-8 at offset {offset}")]
    InvalidUtf8 { offset: usize },
    #[error("nesting too deep at offset {offset}")]
    DepthExceeded { offset: usize },
    #[error("trailing bytes at offset {offset}")]
    TrailingBytes { offset: usize },
}

/// Reads one JSON value from `bytes` with default options.
///
/// ```
/// use jsonparsec::{reader, Value};
///
/// let value = reader::read_any(br#"{"ok": true, "n": [1, 2.5]}"#).unwrap();
/// assert_eq!(value.get("ok"), Some(&Value::Bool(true)));
/// assert_eq!(value.to_string(), r#"{"ok":true,"n":[1.0,2.5]}"#);
/// ```
pub fn read_any(bytes: &[u8]) -> Result<Value, ReadError> {
    read_any_with(bytes, ReaderOptions::default())
}

pub fn read_any_with(bytes: &[u8], options: ReaderOptions) -> Result<Value, ReadError> {
    let mut reader = Reader {
        bytes,
        index: 0,
        max_depth: options.max_depth,
    };
    let value = reader.value(0)?;
    if !options.allow_trailing {
        reader.skip_whitespace();
        if reader.index < bytes.len() {
            return Err(ReadError::TrailingBytes {
                offset: reader.index,
            });
        }
    }
    Ok(value)
}

#[inline]
fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

#[inline]
fn is_boundary(b: u8) -> bool {
    is_whitespace(b) || matches!(b, b'[' | b']' | b'{' | b'}' | b',')
}

struct Reader<'a> {
    bytes: &'a [u8],
    index: usize,
    max_depth: usize,
}

impl Reader<'_> {
    #[inline]
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.index).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            self.index += 1;
        }
    }

    fn unexpected(&self) -> ReadError {
        match self.peek() {
            Some(byte) => ReadError::UnexpectedByte {
                byte,
                offset: self.index,
            },
            None => ReadError::UnexpectedEnd,
        }
    }

    fn value(&mut self, depth: usize) -> Result<Value, ReadError> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(ReadError::UnexpectedEnd),
            Some(b'{') => self.enter(depth)?.object(depth + 1).map(Value::Object),
            Some(b'[') => self.enter(depth)?.array(depth + 1).map(Value::Array),
            Some(b'"') => self.string().map(Value::String),
            Some(b't') => self.literal(b"true").map(|()| Value::Bool(true)),
            Some(b'f') => self.literal(b"false").map(|()| Value::Bool(false)),
            Some(b'n') => self.literal(b"null").map(|()| Value::Null),
            Some(_) => self.number().map(Value::Number),
        }
    }

    /// Checks the nesting limit and steps over an opening bracket or brace.
    fn enter(&mut self, depth: usize) -> Result<&mut Self, ReadError> {
        if depth >= self.max_depth {
            tracing::debug!(offset = self.index, max_depth = self.max_depth, "nesting limit reached");
            return Err(ReadError::DepthExceeded { offset: self.index });
        }
        self.index += 1;
        Ok(self)
    }

    fn object(&mut self, depth: usize) -> Result<Map, ReadError> {
        let mut map = Map::new();
        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.index += 1;
            return Ok(map);
        }
        loop {
            self.skip_whitespace();
            if self.peek() != Some(b'"') {
                return Err(self.unexpected());
            }
            let key = self.string()?;
            self.skip_whitespace();
            if self.peek() != Some(b':') {
                return Err(self.unexpected());
            }
            self.index += 1;
            let value = self.value(depth)?;
            map.insert(key, value);
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.index += 1,
                Some(b'}') => {
                    self.index += 1;
                    return Ok(map);
                }
                _ => return Err(self.unexpected()),
            }
        }
    }

    fn array(&mut self, depth: usize) -> Result<Array, ReadError> {
        let mut items = Array::new();
        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.index += 1;
            return Ok(items);
        }
        loop {
            items.push(self.value(depth)?);
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.index += 1,
                Some(b']') => {
                    self.index += 1;
                    return Ok(items);
                }
                _ => return Err(self.unexpected()),
            }
        }
    }

    /// Reads a string starting at its opening quote.
    fn string(&mut self) -> Result<String, ReadError> {
        let start = self.index + 1;
        let mut end = start;
        loop {
            let rest = self.bytes.get(end..).ok_or(ReadError::UnexpectedEnd)?;
            let found = rest.find_byteset(b"\"\\").ok_or(ReadError::UnexpectedEnd)?;
            end += found;
            if self.bytes[end] == b'"' {
                break;
            }
            // skip the escaped byte; a multi-byte character continues with
            // bytes that can be neither a quote nor a backslash
            end += 2;
        }
        let raw = self.bytes[start..end]
            .to_str()
            .map_err(|e| ReadError::InvalidUtf8 {
                offset: start + e.valid_up_to(),
            })?;
        self.index = end + 1;
        Ok(strings::unescape(raw).into_owned())
    }

    fn literal(&mut self, expected: &'static [u8]) -> Result<(), ReadError> {
        for &b in expected {
            match self.peek() {
                Some(found) if found == b => self.index += 1,
                _ => return Err(self.unexpected()),
            }
        }
        Ok(())
    }

    fn number(&mut self) -> Result<f64, ReadError> {
        let start = self.index;
        while self.peek().is_some_and(|b| !is_boundary(b)) {
            self.index += 1;
        }
        if self.index == start {
            return Err(self.unexpected());
        }
        let token = self.bytes[start..self.index]
            .to_str()
            .map_err(|e| ReadError::InvalidUtf8 {
                offset: start + e.valid_up_to(),
            })?;
        float_from_token(token).ok_or(ReadError::InvalidNumber { offset: start })
    }
}
