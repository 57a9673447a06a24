//! JSON string escaping in both directions.
//!
//! Both functions borrow their input when nothing needs rewriting.

use alloc::{borrow::Cow, string::String};
use core::fmt;

/// Decodes the escape sequences of a JSON string body (without quotes).
///
/// Unknown escapes such as `\k`, and `\u` not followed by four hex digits,
/// are kept verbatim, backslash included. A `\u` escape naming half of a
/// surrogate pair that is not completed by the other half decodes to
/// U+FFFD.
#[must_use]
pub fn unescape(value: &str) -> Cow<'_, str> {
    let Some(first) = value.find('\\') else {
        return Cow::Borrowed(value);
    };

    let mut out = String::with_capacity(value.len());
    out.push_str(&value[..first]);
    let mut rest = &value[first..];
    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let Some(next) = after.chars().next() else {
            // a lone trailing backslash
            out.push('\\');
            rest = after;
            break;
        };
        let decoded = match next {
            '"' | '\\' | '/' => Some(next),
            'b' => Some('\u{8}'),
            'f' => Some('\u{c}'),
            'n' => Some('\n'),
            'r' => Some('\r'),
            't' => Some('\t'),
            _ => None,
        };
        if let Some(ch) = decoded {
            out.push(ch);
            rest = &after[1..];
        } else if next == 'u' {
            if let Some((ch, used)) = decode_unicode(&after[1..]) {
                out.push(ch);
                rest = &after[1 + used..];
            } else {
                tracing::debug!(escape = %after.get(..5).unwrap_or(after), "keeping malformed unicode escape");
                out.push_str("\\u");
                rest = &after[1..];
            }
        } else {
            tracing::debug!(escape = %next, "keeping unknown escape sequence");
            out.push('\\');
            out.push(next);
            rest = &after[next.len_utf8()..];
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Reads four hex digits, plus a trailing low surrogate escape when the
/// first unit is a high surrogate. Returns the character and the number of
/// bytes used.
fn decode_unicode(s: &str) -> Option<(char, usize)> {
    let unit = hex4(s)?;
    if (0xD800..0xDC00).contains(&unit) {
        let low = s.get(4..6).filter(|p| *p == "\\u").and_then(|_| hex4(&s[6..]));
        return match low {
            Some(low @ 0xDC00..0xE000) => {
                let code = 0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
                Some((char::from_u32(code)?, 10))
            }
            _ => Some((char::REPLACEMENT_CHARACTER, 4)),
        };
    }
    Some((char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER), 4))
}

fn hex4(s: &str) -> Option<u16> {
    let digits = s.get(..4)?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(digits, 16).ok()
}

#[inline]
fn needs_escape(b: u8) -> bool {
    matches!(b, b'"' | b'\\' | b'/') || b < 0x20
}

/// Writes `src` with every character JSON requires (and `/`) escaped.
pub(crate) fn write_escaped<W: fmt::Write>(src: &str, f: &mut W) -> fmt::Result {
    let mut written = 0;
    for (i, b) in src.bytes().enumerate() {
        if !needs_escape(b) {
            continue;
        }
        f.write_str(&src[written..i])?;
        match b {
            b'"' => f.write_str("\\\"")?,
            b'\\' => f.write_str("\\\\")?,
            b'/' => f.write_str("\\/")?,
            0x08 => f.write_str("\\b")?,
            0x0C => f.write_str("\\f")?,
            b'\n' => f.write_str("\\n")?,
            b'\r' => f.write_str("\\r")?,
            b'\t' => f.write_str("\\t")?,
            _ => write!(f, "\\u{b:04x}")?,
        }
        written = i + 1;
    }
    f.write_str(&src[written..])
}

/// Escapes `value` for use inside a JSON string literal.
///
/// `"`, `\`, `/` and every character below U+0020 are escaped; `/` is not
/// required by JSON but is always escaped in output.
#[must_use]
pub fn escape(value: &str) -> Cow<'_, str> {
    if !value.bytes().any(needs_escape) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 8);
    // writing into a String cannot fail
    let _ = write_escaped(value, &mut out);
    Cow::Owned(out)
}
