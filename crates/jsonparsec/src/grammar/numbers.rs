//! Numeric parsers.
//!
//! Numbers are read as one token running up to the next value boundary and
//! then converted as a whole, so an error always covers the full token.

use core::str::FromStr;

use crate::{
    cursor::{Cursor, Mark, is_whitespace},
    error::ParseFailure,
    parsec::{Parser, from_fn},
};

/// Whether `ch` ends a scalar token: JSON whitespace, a bracket, a brace, a
/// comma, or end-of-stream (`None`).
///
/// `:` and `"` are not boundaries, so `1:` or `1"` scan as one (invalid)
/// token.
#[inline]
#[must_use]
pub fn is_value_boundary(ch: Option<char>) -> bool {
    match ch {
        None => true,
        Some(ch) => is_whitespace(ch) || matches!(ch, '[' | ']' | '{' | '}' | ','),
    }
}

/// Consumes characters up to the next value boundary.
fn scan_token<'src>(cursor: &mut Cursor<'src>) -> (Mark, &'src str) {
    let start = cursor.mark();
    let mut current = cursor.current();
    while !is_value_boundary(current) {
        current = cursor.advance();
    }
    (start, cursor.slice(start))
}

fn whole<T: FromStr>(cursor: &mut Cursor<'_>, message: &'static str) -> Result<T, ParseFailure> {
    let (start, token) = scan_token(cursor);
    token.parse().map_err(|_| cursor.fail(start, message))
}

macro_rules! whole_number_parsers {
    ($($ty:ident => $kind:literal),* $(,)?) => {
        $(
            #[doc = concat!(
                "Parses a decimal `", stringify!($ty), "`, rejecting fractions, ",
                "exponents and values outside its range.",
            )]
            pub fn $ty() -> impl Parser<$ty> + Copy + Send + Sync {
                from_fn(|cursor| whole::<$ty>(cursor, concat!("Cannot parse ", $kind, " from value")))
            }
        )*
    };
}

whole_number_parsers! {
    i8 => "byte",
    i16 => "short",
    i32 => "integer",
    i64 => "long",
    u8 => "unsigned byte",
    u16 => "unsigned short",
    u32 => "unsigned integer",
    u64 => "unsigned long",
}

/// Floating point types the grammar can read, with their special values.
pub(crate) trait Float: FromStr + Copy {
    const INFINITY: Self;
    const NEG_INFINITY: Self;
    const NAN: Self;

    fn is_infinite(self) -> bool;
}

macro_rules! impl_float {
    ($($ty:ident),*) => {
        $(
            impl Float for $ty {
                const INFINITY: Self = $ty::INFINITY;
                const NEG_INFINITY: Self = $ty::NEG_INFINITY;
                const NAN: Self = $ty::NAN;

                fn is_infinite(self) -> bool {
                    $ty::is_infinite(self)
                }
            }
        )*
    };
}

impl_float!(f32, f64);

/// Converts one scanned token to a float.
///
/// Besides decimal notation this accepts the spellings `NaN`, `Infinity`,
/// `Inf`, `-Infinity` and `-Inf`, exactly as written. Any other alphabetic
/// content is rejected, as is a finite literal too large for `F`.
pub(crate) fn float_from_token<F: Float>(token: &str) -> Option<F> {
    match token {
        "NaN" => return Some(F::NAN),
        "Infinity" | "Inf" => return Some(F::INFINITY),
        "-Infinity" | "-Inf" => return Some(F::NEG_INFINITY),
        _ => {}
    }
    if token
        .bytes()
        .any(|b| b.is_ascii_alphabetic() && !matches!(b, b'e' | b'E'))
    {
        return None;
    }
    token.parse::<F>().ok().filter(|value| !value.is_infinite())
}

fn float<F: Float>(cursor: &mut Cursor<'_>, message: &'static str) -> Result<F, ParseFailure> {
    let (start, token) = scan_token(cursor);
    float_from_token(token).ok_or_else(|| cursor.fail(start, message))
}

/// Parses a single precision float.
pub fn f32() -> impl Parser<f32> + Copy + Send + Sync {
    from_fn(|cursor| float::<f32>(cursor, "Cannot parse float from value"))
}

/// Parses a double precision float.
///
/// ```
/// use jsonparsec::{grammar, Parser};
///
/// assert_eq!(grammar::f64().parse_str("-1.5e3"), Ok(-1500.0));
/// assert!(grammar::f64().parse_str("-Infinity").unwrap().is_infinite());
/// assert!(grammar::f64().parse_str("1.0.0").is_err());
/// ```
pub fn f64() -> impl Parser<f64> + Copy + Send + Sync {
    from_fn(|cursor| float::<f64>(cursor, "Cannot parse double from value"))
}
