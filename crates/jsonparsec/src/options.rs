/// Nesting limit applied when no other limit is configured.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Configuration for the generic value parser,
/// [`grammar::any_with`](crate::grammar::any_with).
///
/// # Examples
///
/// ```rust
/// use jsonparsec::{grammar, Parser, ParserOptions};
///
/// let shallow = grammar::any_with(ParserOptions { max_depth: 2 });
/// assert!(shallow.parse_str("[[1]]").is_ok());
/// assert!(shallow.parse_str("[[[1]]]").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// How many arrays and objects may enclose each other.
    ///
    /// The generic parser recurses once per level, so this bounds stack use
    /// on hostile input. Typed parsers composed by hand are bounded by their
    /// own shape and ignore this setting.
    ///
    /// # Default
    ///
    /// [`DEFAULT_MAX_DEPTH`]
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Configuration for the byte-level fast path,
/// [`reader::read_any_with`](crate::reader::read_any_with).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderOptions {
    /// How many arrays and objects may enclose each other.
    ///
    /// # Default
    ///
    /// [`DEFAULT_MAX_DEPTH`]
    pub max_depth: usize,

    /// Whether bytes other than whitespace may follow the first value.
    ///
    /// When `true` the reader stops after one complete value and ignores the
    /// rest of the buffer.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_trailing: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            allow_trailing: false,
        }
    }
}
