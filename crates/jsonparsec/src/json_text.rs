use alloc::{borrow::Cow, string::String};
use core::{fmt, ops::Deref};

/// Text already known to be valid JSON.
///
/// Only the serializers in [`ser`](crate::ser) and the constants below create
/// values of this type, which keeps arbitrary application strings from being
/// spliced into output unescaped. The one exception is [`JsonText::EMPTY`],
/// the empty fragment an absent optional serializes to.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct JsonText(Cow<'static, str>);

impl JsonText {
    pub const NULL: Self = Self(Cow::Borrowed("null"));
    pub const TRUE: Self = Self(Cow::Borrowed("true"));
    pub const FALSE: Self = Self(Cow::Borrowed("false"));
    pub const EMPTY: Self = Self(Cow::Borrowed(""));
    pub const EMPTY_ARRAY: Self = Self(Cow::Borrowed("[]"));
    pub const EMPTY_OBJECT: Self = Self(Cow::Borrowed("{}"));

    pub(crate) fn from_trusted(text: String) -> Self {
        Self(Cow::Owned(text))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0.into_owned()
    }
}

impl Deref for JsonText {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for JsonText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JsonText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for JsonText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("JsonText").field(&self.0.as_ref()).finish()
    }
}

impl PartialEq<str> for JsonText {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for JsonText {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl From<JsonText> for String {
    fn from(text: JsonText) -> Self {
        text.into_string()
    }
}
