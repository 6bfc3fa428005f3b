use serde_json_bytes::ByteString;
use std::fmt;

/// Create a [`Name`] from a string literal or identifier, checked for validity at compile time.
///
/// # Examples
///
/// ```
/// use graphql_executor::name;
///
/// assert_eq!(name!("Query").as_str(), "Query");
/// assert_eq!(name!(Query).as_str(), "Query");
/// ```
///
/// ```compile_fail
/// # use graphql_executor::name;
/// let invalid = name!("è_é");
/// ```
#[macro_export]
macro_rules! name {
    ($value: ident) => {
        $crate::name!(stringify!($value))
    };
    ($value: expr) => {{
        const _: () = { assert!($crate::Name::valid_syntax($value)) };
        $crate::Name::new_unchecked($value)
    }};
}

/// A GraphQL identifier
///
/// Backed by the same reference-counted string type as keys of [`JsonMap`][crate::JsonMap],
/// so cloning is cheap and turning a response key into a map key does not copy.
#[derive(Clone)]
pub struct Name(ByteString);

/// Tried to create a [`Name`] from a string that is not in valid
/// [GraphQL name](https://spec.graphql.org/October2021/#Name) syntax.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("`{name}` is not a valid GraphQL name")]
pub struct InvalidNameError {
    pub name: String,
}

impl Name {
    /// Create a new `Name`, checking its syntax
    pub fn new(value: &str) -> Result<Self, InvalidNameError> {
        if Self::valid_syntax(value) {
            Ok(Self::new_unchecked(value))
        } else {
            Err(InvalidNameError {
                name: value.to_owned(),
            })
        }
    }

    /// Create a new `Name` without checking its syntax.
    ///
    /// Used for names coming out of the parser, which already enforced the grammar.
    pub fn new_unchecked(value: &str) -> Self {
        Self(ByteString::from(value))
    }

    /// Returns whether the given string is a valid GraphQL name.
    ///
    /// <https://spec.graphql.org/October2021/#Name>
    pub const fn valid_syntax(value: &str) -> bool {
        let bytes = value.as_bytes();
        let Some(&first) = bytes.first() else {
            return false;
        };
        if !is_name_start(first) {
            return false;
        }
        let mut i = 1;
        while i < bytes.len() {
            if !is_name_continue(bytes[i]) {
                return false;
            }
            i += 1;
        }
        true
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The response-map key representation of this name
    pub fn to_byte_string(&self) -> ByteString {
        self.0.clone()
    }
}

const fn is_name_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_'
}

const fn is_name_continue(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

impl std::hash::Hash for Name {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_str().hash(state) // must be the same as str::hash
    }
}

impl std::ops::Deref for Name {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::borrow::Borrow<str> for Name {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Eq for Name {}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Ord for Name {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl PartialOrd for Name {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&'_ str> for Name {
    fn eq(&self, other: &&'_ str) -> bool {
        self.as_str() == *other
    }
}

impl From<Name> for ByteString {
    fn from(name: Name) -> Self {
        name.0
    }
}

impl From<&'_ Name> for ByteString {
    fn from(name: &'_ Name) -> Self {
        name.0.clone()
    }
}

impl TryFrom<&str> for Name {
    type Error = InvalidNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for Name {
    type Error = InvalidNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl serde::Serialize for Name {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for Name {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::new(&value).map_err(serde::de::Error::custom)
    }
}
