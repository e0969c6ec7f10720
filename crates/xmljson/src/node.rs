//! The intermediate form shared by both conversion directions

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{Error, ErrorKind, Result};

/// Field key prefix marking an attribute
pub const ATTRIBUTE_PREFIX: char = '@';
/// Field key holding an element's own text
pub const TEXT_KEY: &str = "#text";
/// Field key holding the text after an element's closing tag
pub const TAIL_KEY: &str = "#tail";

/// Field key to field value, in insertion order
pub type Fields = IndexMap<String, Node>;

/// Value of one XML element (or of one field) in the intermediate form.
///
/// Serializes to JSON as `null`, a string, an object or an array.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Node {
    /// No attributes, no children, no text
    Null,
    /// No attributes and no children; the element's text
    Scalar(String),
    /// Attributes (`@name`), `#text`, `#tail` and child tags
    Object(Fields),
    /// Every value of a child tag that occurred more than once, in order
    List(Vec<Node>),
}

impl Node {
    /// Returns the text if this is a scalar, None otherwise
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the fields if this is an object, None otherwise
    pub fn as_object(&self) -> Option<&Fields> {
        match self {
            Self::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Returns the items if this is a list, None otherwise
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Reinterpret a `{tag: node}` object as its single `(tag, node)` pairing.
    ///
    /// Anything other than an object with exactly one key is a structural
    /// error.
    pub fn into_single_entry(self) -> Result<(String, Self)> {
        match self {
            Self::Object(fields) if fields.len() == 1 => fields
                .into_iter()
                .next()
                .ok_or_else(|| Error::new(ErrorKind::TagCount { found: 0 })),
            Self::Object(fields) => Err(Error::new(ErrorKind::TagCount {
                found: fields.len(),
            })),
            other => Err(Error::with_message(
                ErrorKind::TagCount { found: 0 },
                format!(
                    "expected an object holding exactly one tag, found {}",
                    other.kind_name()
                ),
            )),
        }
    }

    /// Borrowing form of [`Node::into_single_entry`]
    pub fn single_entry(&self) -> Result<(&str, &Self)> {
        match self {
            Self::Object(fields) => match fields.iter().next() {
                Some((tag, node)) if fields.len() == 1 => Ok((tag.as_str(), node)),
                _ => Err(Error::new(ErrorKind::TagCount {
                    found: fields.len(),
                })),
            },
            other => Err(Error::with_message(
                ErrorKind::TagCount { found: 0 },
                format!(
                    "expected an object holding exactly one tag, found {}",
                    other.kind_name()
                ),
            )),
        }
    }

    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Scalar(_) => "scalar",
            Self::Object(_) => "object",
            Self::List(_) => "list",
        }
    }

    /// Add a child's value under `tag`: the first occurrence is stored as
    /// is, the second turns the slot into a two-item list, later ones append.
    pub(crate) fn merge_into(fields: &mut Fields, tag: String, value: Self) {
        match fields.get_mut(&tag) {
            None => {
                fields.insert(tag, value);
            }
            Some(Self::List(items)) => items.push(value),
            Some(existing) => {
                let first = std::mem::replace(existing, Self::Null);
                *existing = Self::List(vec![first, value]);
            }
        }
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_owned())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<Fields> for Node {
    fn from(fields: Fields) -> Self {
        Self::Object(fields)
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Self::List(items)
    }
}

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// JSON numbers and booleans become scalars holding their JSON text.
impl From<serde_json::Value> for Node {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Scalar(b.to_string()),
            Value::Number(n) => Self::Scalar(n.to_string()),
            Value::String(s) => Self::Scalar(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}
