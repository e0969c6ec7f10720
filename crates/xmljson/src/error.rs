//! Error types for xmljson

use std::fmt;
use thiserror::Error;

/// Position in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.offset, self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }

    /// Locate a byte offset inside `input`, counting lines and columns from 1.
    ///
    /// Offsets past the end of the input are clamped to the end.
    pub fn from_offset(input: &str, offset: usize) -> Self {
        let mut line: u32 = 1;
        let mut col: u32 = 1;
        for &byte in input.as_bytes().iter().take(offset) {
            if byte == b'\n' {
                line = line.saturating_add(1);
                col = 1;
            } else if byte & 0xC0 != 0x80 {
                // continuation bytes belong to the previous character
                col = col.saturating_add(1);
            }
        }
        Self::new(offset.min(input.len()), line, col)
    }

    /// Locate a 1-based line and byte column inside `input`.
    ///
    /// Returns None for line 0, which serde_json uses when no input was read.
    pub fn from_line_col(input: &str, line: usize, col: usize) -> Option<Self> {
        let skipped = line.checked_sub(1)?;
        let line_start = if skipped == 0 {
            0
        } else {
            input
                .match_indices('\n')
                .nth(skipped - 1)
                .map_or(input.len(), |(i, _)| i + 1)
        };
        let offset = line_start.saturating_add(col.saturating_sub(1));
        Some(Self::from_offset(input, offset))
    }
}

/// Error kind for detailed categorization
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed XML text
    InvalidXml,
    /// Malformed JSON text
    InvalidJson,
    /// A `{tag: node}` pairing did not hold exactly one tag
    TagCount { found: usize },
    /// A list appeared where a single element value was required
    ListAtRoot,
    /// A list appeared directly inside another list
    NestedList { tag: String },
    /// An `@`-prefixed field held something other than scalar text
    NonScalarAttribute { name: String },
    /// `#text` or `#tail` held something other than scalar text or null
    NonScalarText { key: String },
    /// A tag or attribute name that cannot be written as XML
    InvalidName { name: String },
    /// The XML writer failed
    Write,
}

impl ErrorKind {
    /// Malformed XML or JSON input text
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::InvalidXml | Self::InvalidJson)
    }

    /// An internal node that does not have the shape decode expects
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::TagCount { .. }
                | Self::ListAtRoot
                | Self::NestedList { .. }
                | Self::NonScalarAttribute { .. }
                | Self::NonScalarText { .. }
                | Self::InvalidName { .. }
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidXml => write!(f, "invalid xml"),
            Self::InvalidJson => write!(f, "invalid json"),
            Self::TagCount { found } => {
                write!(f, "expected exactly one top-level tag, found {found}")
            }
            Self::ListAtRoot => write!(f, "a list cannot stand for a single element"),
            Self::NestedList { tag } => write!(f, "nested list under tag: {tag}"),
            Self::NonScalarAttribute { name } => {
                write!(f, "attribute value is not scalar text: {name}")
            }
            Self::NonScalarText { key } => write!(f, "{key} is not scalar text"),
            Self::InvalidName { name } => write!(f, "invalid xml name: {name:?}"),
            Self::Write => write!(f, "failed to write xml"),
        }
    }
}

/// Main error type for xmljson
#[derive(Error, Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    pos: Option<Pos>,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            pos: None,
            message,
        }
    }

    pub fn with_message(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            pos: None,
            message: message.into(),
        }
    }

    /// Attach the source position the error was raised at
    #[must_use]
    pub fn at(mut self, pos: Pos) -> Self {
        self.pos = Some(pos);
        self
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn pos(&self) -> Option<Pos> {
        self.pos
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn xml(message: impl fmt::Display) -> Self {
        Self::with_message(ErrorKind::InvalidXml, format!("invalid xml: {message}"))
    }

    pub(crate) fn json(input: &str, err: &serde_json::Error) -> Self {
        let error = Self::with_message(ErrorKind::InvalidJson, format!("invalid json: {err}"));
        match Pos::from_line_col(input, err.line(), err.column()) {
            Some(pos) => error.at(pos),
            None => error,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pos {
            Some(pos) => write!(f, "error at {}:{}: {}", pos.line, pos.col, self.message),
            None => write!(f, "error: {}", self.message),
        }
    }
}

/// Result type alias for xmljson
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pos_display() {
        let pos = Pos::new(42, 10, 5);
        assert_eq!(pos.to_string(), "42:10:5");
    }

    #[test]
    fn test_pos_from_offset() {
        let input = "<a>\n  <b/>\n</a>";
        assert_eq!(Pos::from_offset(input, 0), Pos::new(0, 1, 1));
        assert_eq!(Pos::from_offset(input, 6), Pos::new(6, 2, 3));
        assert_eq!(Pos::from_offset(input, 999).offset, input.len());
    }

    #[test]
    fn test_pos_from_line_col() {
        let input = "ab\ncd\nef";
        assert_eq!(Pos::from_line_col(input, 1, 1), Some(Pos::new(0, 1, 1)));
        assert_eq!(Pos::from_line_col(input, 2, 2), Some(Pos::new(4, 2, 2)));
        assert_eq!(Pos::from_line_col(input, 3, 1), Some(Pos::new(6, 3, 1)));
        assert_eq!(Pos::from_line_col(input, 9, 1).map(|p| p.offset), Some(input.len()));
        assert_eq!(Pos::from_line_col(input, 0, 0), None);
    }

    #[test]
    fn test_pos_counts_characters_not_bytes() {
        let input = "é<a/>";
        assert_eq!(Pos::from_offset(input, 2), Pos::new(2, 1, 2));
    }

    #[test]
    fn test_error_kind_families() {
        assert!(ErrorKind::InvalidXml.is_parse());
        assert!(ErrorKind::InvalidJson.is_parse());
        assert!(ErrorKind::TagCount { found: 2 }.is_structural());
        assert!(!ErrorKind::TagCount { found: 2 }.is_parse());
        assert!(!ErrorKind::Write.is_structural());
    }

    #[test]
    fn test_error_display() {
        let err = Error::new(ErrorKind::TagCount { found: 2 });
        assert_eq!(
            err.to_string(),
            "error: expected exactly one top-level tag, found 2"
        );

        let err = Error::xml("boom").at(Pos::new(10, 2, 5));
        let display = err.to_string();
        assert!(display.contains("error at 2:5"));
        assert!(display.contains("invalid xml"));
    }
}
