//! xmljson - bidirectional XML <-> JSON structural mapping
//!
//! Elements map to JSON by cardinality: an empty element is `null`, a
//! text-only element is its text, anything with attributes (`@name`),
//! children or a tail (`#tail`) is an object whose own text sits under
//! `#text`, and a child tag seen more than once becomes a list.
//!
//! # Quick Start
//!
//! ```
//! use xmljson::{json_to_xml, xml_to_json};
//! # fn main() -> Result<(), xmljson::Error> {
//! let json = xml_to_json(r#"<e name="value"><a>x</a><a>y</a></e>"#, true)?;
//! assert_eq!(json, r#"{"e":{"@name":"value","a":["x","y"]}}"#);
//!
//! let xml = json_to_xml(&json)?;
//! assert_eq!(xml, r#"<e name="value"><a>x</a><a>y</a></e>"#);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, ErrorKind, Pos, Result};

pub mod node;
pub use node::{Fields, Node};

pub mod xml;
pub use xml::{remove_namespace, Attributes, Element};

pub mod json;
pub use json::{internal_to_json, json_to_internal};

pub mod convert;
pub use convert::{
    elem_to_internal, elem_to_json, internal_to_elem, internal_to_elem_with, json_to_elem,
    json_to_elem_with, json_to_xml, json_to_xml_with, json_to_xml_with_options, xml_to_json,
    xml_to_json_with_options, ConvertOptions, ElementFactory, PlainFactory,
};

/// Parse XML text into its root element
pub fn from_xml_str(s: &str) -> Result<Element> {
    xml::parse(s)
}

/// Serialize an element tree as XML text
pub fn to_xml_string(element: &Element) -> Result<String> {
    xml::to_string(element, &xml::WriteOptions::default())
}
