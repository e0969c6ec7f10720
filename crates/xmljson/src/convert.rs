//! XML element <-> internal node conversion, and the text-level entry points
//!
//! ```text
//! XML                              JSON
//! <e/>                             "e": null
//! <e>text</e>                      "e": "text"
//! <e name="value" />               "e": { "@name": "value" }
//! <e name="value">text</e>         "e": { "@name": "value", "#text": "text" }
//! <e> <a>text</a ><b>text</b> </e> "e": { "a": "text", "b": "text" }
//! <e> <a>text</a> <a>text</a> </e> "e": { "a": ["text", "text"] }
//! <e> text <a>text</a> </e>        "e": { "#text": "text", "a": "text" }
//! ```

use tracing::{instrument, trace};

use crate::error::{Error, ErrorKind, Result};
use crate::json::{internal_to_json, json_to_internal};
use crate::node::{Fields, Node, ATTRIBUTE_PREFIX, TAIL_KEY, TEXT_KEY};
use crate::xml::{self, Attributes, Element, WriteOptions};

/// Conversion options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Trim leading and trailing whitespace from text and tails when encoding
    pub strip_whitespace: bool,
    /// Indent JSON output
    pub pretty: bool,
    /// Prefix XML output with an XML declaration
    pub xml_declaration: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ConvertOptions {
    /// Compact output, no declaration
    pub const fn new(strip_whitespace: bool) -> Self {
        Self {
            strip_whitespace,
            pretty: false,
            xml_declaration: false,
        }
    }

    #[must_use]
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    #[must_use]
    pub const fn with_xml_declaration(mut self, xml_declaration: bool) -> Self {
        self.xml_declaration = xml_declaration;
        self
    }

    fn write_options(self) -> WriteOptions {
        WriteOptions {
            xml_declaration: self.xml_declaration,
        }
    }
}

/// Builds the elements produced while decoding
pub trait ElementFactory {
    fn create(&self, tag: &str, attributes: Attributes) -> Element;
}

/// Builds bare [`Element`]s
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainFactory;

impl ElementFactory for PlainFactory {
    fn create(&self, tag: &str, attributes: Attributes) -> Element {
        Element::with_attributes(tag, attributes)
    }
}

impl<F> ElementFactory for F
where
    F: Fn(&str, Attributes) -> Element,
{
    fn create(&self, tag: &str, attributes: Attributes) -> Element {
        self(tag, attributes)
    }
}

/// Encode an element into its `(tag, node)` pairing.
///
/// An element with attributes, children or a tail becomes an object; its own
/// text then goes under `#text`, placed after the attributes. Otherwise the
/// element is its text, or null when it has none. With `strip`, whitespace
/// at both ends of text and tails is dropped first.
pub fn elem_to_internal(element: &Element, strip: bool) -> (String, Node) {
    let mut fields = Fields::new();
    for (name, value) in &element.attributes {
        fields.insert(format!("{ATTRIBUTE_PREFIX}{name}"), Node::from(value.as_str()));
    }
    let attribute_count = fields.len();

    for child in &element.children {
        let (tag, value) = elem_to_internal(child, strip);
        Node::merge_into(&mut fields, tag, value);
    }

    let text = clean_text(element.text.as_deref(), strip);
    if let Some(tail) = clean_text(element.tail.as_deref(), strip) {
        fields.insert(TAIL_KEY.to_string(), Node::Scalar(tail));
    }

    let node = if fields.is_empty() {
        Node::from(text)
    } else {
        if let Some(text) = text {
            fields.shift_insert(attribute_count, TEXT_KEY.to_string(), Node::Scalar(text));
        }
        Node::Object(fields)
    };
    (element.tag.clone(), node)
}

fn clean_text(text: Option<&str>, strip: bool) -> Option<String> {
    let text = if strip { text?.trim() } else { text? };
    (!text.is_empty()).then(|| text.to_string())
}

/// Decode a `(tag, node)` pairing into a new element tree
pub fn internal_to_elem(tag: &str, node: &Node) -> Result<Element> {
    internal_to_elem_with(tag, node, &PlainFactory)
}

/// Decode a `(tag, node)` pairing, building every element with `factory`.
///
/// Object fields are read in order: `@name` keys become attributes, `#text`
/// and `#tail` the element's text and tail, and every other key a child,
/// one per item when the value is a list.
pub fn internal_to_elem_with<F>(tag: &str, node: &Node, factory: &F) -> Result<Element>
where
    F: ElementFactory + ?Sized,
{
    let mut attributes = Attributes::new();
    let mut children = Vec::new();
    let mut text = None;
    let mut tail = None;

    match node {
        Node::Null => {}
        Node::Scalar(s) => text = Some(s.clone()),
        Node::List(_) => {
            return Err(Error::with_message(
                ErrorKind::ListAtRoot,
                format!("a list cannot stand for the single element {tag:?}"),
            ))
        }
        Node::Object(fields) => {
            for (key, value) in fields {
                if let Some(name) = key.strip_prefix(ATTRIBUTE_PREFIX) {
                    attributes.insert(name.to_string(), attribute_value(name, value)?);
                } else if key == TEXT_KEY {
                    text = text_value(key, value)?;
                } else if key == TAIL_KEY {
                    tail = text_value(key, value)?;
                } else if let Node::List(items) = value {
                    for item in items {
                        if let Node::List(_) = item {
                            return Err(Error::new(ErrorKind::NestedList { tag: key.clone() }));
                        }
                        children.push(internal_to_elem_with(key, item, factory)?);
                    }
                } else {
                    children.push(internal_to_elem_with(key, value, factory)?);
                }
            }
        }
    }

    let mut element = factory.create(tag, attributes);
    element.children.extend(children);
    element.text = text;
    element.tail = tail;
    Ok(element)
}

fn attribute_value(name: &str, value: &Node) -> Result<String> {
    match value {
        Node::Scalar(s) => Ok(s.clone()),
        other => Err(Error::with_message(
            ErrorKind::NonScalarAttribute {
                name: name.to_string(),
            },
            format!(
                "attribute {name:?} must hold scalar text, found {}",
                other.kind_name()
            ),
        )),
    }
}

fn text_value(key: &str, value: &Node) -> Result<Option<String>> {
    match value {
        Node::Scalar(s) => Ok(Some(s.clone())),
        Node::Null => Ok(None),
        other => Err(Error::with_message(
            ErrorKind::NonScalarText {
                key: key.to_string(),
            },
            format!("{key} must hold scalar text, found {}", other.kind_name()),
        )),
    }
}

/// Encode an element tree as JSON text
#[instrument(level = "debug", skip_all, fields(tag = %element.tag))]
pub fn elem_to_json(element: &Element, options: &ConvertOptions) -> Result<String> {
    let (tag, node) = elem_to_internal(element, options.strip_whitespace);
    let json = internal_to_json(&tag, &node, options.pretty)?;
    trace!(bytes = json.len(), "encoded element");
    Ok(json)
}

/// Decode JSON text into a new element tree
pub fn json_to_elem(input: &str) -> Result<Element> {
    json_to_elem_with(input, &PlainFactory)
}

/// Decode JSON text into a new element tree built with `factory`
#[instrument(level = "debug", skip_all, fields(bytes = input.len()))]
pub fn json_to_elem_with<F>(input: &str, factory: &F) -> Result<Element>
where
    F: ElementFactory + ?Sized,
{
    let (tag, node) = json_to_internal(input)?;
    trace!(%tag, "decoded json pairing");
    internal_to_elem_with(&tag, &node, factory)
}

/// Convert XML text to JSON text
pub fn xml_to_json(input: &str, strip: bool) -> Result<String> {
    xml_to_json_with_options(input, &ConvertOptions::new(strip))
}

/// Convert XML text to JSON text with options
#[instrument(level = "debug", skip_all, fields(bytes = input.len()))]
pub fn xml_to_json_with_options(input: &str, options: &ConvertOptions) -> Result<String> {
    let root = xml::parse(input)?;
    trace!(tag = %root.tag, "parsed xml");
    elem_to_json(&root, options)
}

/// Convert JSON text to XML text
pub fn json_to_xml(input: &str) -> Result<String> {
    json_to_xml_with_options(input, &ConvertOptions::default())
}

/// Convert JSON text to XML text with options
pub fn json_to_xml_with_options(input: &str, options: &ConvertOptions) -> Result<String> {
    json_to_xml_with(input, options, &PlainFactory)
}

/// Convert JSON text to XML text, building elements with `factory`
#[instrument(level = "debug", skip_all, fields(bytes = input.len()))]
pub fn json_to_xml_with<F>(input: &str, options: &ConvertOptions, factory: &F) -> Result<String>
where
    F: ElementFactory + ?Sized,
{
    let root = json_to_elem_with(input, factory)?;
    let xml = xml::to_string(&root, &options.write_options())?;
    trace!(bytes = xml.len(), "wrote xml");
    Ok(xml)
}
