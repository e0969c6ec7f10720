//! XML text to element tree, on top of `quick_xml::NsReader`

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;

use crate::error::{Error, Pos, Result};
use crate::xml::model::{Attributes, Element};

/// XML parser producing a single-rooted [`Element`] tree
#[derive(Debug)]
pub struct Parser<'a> {
    input: &'a str,
    reader: NsReader<&'a [u8]>,
    /// Open elements, innermost last
    stack: Vec<Element>,
    root: Option<Element>,
}

impl<'a> Parser<'a> {
    /// Create a new XML parser
    pub fn new(input: &'a str) -> Self {
        let mut reader = NsReader::from_str(input);
        reader.config_mut().expand_empty_elements = true;
        Self {
            input,
            reader,
            stack: Vec::new(),
            root: None,
        }
    }

    /// Parse the document and return its root element
    pub fn parse(mut self) -> Result<Element> {
        loop {
            let event = match self.reader.read_event() {
                Ok(event) => event,
                Err(err) => {
                    let offset = to_offset(self.reader.error_position());
                    return Err(Error::xml(err).at(Pos::from_offset(self.input, offset)));
                }
            };

            match event {
                Event::Start(start) => {
                    if self.root.is_some() {
                        return Err(self.error_here("junk after document element"));
                    }
                    let element = self.open_element(&start)?;
                    self.stack.push(element);
                }
                Event::End(_) => {
                    let element = self
                        .stack
                        .pop()
                        .ok_or_else(|| self.error_here("unexpected closing tag"))?;
                    match self.stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => self.root = Some(element),
                    }
                }
                Event::Text(text) => {
                    let text = text.unescape().map_err(|err| self.error_from(err))?;
                    self.push_text(&text)?;
                }
                Event::CData(data) => {
                    let text = std::str::from_utf8(&data).map_err(|err| self.error_from(err))?;
                    self.push_text(text)?;
                }
                Event::Eof => break,
                // Empty elements are expanded into Start/End by the reader config
                Event::Empty(_)
                | Event::Comment(_)
                | Event::Decl(_)
                | Event::PI(_)
                | Event::DocType(_) => {}
            }
        }

        if !self.stack.is_empty() {
            return Err(self.error_here("unclosed element at end of input"));
        }
        match self.root.take() {
            Some(root) => Ok(root),
            None => Err(self.error_here("no element found")),
        }
    }

    fn open_element(&self, start: &BytesStart<'_>) -> Result<Element> {
        let (resolved, local) = self.reader.resolve_element(start.name());
        let tag = self.qualify(resolved, local.as_ref())?;

        let mut attributes = Attributes::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|err| self.error_from(err))?;
            if attr.key.as_namespace_binding().is_some() {
                continue;
            }
            let (resolved, local) = self.reader.resolve_attribute(attr.key);
            let name = self.qualify(resolved, local.as_ref())?;
            let value = attr.unescape_value().map_err(|err| self.error_from(err))?;
            attributes.insert(name, value.into_owned());
        }

        Ok(Element::with_attributes(tag, attributes))
    }

    /// Text goes to the open element's `text` until it has a child, then to
    /// the tail of its last child.
    fn push_text(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        match self.stack.last_mut() {
            Some(parent) => {
                let slot = match parent.children.last_mut() {
                    Some(child) => &mut child.tail,
                    None => &mut parent.text,
                };
                slot.get_or_insert_with(String::new).push_str(text);
                Ok(())
            }
            None if text.trim().is_empty() => Ok(()),
            None => Err(self.error_here("text outside of the root element")),
        }
    }

    fn qualify(&self, resolved: ResolveResult<'_>, local: &[u8]) -> Result<String> {
        let local = std::str::from_utf8(local).map_err(|err| self.error_from(err))?;
        match resolved {
            ResolveResult::Unbound => Ok(local.to_string()),
            ResolveResult::Bound(ns) => {
                let uri = std::str::from_utf8(ns.as_ref()).map_err(|err| self.error_from(err))?;
                Ok(format!("{{{uri}}}{local}"))
            }
            ResolveResult::Unknown(prefix) => Err(self.error_here(format!(
                "unbound prefix: {}",
                String::from_utf8_lossy(&prefix)
            ))),
        }
    }

    fn pos(&self) -> Pos {
        Pos::from_offset(self.input, to_offset(self.reader.buffer_position()))
    }

    fn error_here(&self, message: impl std::fmt::Display) -> Error {
        Error::xml(message).at(self.pos())
    }

    fn error_from(&self, err: impl std::fmt::Display) -> Error {
        self.error_here(err)
    }
}

fn to_offset<T: TryInto<usize>>(position: T) -> usize {
    position.try_into().unwrap_or(usize::MAX)
}

/// Parse XML text into its root element
pub fn parse(input: &str) -> Result<Element> {
    Parser::new(input).parse()
}
