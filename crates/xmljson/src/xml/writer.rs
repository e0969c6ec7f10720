//! Element tree to XML text, on top of `quick_xml::Writer`

use indexmap::IndexMap;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{Error, ErrorKind, Result};
use crate::xml::model::Element;

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Options for XML output
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Prefix the output with `<?xml version="1.0" encoding="UTF-8"?>`
    pub xml_declaration: bool,
}

/// Serialize an element tree, including the root's tail
pub fn to_string(root: &Element, options: &WriteOptions) -> Result<String> {
    let prefixes = collect_prefixes(root)?;
    let mut writer = Writer::new(Vec::new());

    if options.xml_declaration {
        write(
            &mut writer,
            Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
        )?;
    }

    write_element(&mut writer, root, &prefixes, true)?;
    if let Some(tail) = root.tail.as_deref() {
        write(&mut writer, Event::Text(BytesText::new(tail)))?;
    }

    String::from_utf8(writer.into_inner())
        .map_err(|err| Error::with_message(ErrorKind::Write, err.to_string()))
}

/// Namespace URI to generated prefix, in first-seen order
type Prefixes = IndexMap<String, String>;

fn collect_prefixes(root: &Element) -> Result<Prefixes> {
    let mut prefixes = Prefixes::new();
    for element in root.iter() {
        let names = std::iter::once(&element.tag).chain(element.attributes.keys());
        for name in names {
            if let (Some(uri), _) = split_clark(name)? {
                if uri != XML_NAMESPACE && !prefixes.contains_key(uri) {
                    let prefix = format!("ns{}", prefixes.len());
                    prefixes.insert(uri.to_string(), prefix);
                }
            }
        }
    }
    Ok(prefixes)
}

/// Split `{uri}local` into its parts; plain names have no uri
fn split_clark(name: &str) -> Result<(Option<&str>, &str)> {
    let (uri, local) = match name.strip_prefix('{') {
        Some(rest) => match rest.split_once('}') {
            Some((uri, local)) => (Some(uri), local),
            None => return Err(invalid_name(name)),
        },
        None => (None, name),
    };
    if !is_valid_local_name(local) {
        return Err(invalid_name(name));
    }
    Ok((uri, local))
}

/// Local names must be NCNames (XML names without a colon)
fn is_valid_local_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => is_name_start_char(first) && chars.all(is_name_char),
        None => false,
    }
}

fn is_name_start_char(c: char) -> bool {
    matches!(c,
        'A'..='Z'
        | '_'
        | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}'
    )
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}' | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}'
        )
}

fn invalid_name(name: &str) -> Error {
    Error::new(ErrorKind::InvalidName {
        name: name.to_string(),
    })
}

fn qualified_name(name: &str, prefixes: &Prefixes) -> Result<String> {
    match split_clark(name)? {
        (None, local) => Ok(local.to_string()),
        (Some(XML_NAMESPACE), local) => Ok(format!("xml:{local}")),
        (Some(uri), local) => match prefixes.get(uri) {
            Some(prefix) => Ok(format!("{prefix}:{local}")),
            None => Err(invalid_name(name)),
        },
    }
}

fn write_element(
    writer: &mut Writer<Vec<u8>>,
    element: &Element,
    prefixes: &Prefixes,
    is_root: bool,
) -> Result<()> {
    let name = qualified_name(&element.tag, prefixes)?;
    let mut start = BytesStart::new(name.as_str());
    for (key, value) in &element.attributes {
        let key = qualified_name(key, prefixes)?;
        start.push_attribute((key.as_str(), value.as_str()));
    }
    if is_root {
        for (uri, prefix) in prefixes {
            let key = format!("xmlns:{prefix}");
            start.push_attribute((key.as_str(), uri.as_str()));
        }
    }

    if element.children.is_empty() && element.text.is_none() {
        return write(writer, Event::Empty(start));
    }

    write(writer, Event::Start(start))?;
    if let Some(text) = element.text.as_deref() {
        write(writer, Event::Text(BytesText::new(text)))?;
    }
    for child in &element.children {
        write_element(writer, child, prefixes, false)?;
        if let Some(tail) = child.tail.as_deref() {
            write(writer, Event::Text(BytesText::new(tail)))?;
        }
    }
    write(writer, Event::End(BytesEnd::new(name.as_str())))
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|err| Error::with_message(ErrorKind::Write, err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(element: &Element) -> Result<String> {
        to_string(element, &WriteOptions::default())
    }

    #[test]
    fn test_empty_element() -> Result<()> {
        assert_eq!(render(&Element::new("e"))?, "<e/>");
        Ok(())
    }

    #[test]
    fn test_text_children_and_tails() -> Result<()> {
        let element = Element::new("e")
            .attr("k", "a\"b")
            .text("lead")
            .child(Element::new("a").text("x").tail(" & more"))
            .child(Element::new("b"));
        assert_eq!(
            render(&element)?,
            r#"<e k="a&quot;b">lead<a>x</a> &amp; more<b/></e>"#
        );
        Ok(())
    }

    #[test]
    fn test_root_tail_is_written() -> Result<()> {
        assert_eq!(render(&Element::new("e").tail("t"))?, "<e/>t");
        Ok(())
    }

    #[test]
    fn test_declaration() -> Result<()> {
        let options = WriteOptions {
            xml_declaration: true,
        };
        let xml = to_string(&Element::new("e"), &options)?;
        assert_eq!(xml, r#"<?xml version="1.0" encoding="UTF-8"?><e/>"#);
        Ok(())
    }

    #[test]
    fn test_clark_names_get_generated_prefixes() -> Result<()> {
        let element = Element::new("{urn:a}root")
            .attr("{urn:b}k", "v")
            .attr("{http://www.w3.org/XML/1998/namespace}lang", "en")
            .child(Element::new("{urn:a}item"));
        assert_eq!(
            render(&element)?,
            r#"<ns0:root ns1:k="v" xml:lang="en" xmlns:ns0="urn:a" xmlns:ns1="urn:b"><ns0:item/></ns0:root>"#
        );
        Ok(())
    }

    #[test]
    fn test_unicode_and_punctuated_names_are_written() -> Result<()> {
        let element = Element::new("café").attr("data-x.y_z", "1").child(Element::new("_a·b"));
        assert_eq!(render(&element)?, r#"<café data-x.y_z="1"><_a·b/></café>"#);
        Ok(())
    }

    #[test]
    fn test_unwritable_names_are_rejected() {
        for tag in [
            "", "a b", "1a", "-a", "{urn:a", "<x>", "#other", "a(b", "p:e", "{urn:a}p:e",
        ] {
            let err = render(&Element::new(tag)).err();
            assert!(
                matches!(
                    err.as_ref().map(Error::kind),
                    Some(ErrorKind::InvalidName { .. })
                ),
                "{tag:?} gave {err:?}"
            );
        }
    }
}
