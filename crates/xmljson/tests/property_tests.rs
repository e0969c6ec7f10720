//! Property-based tests for the XML <-> JSON mapping
//!
//! These tests use proptest to verify:
//! 1. Encoded nodes survive a trip through JSON text unchanged
//! 2. Decoding an encoded tree rebuilds it when child tags are unique
//! 3. Re-encoding a decoded tree gives the same node
//! 4. Namespace stripping is idempotent
//! 5. List items decode to sibling elements in list order
//! 6. XML written by the crate parses back to the same tree

use proptest::prelude::*;
use xmljson::{
    elem_to_internal, from_xml_str, internal_to_elem, internal_to_json, json_to_elem,
    json_to_internal, remove_namespace, to_xml_string, Attributes, Element,
};

/// Small tag pool so repeated children are common
fn arb_tag() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["a", "b", "item", "{urn:x}a", "{urn:y}b"]).prop_map(String::from)
}

/// Text without leading or trailing whitespace
fn arb_text() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[a-z0-9]([a-z0-9 &<>]{0,6}[a-z0-9])?")
}

fn arb_attributes() -> impl Strategy<Value = Attributes> {
    prop::collection::vec(("[a-z]{1,3}", "[a-z0-9 ]{0,5}"), 0..3)
        .prop_map(|pairs| pairs.into_iter().collect())
}

fn arb_element() -> impl Strategy<Value = Element> {
    let leaf = (arb_tag(), arb_attributes(), arb_text()).prop_map(|(tag, attributes, text)| {
        Element {
            text,
            ..Element::with_attributes(tag, attributes)
        }
    });

    leaf.prop_recursive(4, 48, 5, |inner| {
        (
            arb_tag(),
            arb_attributes(),
            arb_text(),
            prop::collection::vec(inner, 0..5),
        )
            .prop_map(|(tag, attributes, text, children)| Element {
                tag,
                attributes,
                children,
                text,
                tail: None,
            })
    })
}

/// Rename children so no two siblings share a tag
fn with_unique_tags(mut element: Element) -> Element {
    element.children = element
        .children
        .into_iter()
        .enumerate()
        .map(|(i, child)| {
            let mut child = with_unique_tags(child);
            child.tag = format!("c{i}");
            child
        })
        .collect();
    element
}

proptest! {
    /// internal -> JSON -> internal is the identity for encoded nodes
    #[test]
    fn json_roundtrip(element in arb_element(), strip in any::<bool>(), pretty in any::<bool>()) {
        let (tag, node) = elem_to_internal(&element, strip);
        let json = internal_to_json(&tag, &node, pretty).unwrap();
        prop_assert_eq!(json_to_internal(&json).unwrap(), (tag, node));
    }

    /// decode(encode(e)) == e for trees without repeated sibling tags or tails
    #[test]
    fn decode_inverts_encode(element in arb_element().prop_map(with_unique_tags)) {
        let (tag, node) = elem_to_internal(&element, true);
        let decoded = internal_to_elem(&tag, &node).unwrap();
        prop_assert_eq!(decoded, element);
    }

    /// encode(decode(n)) == n for any encoded node
    #[test]
    fn encode_is_stable_through_decode(element in arb_element(), strip in any::<bool>()) {
        let (tag, node) = elem_to_internal(&element, strip);
        let decoded = internal_to_elem(&tag, &node).unwrap();
        prop_assert_eq!(elem_to_internal(&decoded, strip), (tag, node));
    }

    /// Stripping a namespace twice is the same as stripping it once
    #[test]
    fn remove_namespace_is_idempotent(element in arb_element()) {
        let mut once = element;
        remove_namespace(&mut once, "urn:x");
        let mut twice = once.clone();
        remove_namespace(&mut twice, "urn:x");
        prop_assert_eq!(&twice, &once);
        let stripped = once.iter().all(|e| !e.tag.starts_with("{urn:x}"));
        prop_assert!(stripped, "tag still in urn:x after stripping");
    }

    /// A list of scalars decodes to one child per item, in order
    #[test]
    fn list_order_preserved(items in prop::collection::vec("[a-z0-9]{1,5}", 2..8)) {
        let json = serde_json::json!({ "e": { "a": items.clone() } }).to_string();
        let element = json_to_elem(&json).unwrap();
        let texts: Vec<String> = element
            .children
            .iter()
            .filter_map(|child| child.text.clone())
            .collect();
        prop_assert_eq!(element.children.len(), items.len());
        prop_assert_eq!(texts, items);
    }

    /// Trees written as XML text parse back unchanged
    #[test]
    fn xml_text_roundtrip(element in arb_element()) {
        let xml = to_xml_string(&element).unwrap();
        prop_assert_eq!(from_xml_str(&xml).unwrap(), element);
    }
}
