//! Namespace stripping

use crate::xml::model::Element;

/// Drop the `{namespace}` prefix from every tag in `root` that carries it,
/// the root included.
///
/// This mutates the tree in place; every other operation in the crate leaves
/// its input untouched. Tags in other namespaces, and attribute names, are
/// not changed. Applying it twice is the same as applying it once.
pub fn remove_namespace(root: &mut Element, namespace: &str) {
    let prefix = format!("{{{namespace}}}");
    let mut pending = vec![root];
    while let Some(element) = pending.pop() {
        if let Some(local) = element.tag.strip_prefix(prefix.as_str()) {
            element.tag = local.to_string();
        }
        pending.extend(element.children.iter_mut());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Element {
        Element::new("{urn:a}root")
            .attr("{urn:a}k", "v")
            .child(Element::new("{urn:a}item").child(Element::new("{urn:a}leaf")))
            .child(Element::new("{urn:b}other"))
            .child(Element::new("plain"))
    }

    #[test]
    fn test_strips_matching_tags_only() {
        let mut tree = sample();
        remove_namespace(&mut tree, "urn:a");

        let tags: Vec<&str> = tree.iter().map(|e| e.tag.as_str()).collect();
        assert_eq!(tags, ["root", "item", "leaf", "{urn:b}other", "plain"]);
        assert_eq!(tree.get("{urn:a}k"), Some("v"));
    }

    #[test]
    fn test_is_idempotent() {
        let mut once = sample();
        remove_namespace(&mut once, "urn:a");
        let mut twice = once.clone();
        remove_namespace(&mut twice, "urn:a");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unknown_namespace_is_a_no_op() {
        let mut tree = sample();
        remove_namespace(&mut tree, "urn:missing");
        assert_eq!(tree, sample());
    }
}
