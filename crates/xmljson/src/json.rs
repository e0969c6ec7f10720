//! JSON text boundary for `(tag, node)` pairings

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{Error, ErrorKind, Result};
use crate::node::Node;

/// Serializes as the one-key object `{tag: node}`
struct Tagged<'a> {
    tag: &'a str,
    node: &'a Node,
}

impl Serialize for Tagged<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.tag, self.node)?;
        map.end()
    }
}

/// Serialize `{tag: node}` as JSON text
pub fn internal_to_json(tag: &str, node: &Node, pretty: bool) -> Result<String> {
    let tagged = Tagged { tag, node };
    let result = if pretty {
        serde_json::to_string_pretty(&tagged)
    } else {
        serde_json::to_string(&tagged)
    };
    result.map_err(|err| {
        Error::with_message(ErrorKind::InvalidJson, format!("invalid json: {err}"))
    })
}

/// Parse JSON text into its `(tag, node)` pairing.
///
/// The top-level value must be an object with exactly one key. Field keys
/// below it are passed through without inspection.
pub fn json_to_internal(input: &str) -> Result<(String, Node)> {
    let value: serde_json::Value =
        serde_json::from_str(input).map_err(|err| Error::json(input, &err))?;
    Node::from(value).into_single_entry()
}
