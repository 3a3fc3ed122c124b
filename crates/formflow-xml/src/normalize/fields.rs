//! Field lookup shared by the normalizers

use crate::node::{Node, NodeMap};

/// First node present under any of `aliases`, in alias order
pub fn first_node<'a>(map: &'a NodeMap, aliases: &[&str]) -> Option<&'a Node> {
    aliases.iter().find_map(|alias| map.get(alias))
}

/// Text of the first alias present, or an empty string.
///
/// A present key wins even when its value has no usable text, which keeps
/// the preference order stable.
pub fn first_text(map: &NodeMap, aliases: &[&str]) -> String {
    first_node(map, aliases)
        .and_then(Node::text)
        .unwrap_or_default()
        .to_string()
}

/// The map under `key`, or `fallback` when `key` is missing or not a map
pub fn section<'a>(root: &'a NodeMap, key: &str, fallback: &'a NodeMap) -> &'a NodeMap {
    root.get(key).and_then(Node::as_map).unwrap_or(fallback)
}
