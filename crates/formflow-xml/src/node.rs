//! Generic tree produced from vendor XML
//!
//! A parsed element is either plain text, a map of attribute/child names to
//! nodes, or (as a map value only) a list of nodes for repeated siblings.

use indexmap::map::{IntoIter, Iter, Keys, Values};
use indexmap::IndexMap;

/// Key under which an attributed leaf keeps its text
pub const VALUE_KEY: &str = "_value";

/// Prefix marking attribute entries in a [`NodeMap`]
pub const ATTRIBUTE_PREFIX: char = '@';

/// A parsed XML value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Element with no attributes and no child elements
    Text(String),
    /// Attributes and child elements by name
    Map(NodeMap),
    /// Repeated sibling elements in document order
    List(Vec<Node>),
}

impl Default for Node {
    fn default() -> Self {
        Self::Map(NodeMap::new())
    }
}

impl Node {
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Self::Map(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// True for empty text, an empty map or an empty list
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Map(map) => map.is_empty(),
            Self::List(items) => items.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&NodeMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut NodeMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// View this node as a sequence.
    ///
    /// A single element parses to a bare node while repeated siblings parse
    /// to a list; this flattens both cases into a slice.
    pub fn as_list(&self) -> &[Self] {
        match self {
            Self::List(items) => items,
            single => std::slice::from_ref(single),
        }
    }

    /// Best-effort scalar text of this node.
    ///
    /// Text is returned as is, an attributed leaf yields its `_value`, a list
    /// yields the text of its first item, anything else yields `None`.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Map(map) => map.get(VALUE_KEY).and_then(Self::as_text),
            Self::List(items) => items.first().and_then(Self::text),
        }
    }

    /// Look up a direct entry when this node is a map
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Follow a `/`-separated path of map keys, e.g. `"slots/slot"`
    pub fn get_path(&self, path: &str) -> Option<&Self> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |node, segment| node.get(segment))
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<u32> for Node {
    fn from(value: u32) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<NodeMap> for Node {
    fn from(value: NodeMap) -> Self {
        Self::Map(value)
    }
}

impl From<Vec<Node>> for Node {
    fn from(values: Vec<Node>) -> Self {
        Self::List(values)
    }
}

/// An order-preserving map of element and attribute names to nodes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeMap(pub(crate) IndexMap<String, Node>);

impl NodeMap {
    /// Creates a new empty map
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Creates a new map with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self(IndexMap::with_capacity(capacity))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.0.get_mut(key)
    }

    /// Inserts a key-value pair, returning the previous value if the key
    /// already existed
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Node>) -> Option<Node> {
        self.0.insert(key.into(), value.into())
    }

    /// Inserts `value`, turning an existing entry for `key` into a list.
    ///
    /// This is how repeated sibling elements accumulate: the first occurrence
    /// stays bare and the second converts the entry to a two-item list.
    pub fn append(&mut self, key: impl Into<String>, value: Node) {
        match self.0.entry(key.into()) {
            indexmap::map::Entry::Vacant(entry) => {
                entry.insert(value);
            }
            indexmap::map::Entry::Occupied(mut entry) => match entry.get_mut() {
                Node::List(items) => items.push(value),
                existing => {
                    let first = std::mem::take(existing);
                    *existing = Node::List(vec![first, value]);
                }
            },
        }
    }

    /// Removes a key, preserving the order of the remaining entries
    pub fn remove(&mut self, key: &str) -> Option<Node> {
        self.0.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> Keys<'_, String, Node> {
        self.0.keys()
    }

    pub fn values(&self) -> Values<'_, String, Node> {
        self.0.values()
    }

    pub fn iter(&self) -> Iter<'_, String, Node> {
        self.0.iter()
    }

    /// Attribute entries with the `@` prefix stripped from their names
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.0
            .iter()
            .filter_map(|(key, value)| key.strip_prefix(ATTRIBUTE_PREFIX).map(|name| (name, value)))
    }
}

impl<'a> IntoIterator for &'a NodeMap {
    type Item = (&'a String, &'a Node);
    type IntoIter = Iter<'a, String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for NodeMap {
    type Item = (String, Node);
    type IntoIter = IntoIter<String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl From<IndexMap<String, Node>> for NodeMap {
    fn from(map: IndexMap<String, Node>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Node>> FromIterator<(K, V)> for NodeMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

#[cfg(feature = "serde")]
mod serialize {
    use serde::ser::{SerializeMap, SerializeSeq};
    use serde::{Serialize, Serializer};

    use super::{Node, NodeMap};

    impl Serialize for Node {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Self::Text(text) => serializer.serialize_str(text),
                Self::Map(map) => map.serialize(serializer),
                Self::List(items) => {
                    let mut seq = serializer.serialize_seq(Some(items.len()))?;
                    for item in items {
                        seq.serialize_element(item)?;
                    }
                    seq.end()
                }
            }
        }
    }

    impl Serialize for NodeMap {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(self.len()))?;
            for (key, value) in self {
                map.serialize_entry(key, value)?;
            }
            map.end()
        }
    }
}
