//! Conversion of parsed XML into the generic [`Node`] tree

use tracing::{instrument, trace};

use crate::error::Result;
use crate::node::{Node, NodeMap, ATTRIBUTE_PREFIX, VALUE_KEY};
use crate::xml::{Config, Element, Parser};

/// Parse vendor XML into a generic node.
///
/// The root element's name is dropped; its content becomes the result.
/// Empty or whitespace-only input yields an empty map.
pub fn parse(xml: &str) -> Result<Node> {
    parse_with_config(xml, Config::default())
}

/// Parse with custom parser limits
#[instrument(level = "debug", skip_all, fields(len = xml.len()))]
pub fn parse_with_config(xml: &str, config: Config) -> Result<Node> {
    if xml.trim().is_empty() {
        trace!("empty document");
        return Ok(Node::Map(NodeMap::new()));
    }

    let mut parser = Parser::with_config(xml.as_bytes(), config);
    let document = parser.parse()?;
    trace!(root = %document.root.name, "document parsed");
    Ok(element_to_node(&document.root))
}

/// Convert an element to a node, collapsing it to text when it has neither
/// attributes nor child elements.
///
/// Attributes come first under `@name` keys, then children in document order.
/// A repeated child name turns that entry into a list. An element that has
/// attributes but no children keeps only the attributes; its text is dropped.
pub fn element_to_node(element: &Element) -> Node {
    let mut map = NodeMap::with_capacity(element.attributes.len() + element.children.len());

    for (name, value) in &element.attributes {
        map.insert(format!("{ATTRIBUTE_PREFIX}{name}"), value.as_str());
    }

    for child in element.child_elements() {
        map.append(child.name.as_str(), child_to_node(child));
    }

    if map.is_empty() {
        Node::Text(element.text())
    } else {
        Node::Map(map)
    }
}

/// Convert a child element to a node.
///
/// Elements with children recurse through [`element_to_node`]. A leaf with
/// attributes becomes `{@attr..., _value: text}` and never collapses to text,
/// so callers can tell a plain leaf from one carrying metadata.
pub fn child_to_node(element: &Element) -> Node {
    if element.has_child_elements() {
        return element_to_node(element);
    }

    if element.attributes.is_empty() {
        return Node::Text(element.text());
    }

    let mut map = NodeMap::with_capacity(element.attributes.len() + 1);
    for (name, value) in &element.attributes {
        map.insert(format!("{ATTRIBUTE_PREFIX}{name}"), value.as_str());
    }
    map.insert(VALUE_KEY, element.text());
    Node::Map(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_simple_leaf_is_text() -> Result<()> {
        assert_eq!(parse("<root>hello</root>")?, Node::from("hello"));
        Ok(())
    }

    #[test]
    fn test_empty_input_is_empty_map() -> Result<()> {
        assert_eq!(parse("")?, Node::Map(NodeMap::new()));
        assert_eq!(parse("  \n\t ")?, Node::Map(NodeMap::new()));
        Ok(())
    }

    #[test]
    fn test_empty_root_is_empty_text() -> Result<()> {
        assert_eq!(parse("<response/>")?, Node::from(""));
        Ok(())
    }

    #[test]
    fn test_root_attributes_drop_text() -> Result<()> {
        let node = parse(r#"<root id="5">text</root>"#)?;
        let expected: NodeMap = [("@id", "5")].into_iter().collect();
        assert_eq!(node, Node::Map(expected));
        Ok(())
    }

    #[test]
    fn test_child_with_attributes_keeps_value() -> Result<()> {
        let node = parse(r#"<root><available closed="true">N</available></root>"#)?;
        let expected: NodeMap = [("@closed", "true"), ("_value", "N")].into_iter().collect();
        assert_eq!(node.get("available"), Some(&Node::Map(expected)));
        Ok(())
    }

    #[test]
    fn test_repeated_children_become_list() -> Result<()> {
        let one = parse("<root><item>a</item></root>")?;
        assert_eq!(one.get("item"), Some(&Node::from("a")));

        let two = parse("<root><item>a</item><item>b</item></root>")?;
        assert_eq!(
            two.get("item"),
            Some(&Node::List(vec!["a".into(), "b".into()]))
        );
        Ok(())
    }

    #[test]
    fn test_interleaved_repeats_keep_first_position() -> Result<()> {
        let node = parse("<r><a>1</a><b>x</b><a>2</a></r>")?;
        let keys: Vec<_> = node
            .as_map()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(node.get("a").map(|a| a.as_list().len()), Some(2));
        Ok(())
    }

    #[test]
    fn test_malformed_input_is_error() {
        let err = parse("<root><unclosed></root>").err();
        assert!(matches!(
            err.as_ref().map(|e| e.kind()),
            Some(ErrorKind::MismatchedTag { .. })
        ));
        assert!(err
            .map(|e| e.to_string().starts_with("XML Parse Error: "))
            .unwrap_or(false));
    }
}
