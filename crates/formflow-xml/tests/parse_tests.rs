use formflow_xml::{child_to_node, element_to_node, from_xml_str, parse, ErrorKind, Node, NodeMap};

fn map(entries: &[(&str, &str)]) -> Node {
    Node::Map(entries.iter().copied().collect())
}

#[test]
fn test_simple_leaf_collapses_to_text() -> Result<(), Box<dyn std::error::Error>> {
    assert_eq!(parse("<root>hello</root>")?, Node::from("hello"));
    Ok(())
}

#[test]
fn test_attribute_paths_differ() -> Result<(), Box<dyn std::error::Error>> {
    let doc = from_xml_str(r#"<root id="5">text</root>"#)?;

    assert_eq!(element_to_node(&doc.root), map(&[("@id", "5")]));
    assert_eq!(
        child_to_node(&doc.root),
        map(&[("@id", "5"), ("_value", "text")])
    );
    Ok(())
}

#[test]
fn test_paths_agree_without_attributes() -> Result<(), Box<dyn std::error::Error>> {
    let doc = from_xml_str("<root>plain</root>")?;
    assert_eq!(element_to_node(&doc.root), child_to_node(&doc.root));

    let doc = from_xml_str("<root><a>1</a></root>")?;
    assert_eq!(element_to_node(&doc.root), child_to_node(&doc.root));
    Ok(())
}

#[test]
fn test_repetition_collapsing() -> Result<(), Box<dyn std::error::Error>> {
    assert_eq!(parse("<root><item>a</item></root>")?, map(&[("item", "a")]));

    let mut expected = NodeMap::new();
    expected.insert("item", Node::List(vec!["a".into(), "b".into()]));
    assert_eq!(
        parse("<root><item>a</item><item>b</item></root>")?,
        Node::Map(expected)
    );
    Ok(())
}

#[test]
fn test_repetition_for_many_siblings() -> Result<(), Box<dyn std::error::Error>> {
    for n in 1..=12usize {
        let items: String = (0..n).map(|i| format!("<item>{i}</item>")).collect();
        let node = parse(&format!("<root>{items}</root>"))?;
        let item = node.get("item").ok_or("missing item")?;
        if n == 1 {
            assert!(item.is_text(), "single item should stay bare");
        } else {
            assert_eq!(item.as_list().len(), n);
            assert!(item.is_list());
        }
    }
    Ok(())
}

#[test]
fn test_vendor_style_response() -> Result<(), Box<dyn std::error::Error>> {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<response version="2">
    <validation>
        <valid>Y</valid>
        <customer type="residential">
            <name>Pat Doe</name>
            <address>12 Elm &amp; Main</address>
        </customer>
    </validation>
</response>"#;

    let node = parse(xml)?;
    assert_eq!(node.get("@version"), Some(&Node::from("2")));
    assert_eq!(
        node.get_path("validation/valid").and_then(Node::as_text),
        Some("Y")
    );
    assert_eq!(
        node.get_path("validation/customer/@type")
            .and_then(Node::as_text),
        Some("residential")
    );
    assert_eq!(
        node.get_path("validation/customer/address")
            .and_then(Node::as_text),
        Some("12 Elm & Main")
    );
    Ok(())
}

#[test]
fn test_text_is_kept_verbatim() -> Result<(), Box<dyn std::error::Error>> {
    let node = parse("<r><msg>  padded  </msg><blank>   </blank></r>")?;
    assert_eq!(node.get("msg"), Some(&Node::from("  padded  ")));
    assert_eq!(node.get("blank"), Some(&Node::from("   ")));
    Ok(())
}

#[test]
fn test_indentation_between_children_is_ignored() -> Result<(), Box<dyn std::error::Error>> {
    let node = parse("<r>\n  <a>1</a>\n  <b x=\"2\"> </b>\n</r>\n")?;
    assert_eq!(node.get("a"), Some(&Node::from("1")));
    assert_eq!(node.get("b"), Some(&map(&[("@x", "2"), ("_value", " ")])));
    assert_eq!(node.as_map().map(NodeMap::len), Some(2));
    Ok(())
}

#[test]
fn test_mixed_content_drops_text() -> Result<(), Box<dyn std::error::Error>> {
    let node = parse("<r><note>see <b>this</b> please</note></r>")?;
    assert_eq!(node.get("note"), Some(&map(&[("b", "this")])));
    Ok(())
}

#[test]
fn test_comments_and_cdata() -> Result<(), Box<dyn std::error::Error>> {
    let node = parse("<r><!-- c --><msg><![CDATA[<b>bold</b>]]></msg><?pi x?></r>")?;
    assert_eq!(node, map(&[("msg", "<b>bold</b>")]));
    Ok(())
}

#[test]
fn test_namespaced_names_are_kept() -> Result<(), Box<dyn std::error::Error>> {
    let node = parse(r#"<s:Envelope xmlns:s="urn:x"><s:Body>ok</s:Body></s:Envelope>"#)?;
    assert_eq!(node.get("@xmlns:s"), Some(&Node::from("urn:x")));
    assert_eq!(node.get("s:Body"), Some(&Node::from("ok")));
    Ok(())
}

#[test]
fn test_whitespace_only_input_is_empty_map() -> Result<(), Box<dyn std::error::Error>> {
    assert_eq!(parse("\n \t")?, Node::Map(NodeMap::new()));
    Ok(())
}

#[test]
fn test_malformed_errors_carry_first_diagnostic() {
    let cases = [
        ("<root>", "premature end of data in tag root"),
        ("<a></b>", "opening and ending tag mismatch: a and b"),
        ("<a x=1/>", "expected quoted attribute value"),
        ("just text", "start tag expected, '<' not found"),
    ];
    for (input, message) in cases {
        match parse(input) {
            Ok(node) => panic!("expected failure for {input:?}, got {node:?}"),
            Err(err) => {
                assert_eq!(err.message(), message, "input {input:?}");
                assert!(err.to_string().starts_with("XML Parse Error: "));
            }
        }
    }
}

#[test]
fn test_missing_root_after_prolog() {
    let err = parse("<?xml version=\"1.0\"?><!-- only a comment -->").err();
    assert_eq!(err.map(|e| e.kind().clone()), Some(ErrorKind::MissingRoot));
}

#[test]
fn test_errors_do_not_leak_between_calls() -> Result<(), Box<dyn std::error::Error>> {
    assert!(parse("<broken>").is_err());
    assert_eq!(parse("<ok>fine</ok>")?, Node::from("fine"));
    assert!(parse("<a><b></a>").is_err());
    assert_eq!(parse("<ok>again</ok>")?, Node::from("again"));
    Ok(())
}
