use formflow_xml::{build, build_request, parse, Node, NodeMap, DEFAULT_ROOT};

#[test]
fn test_escaped_text_round_trips() -> Result<(), Box<dyn std::error::Error>> {
    let mut data = NodeMap::new();
    data.insert("name", "<script>&\"'");

    let xml = build_request(&data);
    assert!(xml.contains("<name>&lt;script&gt;&amp;&quot;&apos;</name>"));

    let parsed = parse(&xml)?;
    assert_eq!(parsed.get("name"), Some(&Node::from("<script>&\"'")));
    Ok(())
}

#[test]
fn test_escaped_attribute_round_trips() -> Result<(), Box<dyn std::error::Error>> {
    let mut data = NodeMap::new();
    data.insert("@note", "a<b & \"c\"");
    data.insert("caNo", "1");

    let parsed = parse(&build(&data, "request"))?;
    assert_eq!(parsed.get("@note"), Some(&Node::from("a<b & \"c\"")));
    Ok(())
}

#[test]
fn test_enrollment_request_shape() -> Result<(), Box<dyn std::error::Error>> {
    let mut customer = NodeMap::new();
    customer.insert("firstName", "Pat");
    customer.insert("lastName", "Doe");

    let mut devices = NodeMap::new();
    devices.insert(
        "device",
        Node::List(vec!["thermostat".into(), "water_heater".into()]),
    );

    let mut data = NodeMap::new();
    data.insert("@action", "enroll");
    data.insert("caNo", "1234567890");
    data.insert("customer", customer);
    data.insert("devices", devices);

    let xml = build_request(&data);
    assert!(xml.starts_with(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<request action=\"enroll\">"
    ));
    assert!(xml.contains(
        "<devices><device>thermostat</device><device>water_heater</device></devices>"
    ));

    let parsed = parse(&xml)?;
    assert_eq!(parsed.get("@action"), Some(&Node::from("enroll")));
    assert_eq!(
        parsed.get_path("customer/lastName").and_then(Node::as_text),
        Some("Doe")
    );
    assert_eq!(
        parsed.get_path("devices/device").map(|d| d.as_list().len()),
        Some(2)
    );
    Ok(())
}

#[test]
fn test_single_item_list_parses_back_bare() -> Result<(), Box<dyn std::error::Error>> {
    let mut data = NodeMap::new();
    data.insert("slot", Node::List(vec!["only".into()]));

    let parsed = parse(&build_request(&data))?;
    assert_eq!(parsed.get("slot"), Some(&Node::from("only")));
    Ok(())
}

#[test]
fn test_invalid_names_stay_well_formed() -> Result<(), Box<dyn std::error::Error>> {
    let mut data = NodeMap::new();
    data.insert("0", "zero");
    data.insert("first name", "Pat");
    data.insert("@bad attr", "x");

    let xml = build(&data, "my root");
    let parsed = parse(&xml)?;
    assert_eq!(parsed.get("_0"), Some(&Node::from("zero")));
    assert_eq!(parsed.get("first_name"), Some(&Node::from("Pat")));
    assert_eq!(parsed.get("@bad_attr"), Some(&Node::from("x")));
    assert!(xml.contains("<my_root "));
    Ok(())
}

#[test]
fn test_default_root() {
    assert_eq!(DEFAULT_ROOT, "request");
    assert!(build_request(&NodeMap::new()).contains("<request/>"));
}
