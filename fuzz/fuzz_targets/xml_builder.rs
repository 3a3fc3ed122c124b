#![no_main]
use formflow_xml::{build, parse, Node, NodeMap};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let mut request = NodeMap::new();
        for (i, part) in s.split('|').enumerate() {
            if i % 2 == 0 {
                request.append(part, Node::from(part));
            } else {
                request.insert(format!("@{part}"), part);
            }
        }
        let xml = build(&request, s);
        if let Err(err) = parse(&xml) {
            panic!("builder output rejected: {err}\n{xml}");
        }
    }
});
