#![no_main]
use formflow_xml::{parse_with_config, Config, XmlParser};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut parser = XmlParser::new(data);
    let _ = parser.parse();
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = parse_with_config(s, Config::new(32, 0));
    }
});
