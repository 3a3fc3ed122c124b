#![no_main]
use formflow_xml::{parse_enrollment, parse_scheduling, parse_validation};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = parse_validation(s);
        let _ = parse_enrollment(s);
        let _ = parse_scheduling(s);
    }
});
