#![no_main]
use libfuzzer_sys::fuzz_target;
use xmljson::{json_to_xml, ErrorKind};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Err(err) = json_to_xml(s) {
            assert_ne!(err.kind(), &ErrorKind::Write);
        }
    }
});
