#![no_main]
use libfuzzer_sys::fuzz_target;
use xmljson::{json_to_internal, xml_to_json};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        for strip in [true, false] {
            if let Ok(json) = xml_to_json(s, strip) {
                // whatever encode produces must read back as one tag
                assert!(json_to_internal(&json).is_ok());
            }
        }
    }
});
