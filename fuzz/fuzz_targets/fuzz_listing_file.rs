#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let _ = agent_portal::adapters::file_source::parse_listing_file(content, false);
        let _ = agent_portal::adapters::file_source::parse_listing_file(content, true);
    }
});
