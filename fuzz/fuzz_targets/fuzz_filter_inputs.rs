#![no_main]
use libfuzzer_sys::fuzz_target;

use agent_portal::adapters::fixtures::fixture_properties;
use agent_portal::domain::filter::{PriceInput, PropertyFilters, filter_properties};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let mut fields = text.splitn(4, '\n');
        let filters = PropertyFilters {
            search_term: fields.next().unwrap_or_default().to_string(),
            price_range: PriceInput::new(
                fields.next().unwrap_or_default(),
                fields.next().unwrap_or_default(),
            ),
            rooms: fields.next().unwrap_or_default().to_string(),
            ..Default::default()
        };
        let properties = fixture_properties();
        let result = filter_properties(&filters, &properties);
        assert!(result.len() <= properties.len());
    }
});
