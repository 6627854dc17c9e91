use std::collections::HashSet;

use proptest::prelude::*;

use medsafe_extract::{detect_medicines, parse_backend_response, MAX_DETECTED};

proptest! {
    #[test]
    fn detected_names_are_well_formed(text in "[A-Za-z0-9 ,.;:/()-]{0,200}") {
        let found = detect_medicines(&text);
        prop_assert!(found.len() <= MAX_DETECTED);

        let mut seen = HashSet::new();
        for name in &found {
            prop_assert!(name.len() > 2 && name.len() <= 31);
            prop_assert!(name.chars().next().unwrap().is_ascii_alphabetic());
            prop_assert!(name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'));
            prop_assert!(text.contains(name.as_str()));
            prop_assert!(seen.insert(name.to_ascii_lowercase()));
        }
    }

    #[test]
    fn parse_never_panics(raw in ".{0,120}") {
        let _ = parse_backend_response(&raw);
    }

    #[test]
    fn detected_list_passes_through(names in prop::collection::vec("[a-z]{3,10}", 0..5)) {
        let raw = serde_json::json!({ "detected_medicines": names }).to_string();
        let response = parse_backend_response(&format!("reply: {raw}")).unwrap();
        prop_assert_eq!(response.medicine_names(), names);
    }
}
