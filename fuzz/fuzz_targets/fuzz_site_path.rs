#![no_main]

use libfuzzer_sys::fuzz_target;
use siteforge::domain::value_objects::SitePath;

fuzz_target!(|data: &[u8]| {
    if let Ok(raw) = std::str::from_utf8(data) {
        if let Ok(path) = SitePath::new(raw) {
            // Normalized paths normalize to themselves
            assert_eq!(SitePath::new(path.as_str()).ok(), Some(path));
        }
    }
});
