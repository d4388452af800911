#![no_main]

use libfuzzer_sys::fuzz_target;
use siteforge::ProductionFilter;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // First line is the path, the rest is file content
        let (path, content) = match input.split_once('\n') {
            Some((path, content)) => (path, Some(content)),
            None => (input, None),
        };
        let _ = ProductionFilter::new().classify(path, content);
    }
});
