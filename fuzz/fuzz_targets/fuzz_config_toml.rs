#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Config parsing and the values derived from it must never panic
        if let Ok(config) = toml::from_str::<siteforge::Config>(content) {
            let _ = config.repo();
            let _ = config.output_layout();
            let _ = config.production_filter();
        }
    }
});
