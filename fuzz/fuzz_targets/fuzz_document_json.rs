#![no_main]

use libfuzzer_sys::fuzz_target;
use siteforge::domain::services::SeoOverrides;
use siteforge::{PageGenerator, WebsiteDocument};

fuzz_target!(|data: &[u8]| {
    // Any document the parser accepts either compiles or fails cleanly
    if let Ok(document) = serde_json::from_slice::<WebsiteDocument>(data) {
        let _ = PageGenerator::default().generate(&document, &SeoOverrides::new());
    }
});
