//! Fuzz target for dataset registry JSON parsing.
//!
//! Run with:
//!   cargo +nightly fuzz run registry_json_parse

#![no_main]

use compass_data::tables::io::registry_from_json_slice;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Registries are small; 1MB is far beyond any real one.
    if data.len() > 1024 * 1024 {
        return;
    }

    let _ = registry_from_json_slice(data);
});
