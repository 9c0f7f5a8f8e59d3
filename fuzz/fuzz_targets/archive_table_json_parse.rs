//! Fuzz target for archive table JSON parsing and key lookup.
//!
//! Parsed tables are also queried with a few path spellings so the
//! containment fallback sees arbitrary keys.
//!
//! Run with:
//!   cargo +nightly fuzz run archive_table_json_parse

#![no_main]

use compass_data::tables::io::archive_table_from_json_slice;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 * 1024 {
        return;
    }

    if let Ok(table) = archive_table_from_json_slice(data) {
        for path in ["./data/gsm8k/", "data/gsm8k", "/gsm8k", "", "/", "./"] {
            let _ = table.find(path);
        }
    }
});
