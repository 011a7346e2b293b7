//! Fuzz target for lock manifest (`project.assets.json`) parsing and graph building.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_lock_manifest
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = reftrim_repo::fuzz::parse_lock_manifest(text);
    }
});
