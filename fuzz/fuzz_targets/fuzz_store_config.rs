//! Fuzz target for store configuration parsing.
//!
//! Ensures arbitrary TOML never panics the parser or validation, and that
//! accepted configurations always resolve a path.
//!
//! Run with: `cargo +nightly fuzz run fuzz_store_config`

#![no_main]

use kvprop::StoreConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let Ok(config) = StoreConfig::from_toml_str(data) else {
        return;
    };

    if config.validate().is_err() {
        return;
    }
    if let Some(path) = &config.path {
        assert_eq!(&config.resolved_path().expect("explicit path"), path);
    }
});
