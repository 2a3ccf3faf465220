//! Fuzz target for reading stored values back through accessors.
//!
//! This fuzzer writes arbitrary bytes under a key and reads them through
//! accessors of several types to ensure:
//! 1. No stored payload causes a panic
//! 2. Undecodable payloads yield the default
//! 3. A value written after garbage reads back unchanged
//!
//! Run with: `cargo +nightly fuzz run fuzz_accessor_decode`

#![no_main]

use arbitrary::Arbitrary;
use kvprop::Store;
use libfuzzer_sys::fuzz_target;
use serde::{Deserialize, Serialize};

#[derive(Arbitrary, Debug, Clone, PartialEq, Serialize, Deserialize)]
struct City {
    name: String,
    population: Option<u64>,
}

#[derive(Arbitrary, Debug)]
struct DecodeInput {
    /// Bytes planted in the store before reading
    payload: Vec<u8>,
    /// Value written after the garbage read
    replacement: City,
}

fuzz_target!(|input: DecodeInput| {
    let store = Store::memory();
    store
        .set_bytes("city", &input.payload)
        .expect("memory backend never fails");

    let default = City {
        name: "Tokyo".into(),
        population: None,
    };
    let city = store.accessor("city", default.clone());
    if city.try_get().is_err() {
        assert_eq!(city.get(), default);
    }

    // Other types reading the same bytes must not panic either
    let _ = store.accessor("city", 0i64).get();
    let _ = store.accessor("city", String::new()).get();
    let _ = store.optional::<Vec<u8>>("city").get();

    city.set(input.replacement.clone());
    assert_eq!(city.get(), input.replacement);
});
