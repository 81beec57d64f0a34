#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Resolution must reject bad documents with an error, never a panic
    let _ = nyo::ConfigResolver::default().resolve(data);
});
