#![no_main]

use libfuzzer_sys::fuzz_target;
use nyo::ssh::AuthorizedKey;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let registry = nyo::TrustRegistry::parse(content);
        let _ = registry.role_for(&AuthorizedKey::new("ssh-ed25519", "AAAA"));
    }
});
