#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let config = nyo::ssh::SshClientConfig::parse(content);
        let _ = config.get("server1", "HostName");
        let _ = config.has_host("server1");
    }
});
