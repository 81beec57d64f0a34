//! Property tests for SSH client configuration lookup.

use proptest::prelude::*;

use nyo::ssh::SshClientConfig;

fn alias() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9-]{0,12}").unwrap()
}

proptest! {
    /// PROPERTY: parsing arbitrary text never panics.
    #[test]
    fn property_parse_never_panics(text in "(?s).{0,400}", host in alias()) {
        let config = SshClientConfig::parse(&text);
        let _ = config.get(&host, "HostName");
    }

    /// PROPERTY: a literal Host block answers for its alias, regardless of keyword case.
    #[test]
    fn property_literal_host_lookup(name in alias(), hostname in alias(), upper in any::<bool>()) {
        let keyword = if upper { "HOSTNAME" } else { "hostname" };
        let text = format!("Host {name}\n  {keyword} {hostname}\n");
        let config = SshClientConfig::parse(&text);
        prop_assert_eq!(config.get(&name, "HostName"), Some(hostname.as_str()));
    }

    /// PROPERTY: a negated pattern always excludes its host.
    #[test]
    fn property_negation_excludes(name in alias()) {
        let text = format!("Host * !{name}\n  User someone\n");
        let config = SshClientConfig::parse(&text);
        prop_assert_eq!(config.get(&name, "User"), None);
    }
}
