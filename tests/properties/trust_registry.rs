//! Property tests for trust registry lookups.

use proptest::prelude::*;

use nyo::auth::TrustRegistry;
use nyo::ssh::AuthorizedKey;

fn field() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9+/=@._-]{1,16}").unwrap()
}

proptest! {
    /// PROPERTY: a listed key resolves to the role of its first entry.
    #[test]
    fn property_listed_key_resolves_to_first_role(
        user in field(),
        algorithm in field(),
        data in field(),
        role in field(),
        later_role in field(),
    ) {
        prop_assume!(!user.starts_with('#'));
        let text = format!(
            "{user} {algorithm} {data} {role}\n{user}2 {algorithm} {data} {later_role}\n"
        );
        let registry = TrustRegistry::parse(&text);
        let key = AuthorizedKey::new(algorithm.as_str(), data.as_str());
        prop_assert_eq!(registry.role_for(&key), Some(role.as_str()));
    }

    /// PROPERTY: a key is never matched by a prefix or extension of its data.
    #[test]
    fn property_no_partial_matches(data in field(), extra in field()) {
        let text = format!("alice ssh-ed25519 {data}{extra} admin\n");
        let registry = TrustRegistry::parse(&text);
        prop_assert_eq!(registry.role_for(&AuthorizedKey::new("ssh-ed25519", data.as_str())), None);
    }

    /// PROPERTY: parsing arbitrary text never panics.
    #[test]
    fn property_parse_never_panics(text in ".{0,400}") {
        let registry = TrustRegistry::parse(&text);
        prop_assert!(registry.entries().iter().all(|e| !e.role.is_empty()));
    }
}
