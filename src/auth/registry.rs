//! Node trust registry
//!
//! Each node keeps a plain-text registry mapping users' public keys to roles,
//! one entry per line:
//!
//! ```text
//! alice ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAI... admin
//! bob   ssh-rsa     AAAAB3NzaC1yc2EAAAADAQAB... deployer
//! ```
//!
//! The first field names the user, the second and third are the key, the
//! last field is the role. Blank lines and `#` comments are ignored.

use tracing::warn;

use crate::ssh::AuthorizedKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    pub user: String,
    pub key: AuthorizedKey,
    pub role: String,
    pub line: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrustRegistry {
    entries: Vec<RegistryEntry>,
}

impl TrustRegistry {
    pub fn parse(text: &str) -> Self {
        let mut entries = Vec::new();

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 4 {
                warn!(
                    line = index + 1,
                    fields = fields.len(),
                    "skipping malformed trust registry entry"
                );
                continue;
            }

            entries.push(RegistryEntry {
                user: fields[0].to_string(),
                key: AuthorizedKey::new(fields[1], fields[2]),
                role: fields[fields.len() - 1].to_string(),
                line: index + 1,
            });
        }

        Self { entries }
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Role of the first entry whose key equals `key`.
    pub fn role_for(&self, key: &AuthorizedKey) -> Option<&str> {
        let mut matching = self.entries.iter().filter(|entry| &entry.key == key);
        let first = matching.next()?;

        for other in matching.filter(|other| other.role != first.role) {
            warn!(
                first_line = first.line,
                other_line = other.line,
                role = %first.role,
                ignored_role = %other.role,
                "key listed more than once with different roles; using the first"
            );
        }

        Some(&first.role)
    }
}
