//! Host alias to connection coordinates
//!
//! Nodes in `Nyo.toml` are named by the aliases of the user's OpenSSH client
//! configuration. Resolution reads that file on every call and requires
//! `HostName`, `User` and `IdentityFile` for the alias; `Port` defaults to 22.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Settings;
use crate::domain::ports::ConnectTarget;
use crate::error::IdentityError;
use crate::infrastructure::nyo_home_dir;

use super::client_config::SshClientConfig;

pub const DEFAULT_SSH_PORT: u16 = 22;

/// Everything needed to dial one node
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedNodeIdentity {
    pub alias: String,
    pub hostname: String,
    pub port: u16,
    pub username: String,
    pub identity_file: PathBuf,
    /// Raw private key file contents, possibly encrypted
    pub key_bytes: Vec<u8>,
}

impl ResolvedNodeIdentity {
    pub fn connect_target(&self) -> ConnectTarget {
        ConnectTarget {
            hostname: self.hostname.clone(),
            port: self.port,
            username: self.username.clone(),
        }
    }
}

impl fmt::Debug for ResolvedNodeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedNodeIdentity")
            .field("alias", &self.alias)
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("identity_file", &self.identity_file)
            .field("key_bytes", &format_args!("<{} bytes>", self.key_bytes.len()))
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct SshIdentityResolver {
    config_path: PathBuf,
    home: PathBuf,
}

impl SshIdentityResolver {
    pub fn new(config_path: impl Into<PathBuf>, home: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            home: home.into(),
        }
    }

    /// Resolver reading the configured ssh config (default `~/.ssh/config`).
    pub fn from_settings(settings: &Settings) -> Result<Self, IdentityError> {
        let home = nyo_home_dir().ok_or(IdentityError::HomeDirUnavailable)?;
        Ok(Self::new(settings.ssh_config_path(&home), home))
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn resolve(&self, alias: &str) -> Result<ResolvedNodeIdentity, IdentityError> {
        let text =
            fs::read_to_string(&self.config_path).map_err(|source| IdentityError::SshConfigRead {
                path: self.config_path.clone(),
                source,
            })?;
        let config = SshClientConfig::parse(&text);

        let required = |attribute: &'static str| {
            config
                .get(alias, attribute)
                .filter(|value| !value.trim().is_empty())
                .map(str::to_string)
                .ok_or_else(|| IdentityError::MissingHostAttribute {
                    attribute,
                    host: alias.to_string(),
                })
        };

        let hostname = required("HostName")?;
        let username = required("User")?;
        let raw_identity = required("IdentityFile")?;

        let port = match config.get(alias, "Port") {
            None => DEFAULT_SSH_PORT,
            Some(value) => value.parse().map_err(|_| IdentityError::InvalidPort {
                host: alias.to_string(),
                value: value.to_string(),
            })?,
        };

        let identity_file = expand_identity_path(&raw_identity, &self.home, &hostname, &username);
        let key_bytes = fs::read(&identity_file).map_err(|source| IdentityError::KeyRead {
            path: identity_file.clone(),
            source,
        })?;

        debug!(
            alias,
            hostname = %hostname,
            port,
            user = %username,
            identity_file = %identity_file.display(),
            "resolved node identity"
        );

        Ok(ResolvedNodeIdentity {
            alias: alias.to_string(),
            hostname,
            port,
            username,
            identity_file,
            key_bytes,
        })
    }
}

/// Expand `%d`, `%h`, `%r`, `%%` and a leading `~` in an `IdentityFile` value.
///
/// Unknown `%` tokens are kept as written.
pub fn expand_identity_path(raw: &str, home: &Path, hostname: &str, user: &str) -> PathBuf {
    let mut expanded = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            expanded.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('d') => expanded.push_str(&home.to_string_lossy()),
            Some('h') => expanded.push_str(hostname),
            Some('r') => expanded.push_str(user),
            Some('%') => expanded.push('%'),
            _ => {
                expanded.push('%');
                continue;
            }
        }
        chars.next();
    }

    if expanded == "~" {
        home.to_path_buf()
    } else if let Some(rest) = expanded.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(expanded)
    }
}
