//! Settings type definitions

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::project::{ResolverOptions, DEFAULT_RESERVED_KEYWORDS};

/// How server host keys are checked when dialing a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HostKeyPolicy {
    /// Require the key to be listed in `known_hosts`
    #[default]
    KnownHosts,
    /// Accept any host key (vulnerable to impersonation)
    AcceptAny,
}

impl HostKeyPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            HostKeyPolicy::KnownHosts => "known-hosts",
            HostKeyPolicy::AcceptAny => "accept-any",
        }
    }
}

impl fmt::Display for HostKeyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HostKeyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "known-hosts" | "known_hosts" | "strict" => Ok(HostKeyPolicy::KnownHosts),
            "accept-any" | "accept_any" | "insecure" => Ok(HostKeyPolicy::AcceptAny),
            other => Err(format!(
                "unknown host key policy '{}' (expected \"known-hosts\" or \"accept-any\")",
                other
            )),
        }
    }
}

/// Tool-level settings (`~/.config/nyo/config.toml`)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,

    /// Trust registry location on every node
    #[serde(default = "default_registry_path")]
    pub registry_path: String,

    /// SSH client configuration, `~/.ssh/config` when unset
    #[serde(default)]
    pub ssh_config: Option<PathBuf>,

    /// Known hosts file, `~/.ssh/known_hosts` when unset
    #[serde(default)]
    pub known_hosts: Option<PathBuf>,

    #[serde(default)]
    pub host_key_policy: HostKeyPolicy,

    /// Nodes authenticated at once; 1 is strictly sequential
    #[serde(default = "default_max_parallel_nodes")]
    pub max_parallel_nodes: usize,

    #[serde(default = "default_reserved_keywords")]
    pub reserved_keywords: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout_secs(),
            command_timeout_secs: default_command_timeout_secs(),
            registry_path: default_registry_path(),
            ssh_config: None,
            known_hosts: None,
            host_key_policy: HostKeyPolicy::default(),
            max_parallel_nodes: default_max_parallel_nodes(),
            reserved_keywords: default_reserved_keywords(),
        }
    }
}

impl Settings {
    /// Dial timeout, never shorter than one second
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs.max(1))
    }

    /// Registry command timeout, never shorter than one second
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs.max(1))
    }

    /// SSH client config path, relative to `home` unless overridden.
    pub fn ssh_config_path(&self, home: &Path) -> PathBuf {
        self.ssh_config
            .clone()
            .unwrap_or_else(|| home.join(".ssh").join("config"))
    }

    pub fn known_hosts_path(&self, home: &Path) -> PathBuf {
        self.known_hosts
            .clone()
            .unwrap_or_else(|| home.join(".ssh").join("known_hosts"))
    }

    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions::default().with_reserved_keywords(self.reserved_keywords.clone())
    }
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_command_timeout_secs() -> u64 {
    30
}

fn default_registry_path() -> String {
    "/etc/nyo_users".to_string()
}

fn default_max_parallel_nodes() -> usize {
    1
}

fn default_reserved_keywords() -> Vec<String> {
    DEFAULT_RESERVED_KEYWORDS
        .iter()
        .map(|s| s.to_string())
        .collect()
}
