//! Settings loading
//!
//! Priority, highest first:
//! 1. Environment variables (`NYO_*`)
//! 2. User settings (`$XDG_CONFIG_HOME/nyo/config.toml`, else `~/.config/nyo/config.toml`)
//! 3. Built-in defaults

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::ConfigError;
use crate::infrastructure::home::nyo_home_dir;

use super::types::{HostKeyPolicy, Settings};

/// Non-fatal settings warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl fmt::Display for SettingsWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown setting '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

const SETTINGS_KEYS: &[&str] = &[
    "connect_timeout_secs",
    "command_timeout_secs",
    "registry_path",
    "ssh_config",
    "known_hosts",
    "host_key_policy",
    "max_parallel_nodes",
    "reserved_keywords",
];

/// Load settings and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> Result<(Settings, Vec<SettingsWarning>), ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let settings: Settings = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ConfigError::Settings {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            SettingsWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key, SETTINGS_KEYS),
            }
        })
        .collect();

    Ok((settings, warnings))
}

/// Load user settings if present, defaults otherwise, then apply env overrides.
pub fn load() -> Result<(Settings, Vec<SettingsWarning>), ConfigError> {
    let (settings, warnings) = match settings_path() {
        Some(path) if path.is_file() => load_with_warnings(&path)?,
        _ => (Settings::default(), Vec::new()),
    };
    Ok((with_env_overrides(settings), warnings))
}

/// Location of the user settings file
pub fn settings_path() -> Option<PathBuf> {
    dirs_config_dir().map(|dir| dir.join("nyo").join("config.toml"))
}

/// Apply environment variable overrides (NYO_* prefix)
pub fn with_env_overrides(settings: Settings) -> Settings {
    apply_overrides(settings, |key| std::env::var(key).ok())
}

pub(crate) fn apply_overrides<F>(mut settings: Settings, lookup: F) -> Settings
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(secs) = parse_var::<u64, _>(&lookup, "NYO_CONNECT_TIMEOUT") {
        settings.connect_timeout_secs = secs.max(1);
    }

    if let Some(secs) = parse_var::<u64, _>(&lookup, "NYO_COMMAND_TIMEOUT") {
        settings.command_timeout_secs = secs.max(1);
    }

    if let Some(path) = lookup("NYO_REGISTRY_PATH").filter(|p| !p.trim().is_empty()) {
        settings.registry_path = path;
    }

    if let Some(path) = lookup("NYO_SSH_CONFIG").filter(|p| !p.trim().is_empty()) {
        settings.ssh_config = Some(PathBuf::from(path));
    }

    if let Some(path) = lookup("NYO_KNOWN_HOSTS").filter(|p| !p.trim().is_empty()) {
        settings.known_hosts = Some(PathBuf::from(path));
    }

    if let Some(policy) = lookup("NYO_HOST_KEY_POLICY") {
        match policy.parse::<HostKeyPolicy>() {
            Ok(policy) => settings.host_key_policy = policy,
            Err(message) => warn!(var = "NYO_HOST_KEY_POLICY", "{}", message),
        }
    }

    if let Some(n) = parse_var::<usize, _>(&lookup, "NYO_MAX_PARALLEL_NODES") {
        settings.max_parallel_nodes = n.max(1);
    }

    settings
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(var = key, value = %raw, "ignoring unparsable environment override");
            None
        }
    }
}

/// Get XDG config directory
fn dirs_config_dir() -> Option<PathBuf> {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| nyo_home_dir().map(|h| h.join(".config")))
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

/// Closest candidate within edit distance 2, if any.
pub fn suggest_key(unknown: &str, candidates: &[&str]) -> Option<String> {
    let mut best: Option<(&str, usize)> = None;
    for &candidate in candidates {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
