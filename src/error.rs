//! Error types for nyo
//!
//! Every layer gets its own `thiserror` enum; `NyoError` wraps them with the
//! service/node context the deployment was in when it failed.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for nyo operations
pub type NyoResult<T> = Result<T, NyoError>;

/// Top-level error returned by a deployment attempt
#[derive(Error, Debug)]
pub enum NyoError {
    /// Project document could not be located, parsed or validated
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A node of a service failed identity resolution, authentication or execution
    #[error("failed to connect to the given node {node} (service {service}): {source}")]
    Node {
        service: String,
        node: String,
        #[source]
        source: NodeError,
    },
}

/// Failure while visiting a single node
#[derive(Error, Debug)]
pub enum NodeError {
    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The external executor reported a failure
    #[error("deployment executor failed: {0}")]
    Executor(#[source] anyhow::Error),
}

/// Errors raised while locating and resolving `Nyo.toml`
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing Nyo.toml file in {}", .dir.display())]
    MissingConfigFile { dir: PathBuf },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Nyo.toml is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("failed to parse Nyo.toml: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(
        "missing project name in your Nyo.toml file, please add a name at the beginning (e.g. name = \"example\")"
    )]
    MissingProjectName,

    #[error("invalid Nyo.toml:\n{0}")]
    Invalid(Violations),

    /// Tool settings file exists but could not be parsed
    #[error("invalid settings in {}: {message}", .path.display())]
    Settings { path: PathBuf, message: String },
}

impl ConfigError {
    /// Violations carried by an `Invalid` error, empty otherwise.
    pub fn violations(&self) -> &[Violation] {
        match self {
            ConfigError::Invalid(v) => &v.0,
            _ => &[],
        }
    }
}

/// Every violation found in a document, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct Violations(pub Vec<Violation>);

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  - {}", violation)?;
        }
        Ok(())
    }
}

/// A single schema violation inside one section
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Violation {
    #[error("section '{section}' must be a table, got {actual}")]
    NotATable {
        section: String,
        actual: &'static str,
    },

    #[error("section '{section}' has unknown kind '{kind}' (expected \"service\" or \"database\")")]
    UnknownKind { section: String, kind: String },

    #[error("service '{section}' is missing required '{field}' field")]
    MissingServiceField {
        section: String,
        field: &'static str,
    },

    #[error("database '{section}' is missing required '{field}' field")]
    MissingDatabaseField {
        section: String,
        field: &'static str,
    },

    #[error("'{field}' in section '{section}' must be {expected}, got {actual}")]
    WrongType {
        section: String,
        field: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("invalid '{field}' in section '{section}': {source}")]
    Coercion {
        section: String,
        field: &'static str,
        #[source]
        source: CoercionError,
    },

    #[error("'{field}' in section '{section}' must not contain empty values")]
    EmptyValue {
        section: String,
        field: &'static str,
    },
}

impl Violation {
    /// Section the violation was found in.
    pub fn section(&self) -> &str {
        match self {
            Violation::NotATable { section, .. }
            | Violation::UnknownKind { section, .. }
            | Violation::MissingServiceField { section, .. }
            | Violation::MissingDatabaseField { section, .. }
            | Violation::WrongType { section, .. }
            | Violation::Coercion { section, .. }
            | Violation::EmptyValue { section, .. } => section,
        }
    }
}

/// Failure converting a document value into a list of strings
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoercionError {
    #[error("expected array, got {actual}")]
    NotASequence { actual: &'static str },

    #[error("element at index {index} is not a string: {actual}")]
    NotText { index: usize, actual: &'static str },
}

/// Errors raised while turning a host alias into connection coordinates
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("failed to get home directory")]
    HomeDirUnavailable,

    #[error("failed to open ssh config file {}: {source}", .path.display())]
    SshConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {attribute} for Host {host}")]
    MissingHostAttribute {
        attribute: &'static str,
        host: String,
    },

    #[error("invalid Port '{value}' for Host {host}")]
    InvalidPort { host: String, value: String },

    #[error("failed to get key from IdentityFile {}: {source}", .path.display())]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while authenticating against a node and discovering the caller's role
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("failed to parse private key from IdentityFile {}: {reason}", .path.display())]
    PrivateKey { path: PathBuf, reason: String },

    #[error("{} is passphrase protected but no passphrase could be read: {reason}", .path.display())]
    PassphraseUnavailable { path: PathBuf, reason: String },

    #[error("failed to dial ssh connection {addr}: {reason}")]
    Connect { addr: String, reason: String },

    #[error("timed out after {secs}s dialing ssh connection {addr}")]
    ConnectTimeout { addr: String, secs: u64 },

    #[error("host key for {addr} was refused: {reason}")]
    HostKeyRefused { addr: String, reason: String },

    #[error("ssh authentication rejected for user {user} on {addr}")]
    AuthenticationRejected { user: String, addr: String },

    #[error("no matching user found in {registry} for your SSH key")]
    NoMatchingKey { registry: String },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// I/O failures on an already established session
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("failed to open a session with the ssh client: {0}")]
    Session(String),

    #[error("command `{command}` timed out after {secs}s")]
    CommandTimeout { command: String, secs: u64 },

    #[error("command `{command}` exited with status {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: u32,
        stderr: String,
    },

    #[error("ssh transport error: {0}")]
    Protocol(String),
}
