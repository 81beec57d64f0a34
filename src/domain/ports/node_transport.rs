//! NodeTransport port - authenticated remote-shell sessions to nodes
//!
//! The authenticator only needs to dial a node with a key and run one
//! read-only command on it; everything protocol-specific lives behind these
//! traits.

use async_trait::async_trait;

use crate::error::{AuthError, TransportError};
use crate::ssh::IdentityKey;

/// Where and as whom to connect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectTarget {
    pub hostname: String,
    pub port: u16,
    pub username: String,
}

impl ConnectTarget {
    /// `host:port`, bracketing IPv6 literals
    pub fn addr(&self) -> String {
        if self.hostname.contains(':') && !self.hostname.starts_with('[') {
            format!("[{}]:{}", self.hostname, self.port)
        } else {
            format!("{}:{}", self.hostname, self.port)
        }
    }
}

/// Captured result of a remote command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// `None` when the server closed the channel without reporting one
    pub exit_status: Option<u32>,
}

impl CommandOutput {
    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }
}

/// An open, authenticated session to one node
///
/// Whoever holds the session must call `close` on every exit path.
#[async_trait]
pub trait RemoteSession: Send {
    /// Run `command` and wait for it to finish.
    async fn exec(&mut self, command: &str) -> Result<CommandOutput, TransportError>;

    /// Release the session. Calling it twice is a no-op.
    async fn close(&mut self) -> Result<(), TransportError>;
}

/// Dials nodes using public key authentication
#[async_trait]
pub trait NodeConnector: Send + Sync {
    type Session: RemoteSession + 'static;

    /// Connect to `target`, authenticating with `key` only.
    async fn connect(
        &self,
        target: &ConnectTarget,
        key: &IdentityKey,
    ) -> Result<Self::Session, AuthError>;
}
