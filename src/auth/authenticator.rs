//! Node authentication and role discovery
//!
//! Authenticating against a node goes through three steps:
//!
//! 1. decode the identity's private key, prompting once for a passphrase
//! 2. dial the node with that key as the only authentication method
//! 3. read the node's trust registry and look up the caller's public key
//!
//! A node that accepts the key but does not list it is `Rejected`. The
//! session is released by the authenticator on every outcome except
//! `Authorized`, where ownership moves to the caller.

use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::domain::ports::{CredentialPrompt, NodeConnector, RemoteSession};
use crate::error::{AuthError, TransportError};
use crate::ssh::{decode_private_key, AuthorizedKey, ResolvedNodeIdentity};

use super::registry::TrustRegistry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthOptions {
    pub connect_timeout: Duration,
    pub command_timeout: Duration,
    /// Trust registry path on the node
    pub registry_path: String,
}

impl Default for AuthOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl AuthOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            connect_timeout: settings.connect_timeout(),
            command_timeout: settings.command_timeout(),
            registry_path: settings.registry_path.clone(),
        }
    }
}

/// Outcome of a completed authentication attempt
#[derive(Debug)]
pub enum Authorization<S> {
    /// The node lists the caller's key. The session is still open.
    Authorized { session: S, role: String },
    /// The node accepted the connection but its registry has no entry for
    /// the caller's key. The session has already been closed.
    Rejected { public_key: AuthorizedKey },
}

impl<S> Authorization<S> {
    pub fn role(&self) -> Option<&str> {
        match self {
            Authorization::Authorized { role, .. } => Some(role),
            Authorization::Rejected { .. } => None,
        }
    }
}

pub struct NodeAuthenticator<C, P> {
    connector: C,
    prompt: P,
    options: AuthOptions,
}

impl<C, P> NodeAuthenticator<C, P>
where
    C: NodeConnector,
    P: CredentialPrompt,
{
    pub fn new(connector: C, prompt: P, options: AuthOptions) -> Self {
        Self {
            connector,
            prompt,
            options,
        }
    }

    pub fn options(&self) -> &AuthOptions {
        &self.options
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    /// Read-only command printing the trust registry
    pub fn registry_command(&self) -> String {
        format!("cat {}", shell_quote(&self.options.registry_path))
    }

    pub async fn authenticate(
        &self,
        identity: &ResolvedNodeIdentity,
    ) -> Result<Authorization<C::Session>, AuthError> {
        let key = decode_private_key(&identity.key_bytes, &identity.identity_file, &self.prompt)?;
        let public_key =
            AuthorizedKey::from_public_key(key.public_key()).map_err(|e| AuthError::PrivateKey {
                path: identity.identity_file.clone(),
                reason: e.to_string(),
            })?;

        let target = identity.connect_target();
        let addr = target.addr();
        debug!(
            node = %identity.alias,
            addr = %addr,
            user = %target.username,
            key = %key.fingerprint(),
            "dialing node"
        );

        let mut session = match timeout(
            self.options.connect_timeout,
            self.connector.connect(&target, &key),
        )
        .await
        {
            Ok(connected) => connected?,
            Err(_) => {
                return Err(AuthError::ConnectTimeout {
                    addr,
                    secs: self.options.connect_timeout.as_secs(),
                })
            }
        };

        match self.discover_role(&mut session, &public_key).await {
            Ok(Some(role)) => {
                info!(node = %identity.alias, role = %role, "authorized on node");
                Ok(Authorization::Authorized { session, role })
            }
            Ok(None) => {
                release(&mut session, &identity.alias).await;
                warn!(
                    node = %identity.alias,
                    registry = %self.options.registry_path,
                    "no trust registry entry for this key"
                );
                Ok(Authorization::Rejected { public_key })
            }
            Err(err) => {
                release(&mut session, &identity.alias).await;
                Err(err)
            }
        }
    }

    async fn discover_role(
        &self,
        session: &mut C::Session,
        public_key: &AuthorizedKey,
    ) -> Result<Option<String>, AuthError> {
        let command = self.registry_command();
        let output = timeout(self.options.command_timeout, session.exec(&command))
            .await
            .map_err(|_| TransportError::CommandTimeout {
                command: command.clone(),
                secs: self.options.command_timeout.as_secs(),
            })??;

        if let Some(status) = output.exit_status.filter(|status| *status != 0) {
            return Err(TransportError::CommandFailed {
                command,
                status,
                stderr: output.stderr_lossy(),
            }
            .into());
        }

        let registry = TrustRegistry::parse(&output.stdout_lossy());
        debug!(entries = registry.entries().len(), "read trust registry");
        Ok(registry.role_for(public_key).map(str::to_string))
    }
}

/// Close `session`, logging instead of failing.
pub(crate) async fn release<S: RemoteSession>(session: &mut S, node: &str) {
    if let Err(e) = session.close().await {
        warn!(node, error = %e, "failed to close session");
    }
}

fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}
