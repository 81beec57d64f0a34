//! SSH transport backed by `russh`

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use russh::client::{self, Handle};
use russh::{ChannelMsg, Disconnect};
use russh_keys::key::PublicKey;
use tracing::{debug, warn};

use crate::config::HostKeyPolicy;
use crate::domain::ports::{CommandOutput, ConnectTarget, NodeConnector, RemoteSession};
use crate::error::{AuthError, TransportError};
use crate::ssh::IdentityKey;

/// Dials nodes over SSH with public key authentication only
#[derive(Debug, Clone)]
pub struct RusshConnector {
    host_key_policy: HostKeyPolicy,
    known_hosts: PathBuf,
}

impl RusshConnector {
    pub fn new(host_key_policy: HostKeyPolicy, known_hosts: impl Into<PathBuf>) -> Self {
        Self {
            host_key_policy,
            known_hosts: known_hosts.into(),
        }
    }
}

#[async_trait]
impl NodeConnector for RusshConnector {
    type Session = RusshSession;

    async fn connect(
        &self,
        target: &ConnectTarget,
        key: &IdentityKey,
    ) -> Result<RusshSession, AuthError> {
        let addr = target.addr();
        let handler = ClientHandler {
            host: target.hostname.clone(),
            port: target.port,
            policy: self.host_key_policy,
            known_hosts: self.known_hosts.clone(),
        };
        let config = Arc::new(client::Config::default());

        let mut handle = client::connect(config, (target.hostname.as_str(), target.port), handler)
            .await
            .map_err(|e| connect_error(e, &addr))?;

        let accepted = handle
            .authenticate_publickey(target.username.as_str(), Arc::new(key.key_pair().clone()))
            .await
            .map_err(|e| connect_error(e, &addr))?;

        if !accepted {
            let _ = handle
                .disconnect(Disconnect::ByApplication, "", "English")
                .await;
            return Err(AuthError::AuthenticationRejected {
                user: target.username.clone(),
                addr,
            });
        }

        debug!(addr = %addr, user = %target.username, "ssh session established");
        Ok(RusshSession {
            handle,
            closed: false,
        })
    }
}

/// Authenticated connection to one node
pub struct RusshSession {
    handle: Handle<ClientHandler>,
    closed: bool,
}

#[async_trait]
impl RemoteSession for RusshSession {
    async fn exec(&mut self, command: &str) -> Result<CommandOutput, TransportError> {
        if self.closed {
            return Err(TransportError::Session("session already closed".to_string()));
        }

        let mut channel = self
            .handle
            .channel_open_session()
            .await
            .map_err(|e| TransportError::Session(e.to_string()))?;
        channel
            .exec(true, command)
            .await
            .map_err(|e| TransportError::Protocol(e.to_string()))?;

        let mut output = CommandOutput::default();
        while let Some(msg) = channel.wait().await {
            match msg {
                ChannelMsg::Data { ref data } => output.stdout.extend_from_slice(data),
                // stderr
                ChannelMsg::ExtendedData { ref data, ext: 1 } => {
                    output.stderr.extend_from_slice(data)
                }
                ChannelMsg::ExitStatus { exit_status } => output.exit_status = Some(exit_status),
                _ => {}
            }
        }

        debug!(command, exit_status = ?output.exit_status, "remote command finished");
        Ok(output)
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.handle
            .disconnect(Disconnect::ByApplication, "", "English")
            .await
            .map_err(|e| TransportError::Protocol(e.to_string()))
    }
}

pub struct ClientHandler {
    host: String,
    port: u16,
    policy: HostKeyPolicy,
    known_hosts: PathBuf,
}

#[async_trait]
impl client::Handler for ClientHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> Result<bool, Self::Error> {
        match self.policy {
            HostKeyPolicy::AcceptAny => {
                warn!(
                    host = %self.host,
                    port = self.port,
                    "host key verification disabled by host_key_policy = \"accept-any\""
                );
                Ok(true)
            }
            HostKeyPolicy::KnownHosts => {
                if !self.known_hosts.exists() {
                    warn!(
                        host = %self.host,
                        known_hosts = %self.known_hosts.display(),
                        "known_hosts file not found; refusing unknown host key"
                    );
                    return Ok(false);
                }

                let known = russh_keys::check_known_hosts_path(
                    &self.host,
                    self.port,
                    server_public_key,
                    &self.known_hosts,
                )?;
                if !known {
                    warn!(
                        host = %self.host,
                        port = self.port,
                        "host key not present in known_hosts"
                    );
                }
                Ok(known)
            }
        }
    }
}

fn connect_error(err: russh::Error, addr: &str) -> AuthError {
    match err {
        russh::Error::UnknownKey => AuthError::HostKeyRefused {
            addr: addr.to_string(),
            reason: "host key is not in known_hosts".to_string(),
        },
        russh::Error::Keys(russh_keys::Error::KeyChanged { line }) => AuthError::HostKeyRefused {
            addr: addr.to_string(),
            reason: format!("host key does not match known_hosts line {line}"),
        },
        other => AuthError::Connect {
            addr: addr.to_string(),
            reason: other.to_string(),
        },
    }
}
