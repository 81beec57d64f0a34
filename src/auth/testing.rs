//! In-memory transport and prompt doubles shared by unit tests

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ssh_key::rand_core::OsRng;
use ssh_key::{Algorithm, LineEnding, PrivateKey};

use crate::domain::ports::{
    CommandOutput, ConnectTarget, CredentialPrompt, NodeConnector, PromptError, RemoteSession,
};
use crate::error::{AuthError, TransportError};
use crate::ssh::{decode_private_key, AuthorizedKey, IdentityKey, ResolvedNodeIdentity};

pub(crate) fn generate_key() -> PrivateKey {
    PrivateKey::random(&mut OsRng, Algorithm::Ed25519).unwrap()
}

pub(crate) fn key_pem(key: &PrivateKey) -> Vec<u8> {
    key.to_openssh(LineEnding::LF).unwrap().as_bytes().to_vec()
}

pub(crate) fn identity_key(key: &PrivateKey) -> IdentityKey {
    decode_private_key(&key_pem(key), Path::new("id"), &ScriptedPrompt::new()).unwrap()
}

/// `comment type data role` line granting `role` to `key`
pub(crate) fn registry_line(user: &str, key: &PrivateKey, role: &str) -> String {
    let public = AuthorizedKey::from_public_key(key.public_key()).unwrap();
    format!("{user} {public} {role}\n")
}

pub(crate) fn identity(alias: &str, hostname: &str, key: &PrivateKey) -> ResolvedNodeIdentity {
    ResolvedNodeIdentity {
        alias: alias.to_string(),
        hostname: hostname.to_string(),
        port: 22,
        username: "deploy".to_string(),
        identity_file: PathBuf::from(format!("/keys/{alias}")),
        key_bytes: key_pem(key),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dial {
    Accept,
    Refuse,
    Hang,
}

#[derive(Debug, Clone)]
struct FakeNode {
    dial: Dial,
    registry: String,
    exit_status: Option<u32>,
    command_hangs: bool,
}

#[derive(Debug, Default)]
pub(crate) struct SessionLog {
    opened: AtomicUsize,
    closed: AtomicUsize,
    dropped: AtomicUsize,
    commands: Mutex<Vec<(String, String)>>,
}

/// Connector serving scripted nodes keyed by hostname
#[derive(Debug, Default)]
pub(crate) struct FakeConnector {
    nodes: HashMap<String, FakeNode>,
    log: Arc<SessionLog>,
}

impl FakeConnector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Node whose registry command prints `registry`
    pub(crate) fn node(mut self, hostname: &str, registry: impl Into<String>) -> Self {
        self.nodes.insert(
            hostname.to_string(),
            FakeNode {
                dial: Dial::Accept,
                registry: registry.into(),
                exit_status: Some(0),
                command_hangs: false,
            },
        );
        self
    }

    pub(crate) fn failing_registry(mut self, hostname: &str, status: u32) -> Self {
        self = self.node(hostname, "");
        if let Some(node) = self.nodes.get_mut(hostname) {
            node.exit_status = Some(status);
        }
        self
    }

    pub(crate) fn silent_exit(mut self, hostname: &str, registry: impl Into<String>) -> Self {
        self = self.node(hostname, registry);
        if let Some(node) = self.nodes.get_mut(hostname) {
            node.exit_status = None;
        }
        self
    }

    pub(crate) fn hanging_registry(mut self, hostname: &str) -> Self {
        self = self.node(hostname, "");
        if let Some(node) = self.nodes.get_mut(hostname) {
            node.command_hangs = true;
        }
        self
    }

    pub(crate) fn refusing(mut self, hostname: &str) -> Self {
        self = self.node(hostname, "");
        if let Some(node) = self.nodes.get_mut(hostname) {
            node.dial = Dial::Refuse;
        }
        self
    }

    pub(crate) fn hanging(mut self, hostname: &str) -> Self {
        self = self.node(hostname, "");
        if let Some(node) = self.nodes.get_mut(hostname) {
            node.dial = Dial::Hang;
        }
        self
    }

    pub(crate) fn opened(&self) -> usize {
        self.log.opened.load(Ordering::SeqCst)
    }

    pub(crate) fn closed(&self) -> usize {
        self.log.closed.load(Ordering::SeqCst)
    }

    /// Sessions dropped while still open, e.g. by a cancelled attempt
    pub(crate) fn dropped(&self) -> usize {
        self.log.dropped.load(Ordering::SeqCst)
    }

    /// `(hostname, command)` pairs in execution order
    pub(crate) fn commands(&self) -> Vec<(String, String)> {
        self.log.commands.lock().unwrap().clone()
    }
}

#[async_trait]
impl NodeConnector for FakeConnector {
    type Session = FakeSession;

    async fn connect(
        &self,
        target: &ConnectTarget,
        _key: &IdentityKey,
    ) -> Result<FakeSession, AuthError> {
        let Some(node) = self.nodes.get(&target.hostname) else {
            return Err(AuthError::Connect {
                addr: target.addr(),
                reason: "no route to host".to_string(),
            });
        };

        match node.dial {
            Dial::Accept => {}
            Dial::Refuse => {
                return Err(AuthError::AuthenticationRejected {
                    user: target.username.clone(),
                    addr: target.addr(),
                })
            }
            Dial::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                return Err(AuthError::Connect {
                    addr: target.addr(),
                    reason: "hung".to_string(),
                });
            }
        }

        self.log.opened.fetch_add(1, Ordering::SeqCst);
        Ok(FakeSession {
            hostname: target.hostname.clone(),
            node: node.clone(),
            log: Arc::clone(&self.log),
            closed: false,
        })
    }
}

#[derive(Debug)]
pub(crate) struct FakeSession {
    hostname: String,
    node: FakeNode,
    log: Arc<SessionLog>,
    closed: bool,
}

#[async_trait]
impl RemoteSession for FakeSession {
    async fn exec(&mut self, command: &str) -> Result<CommandOutput, TransportError> {
        if self.closed {
            return Err(TransportError::Session("session already closed".to_string()));
        }
        self.log
            .commands
            .lock()
            .unwrap()
            .push((self.hostname.clone(), command.to_string()));

        if self.node.command_hangs {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }

        Ok(CommandOutput {
            stdout: self.node.registry.clone().into_bytes(),
            stderr: b"cat: /etc/nyo_users: Permission denied".to_vec(),
            exit_status: self.node.exit_status,
        })
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        if !self.closed {
            self.closed = true;
            self.log.closed.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

impl Drop for FakeSession {
    fn drop(&mut self) {
        if !self.closed {
            self.log.dropped.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Prompt answering from a script and counting how often it was asked
#[derive(Debug, Default)]
pub(crate) struct ScriptedPrompt {
    answers: Mutex<VecDeque<Result<String, PromptError>>>,
    asked: AtomicUsize,
}

impl ScriptedPrompt {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn answering(answer: &str) -> Self {
        let prompt = Self::new();
        prompt.answers.lock().unwrap().push_back(Ok(answer.to_string()));
        prompt
    }

    pub(crate) fn asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

impl CredentialPrompt for ScriptedPrompt {
    fn passphrase(&self, _key_path: &Path) -> Result<String, PromptError> {
        self.asked.fetch_add(1, Ordering::SeqCst);
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(PromptError::NotATerminal))
    }
}
