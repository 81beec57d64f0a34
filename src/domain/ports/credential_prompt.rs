//! CredentialPrompt port - interactive secrets needed during authentication
//!
//! Key decoding asks this collaborator for a passphrase instead of reading
//! the terminal itself, so authentication can run in tests and CI.

use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PromptError {
    /// No interactive terminal to ask on
    #[error("no interactive terminal available")]
    NotATerminal,

    #[error("{0}")]
    Failed(String),
}

/// Source of passphrases for protected private keys
///
/// Implementations:
/// - `TerminalPrompt` - asks on the controlling terminal, one prompt at a time
/// - test doubles returning scripted answers
pub trait CredentialPrompt: Send + Sync {
    /// Ask for the passphrase protecting the key at `key_path`.
    fn passphrase(&self, key_path: &Path) -> Result<String, PromptError>;
}

impl<P: CredentialPrompt + ?Sized> CredentialPrompt for &P {
    fn passphrase(&self, key_path: &Path) -> Result<String, PromptError> {
        (**self).passphrase(key_path)
    }
}
