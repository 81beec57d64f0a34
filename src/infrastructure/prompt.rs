//! Terminal passphrase prompt

use std::path::Path;
use std::sync::Mutex;

use dialoguer::Password;
use is_terminal::IsTerminal;

use crate::domain::ports::{CredentialPrompt, PromptError};

/// Asks for key passphrases on the controlling terminal.
///
/// Prompts are serialized so parallel node visits never interleave on the
/// terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompt {
    lock: Mutex<()>,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialPrompt for TerminalPrompt {
    fn passphrase(&self, key_path: &Path) -> Result<String, PromptError> {
        if !std::io::stdin().is_terminal() {
            return Err(PromptError::NotATerminal);
        }

        let _guard = self
            .lock
            .lock()
            .map_err(|_| PromptError::Failed("passphrase prompt lock poisoned".to_string()))?;

        Password::new()
            .with_prompt(format!("Enter passphrase for {}", key_path.display()))
            .allow_empty_password(true)
            .interact()
            .map_err(|e| PromptError::Failed(e.to_string()))
    }
}
