//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod credential_prompt;
pub mod node_executor;
pub mod node_transport;

pub use credential_prompt::{CredentialPrompt, PromptError};
pub use node_executor::{NodeExecutor, NodeGrant};
pub use node_transport::{CommandOutput, ConnectTarget, NodeConnector, RemoteSession};
