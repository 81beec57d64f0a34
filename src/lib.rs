//! Nyo - declarative deployment orchestrator
//!
//! A project is described by a `Nyo.toml` file listing services and
//! databases. Each service names the nodes it runs on by their OpenSSH host
//! aliases; nyo resolves those aliases, authenticates with the user's key and
//! discovers the user's role on every node from the node's trust registry
//! before anything is deployed.

pub mod application;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod project;
pub mod ssh;

// Re-exports for convenience
pub use application::{DeployOptions, DeployOrchestrator, DeployReport, NodeAuthorization};
pub use auth::{AuthOptions, Authorization, NodeAuthenticator, TrustRegistry};
pub use config::{HostKeyPolicy, Settings};
pub use error::{
    AuthError, ConfigError, IdentityError, NodeError, NyoError, NyoResult, TransportError,
};
pub use project::{ConfigResolver, DatabaseConfig, ResolvedProject, ServiceConfig};
pub use ssh::{ResolvedNodeIdentity, SshIdentityResolver};
