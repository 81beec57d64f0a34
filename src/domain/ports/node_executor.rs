//! NodeExecutor port - deployment actions on an authorized node
//!
//! Running `prepare` steps, starting services and provisioning databases is
//! not part of nyo's core. The orchestrator hands every authorized session to
//! an executor and releases it afterwards.

use async_trait::async_trait;

use crate::project::{DatabaseConfig, ServiceConfig};

use super::node_transport::RemoteSession;

/// What an executor is allowed to act on
#[derive(Debug, Clone, Copy)]
pub struct NodeGrant<'a> {
    pub project: &'a str,
    pub service: &'a ServiceConfig,
    pub databases: &'a [DatabaseConfig],
    /// Host alias as written in `nodes`
    pub node: &'a str,
    /// Role from the node's trust registry
    pub role: &'a str,
}

#[async_trait]
pub trait NodeExecutor<S: RemoteSession>: Send + Sync {
    /// Carry out the deployment of `grant.service` on `grant.node`.
    ///
    /// The session stays owned by the caller, which closes it afterwards.
    async fn execute(&self, grant: &NodeGrant<'_>, session: &mut S) -> anyhow::Result<()>;
}
