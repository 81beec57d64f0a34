//! Executor used by the CLI: records the grant, touches nothing on the node

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{NodeExecutor, NodeGrant, RemoteSession};

#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorizeOnlyExecutor;

#[async_trait]
impl<S: RemoteSession> NodeExecutor<S> for AuthorizeOnlyExecutor {
    async fn execute(&self, grant: &NodeGrant<'_>, _session: &mut S) -> anyhow::Result<()> {
        info!(
            project = grant.project,
            service = %grant.service.name,
            node = grant.node,
            role = grant.role,
            runtime = %grant.service.runtime,
            prepare_steps = grant.service.prepare.len(),
            databases = grant.databases.len(),
            "node authorized"
        );
        Ok(())
    }
}
