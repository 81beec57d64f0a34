//! Deploy Use Case
//!
//! Orchestrates the deployment flow:
//! 1. Locate and resolve `Nyo.toml` in the working directory
//! 2. Resolve the identity of every declared node, in declaration order
//! 3. Authenticate against each node and discover the caller's role
//! 4. Hand every authorized session to the executor, then close it
//!
//! Executors only run once every node has been authorized. The first failure
//! in declaration order aborts the deployment: attempts in flight are
//! cancelled and sessions already granted are closed before the error is
//! returned.

use std::collections::BTreeMap;
use std::path::Path;

use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, error, info, warn};

use crate::auth::authenticator::release;
use crate::auth::{Authorization, NodeAuthenticator};
use crate::domain::ports::{CredentialPrompt, NodeConnector, NodeExecutor, NodeGrant};
use crate::error::{AuthError, NodeError, NyoError, NyoResult};
use crate::project::{locate_config_file, ConfigResolver, ResolvedProject};
use crate::ssh::SshIdentityResolver;

use super::options::DeployOptions;
use super::result::{DeployReport, NodeAuthorization};

/// Authorized node waiting for the executor
struct Granted<'p, S> {
    service: usize,
    node: &'p str,
    role: String,
    session: S,
}

/// Finished authorization attempt: service index, node alias, outcome
type Attempt<'p, S> = (usize, &'p str, Result<(S, String), NodeError>);

/// Deploy orchestrator
///
/// Parameterized by its transport, prompt and executor so the whole flow
/// runs against in-memory doubles in tests.
pub struct DeployOrchestrator<C, P, E> {
    resolver: ConfigResolver,
    identities: SshIdentityResolver,
    authenticator: NodeAuthenticator<C, P>,
    executor: E,
    options: DeployOptions,
}

impl<C, P, E> DeployOrchestrator<C, P, E>
where
    C: NodeConnector,
    P: CredentialPrompt,
    E: NodeExecutor<C::Session>,
{
    pub fn new(
        resolver: ConfigResolver,
        identities: SshIdentityResolver,
        authenticator: NodeAuthenticator<C, P>,
        executor: E,
    ) -> Self {
        Self {
            resolver,
            identities,
            authenticator,
            executor,
            options: DeployOptions::default(),
        }
    }

    pub fn with_options(mut self, options: DeployOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_max_parallel_nodes(mut self, max: usize) -> Self {
        self.options = self.options.with_max_parallel_nodes(max);
        self
    }

    pub fn options(&self) -> &DeployOptions {
        &self.options
    }

    pub fn authenticator(&self) -> &NodeAuthenticator<C, P> {
        &self.authenticator
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Deploy the project found in `working_dir`.
    pub async fn deploy(&self, working_dir: &Path) -> NyoResult<DeployReport> {
        let config_path = locate_config_file(working_dir)?;
        let project = self.resolver.load(&config_path)?;

        for warning in &project.warnings {
            warn!(file = %config_path.display(), "{warning}");
        }
        info!(
            project = %project.name,
            services = project.services.len(),
            databases = project.databases.len(),
            "resolved Nyo.toml"
        );

        let granted = self.authorize_all(&project).await?;

        let mut report = DeployReport {
            project: project.name.clone(),
            services: project.services.iter().map(|s| s.name.clone()).collect(),
            databases: project.databases.iter().map(|d| d.name.clone()).collect(),
            nodes: Vec::with_capacity(granted.len()),
            warnings: project.warnings.clone(),
        };

        let mut pending = granted.into_iter();
        while let Some(mut visit) = pending.next() {
            let service = &project.services[visit.service];
            let grant = NodeGrant {
                project: &project.name,
                service,
                databases: &project.databases,
                node: visit.node,
                role: &visit.role,
            };

            let outcome = self.executor.execute(&grant, &mut visit.session).await;
            release(&mut visit.session, visit.node).await;

            if let Err(source) = outcome {
                error!(service = %service.name, node = visit.node, "deployment executor failed");
                for mut rest in pending {
                    release(&mut rest.session, rest.node).await;
                }
                return Err(NyoError::Node {
                    service: service.name.clone(),
                    node: visit.node.to_string(),
                    source: NodeError::Executor(source),
                });
            }

            report.nodes.push(NodeAuthorization {
                service: service.name.clone(),
                node: visit.node.to_string(),
                role: visit.role,
            });
        }

        info!(
            project = %report.project,
            nodes = report.node_count(),
            "deployment finished"
        );
        Ok(report)
    }

    /// Authenticate against every node of every service.
    ///
    /// Runs up to `max_parallel_nodes` attempts at once. Results are consumed
    /// in declaration order, so the reported failure is always the first
    /// failing node. Attempts still in flight at that point are cancelled;
    /// every session already handed back, in order or not, is closed.
    async fn authorize_all<'p>(
        &self,
        project: &'p ResolvedProject,
    ) -> NyoResult<Vec<Granted<'p, C::Session>>> {
        let mut visits = project
            .services
            .iter()
            .enumerate()
            .flat_map(|(index, service)| service.nodes.iter().map(move |node| (index, node.as_str())))
            .enumerate();
        let limit = self.options.max_parallel_nodes.max(1);

        let mut in_flight = FuturesUnordered::new();
        // Finished out of order, keyed by declaration position
        let mut finished: BTreeMap<usize, Attempt<'p, C::Session>> = BTreeMap::new();
        let mut granted: Vec<Granted<'p, C::Session>> = Vec::new();
        let mut failure = None;

        'visits: loop {
            while in_flight.len() < limit {
                let Some((position, (service, node))) = visits.next() else {
                    break;
                };
                in_flight.push(async move {
                    let outcome = self.authorize(node).await;
                    (position, (service, node, outcome))
                });
            }

            let Some((position, attempt)) = in_flight.next().await else {
                break;
            };
            finished.insert(position, attempt);

            while let Some((service, node, outcome)) = finished.remove(&granted.len()) {
                match outcome {
                    Ok((session, role)) => granted.push(Granted {
                        service,
                        node,
                        role,
                        session,
                    }),
                    Err(source) => {
                        let service_name = &project.services[service].name;
                        error!(service = %service_name, node, error = %source, "node failed");
                        failure = Some(NyoError::Node {
                            service: service_name.clone(),
                            node: node.to_string(),
                            source,
                        });
                        break 'visits;
                    }
                }
            }
        }
        // Cancels whatever is still in flight
        drop(in_flight);

        if let Some(err) = failure {
            debug!(
                open_sessions = granted.len() + finished.len(),
                "releasing sessions after failure"
            );
            for visit in &mut granted {
                release(&mut visit.session, visit.node).await;
            }
            for (_, (_, node, outcome)) in finished {
                if let Ok((mut session, _)) = outcome {
                    release(&mut session, node).await;
                }
            }
            return Err(err);
        }
        Ok(granted)
    }

    async fn authorize(&self, node: &str) -> Result<(C::Session, String), NodeError> {
        let identity = self.identities.resolve(node)?;
        match self.authenticator.authenticate(&identity).await? {
            Authorization::Authorized { session, role } => Ok((session, role)),
            Authorization::Rejected { public_key } => {
                debug!(node, key = %public_key, "key not listed in trust registry");
                Err(AuthError::NoMatchingKey {
                    registry: self.authenticator.options().registry_path.clone(),
                }
                .into())
            }
        }
    }
}
