use std::path::Path;

use anyhow::Result;
use tracing::{debug, warn};

use nyo::application::{DeployOptions, DeployOrchestrator, DeployReport};
use nyo::auth::{AuthOptions, NodeAuthenticator};
use nyo::config::{self, Settings};
use nyo::infrastructure::{nyo_home_dir, AuthorizeOnlyExecutor, RusshConnector, TerminalPrompt};
use nyo::project::ConfigResolver;
use nyo::ssh::SshIdentityResolver;
use nyo::HostKeyPolicy;

pub async fn cmd_deploy(working_dir: &Path) -> Result<()> {
    let settings = load_settings()?;

    let home = nyo_home_dir().ok_or(nyo::error::IdentityError::HomeDirUnavailable)?;
    if settings.host_key_policy == HostKeyPolicy::AcceptAny {
        warn!("host key verification is disabled (host_key_policy = \"accept-any\")");
    }

    let connector = RusshConnector::new(settings.host_key_policy, settings.known_hosts_path(&home));
    let authenticator = NodeAuthenticator::new(
        connector,
        TerminalPrompt::new(),
        AuthOptions::from_settings(&settings),
    );
    let orchestrator = DeployOrchestrator::new(
        ConfigResolver::new(settings.resolver_options()),
        SshIdentityResolver::from_settings(&settings)?,
        authenticator,
        AuthorizeOnlyExecutor,
    )
    .with_options(DeployOptions::from_settings(&settings));

    let report = orchestrator.deploy(working_dir).await?;
    print_report(&report);
    Ok(())
}

fn load_settings() -> Result<Settings> {
    let (settings, warnings) = config::load()?;
    for warning in &warnings {
        warn!("{warning}");
    }
    debug!(
        registry = %settings.registry_path,
        host_key_policy = %settings.host_key_policy,
        max_parallel_nodes = settings.max_parallel_nodes,
        "settings loaded"
    );
    Ok(settings)
}

fn print_report(report: &DeployReport) {
    println!("Deployed {}", report.project);
    for service in &report.services {
        let nodes: Vec<String> = report
            .roles_for(service)
            .map(|n| format!("{} ({})", n.node, n.role))
            .collect();
        if nodes.is_empty() {
            println!("  {service}: no nodes");
        } else {
            println!("  {service}: {}", nodes.join(", "));
        }
    }
    if !report.databases.is_empty() {
        println!("  databases: {}", report.databases.join(", "));
    }
}
