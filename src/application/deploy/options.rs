//! Deploy Options

use crate::config::Settings;

/// Options for the deploy orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOptions {
    /// Nodes authenticated at the same time. 1 visits nodes strictly in order.
    pub max_parallel_nodes: usize,
}

impl DeployOptions {
    pub fn new() -> Self {
        Self {
            max_parallel_nodes: 1,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new().with_max_parallel_nodes(settings.max_parallel_nodes)
    }

    /// Values below 1 are treated as 1.
    pub fn with_max_parallel_nodes(mut self, max: usize) -> Self {
        self.max_parallel_nodes = max.max(1);
        self
    }
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self::new()
    }
}
