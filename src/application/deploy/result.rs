//! Deploy Result

use crate::project::SectionWarning;

/// Role granted to the caller on one node of one service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeAuthorization {
    pub service: String,
    pub node: String,
    pub role: String,
}

/// Summary of a successful deployment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployReport {
    pub project: String,
    /// Service names, in document order
    pub services: Vec<String>,
    /// Database names, in document order
    pub databases: Vec<String>,
    /// One entry per visited node, in declaration order
    pub nodes: Vec<NodeAuthorization>,
    pub warnings: Vec<SectionWarning>,
}

impl DeployReport {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn roles_for<'a>(&'a self, service: &'a str) -> impl Iterator<Item = &'a NodeAuthorization> {
        self.nodes.iter().filter(move |n| n.service == service)
    }
}
