//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on the domain ports and the resolution modules (`project`, `ssh`, `auth`)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `DeployOrchestrator` - resolve `Nyo.toml`, authorize every node, run the executor

pub mod deploy;

pub use deploy::{DeployOptions, DeployOrchestrator, DeployReport, NodeAuthorization};
